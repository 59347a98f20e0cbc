mod config;
mod error;
mod handlers;
mod models;
mod services;
mod tasks;

use actix_web::{web, App, HttpServer, middleware::Logger};
use actix_cors::Cors;
use dotenv::dotenv;

use services::{
    database::DatabaseService,
    mailer::HttpMailer,
    report::ReportBuilder,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = config::Config::from_env()?;

    let database_service = DatabaseService::new();
    let mailer = HttpMailer::new(config.mailer.clone());
    let report_builder = ReportBuilder::new(config.report.clone());

    if config.mailer.endpoint.is_none() {
        log::warn!("MAILER_ENDPOINT not set; monthly reports will only be logged");
    }

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting Subscription Tracker on {}", bind_address);

    let app_config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
            )
            .app_data(app_config.clone())
            .app_data(web::Data::new(database_service.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(report_builder.clone()))
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
