use actix_web::{get, post, HttpRequest, HttpResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::web::Data;
use chrono::Utc;

use crate::config::Config;
use crate::error::AppError;
use crate::models::common::ApiResponse;
use crate::services::{database::DatabaseService, mailer::HttpMailer, report::ReportBuilder};
use crate::tasks::{monthly_report::MonthlyReportJob, renewal_refresh};

fn authorize(req: &HttpRequest, config: &Config) -> Result<(), AppError> {
    let expected = format!("Bearer {}", config.cron_secret_token);
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if provided != Some(expected.as_str()) {
        log::warn!("Unauthorized access attempt to {}", req.path());
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

#[get("/monthly-reports")]
pub async fn monthly_reports(
    req: HttpRequest,
    config: Data<Config>,
    db: Data<DatabaseService>,
    mailer: Data<HttpMailer>,
    builder: Data<ReportBuilder>,
) -> Result<HttpResponse, AppError> {
    authorize(&req, &config)?;

    let summary = MonthlyReportJob::new(&db, mailer.get_ref(), &builder)
        .run(Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[post("/refresh-renewals")]
pub async fn refresh_renewals(
    req: HttpRequest,
    config: Data<Config>,
    db: Data<DatabaseService>,
) -> Result<HttpResponse, AppError> {
    authorize(&req, &config)?;

    let summary = renewal_refresh::refresh_renewals(&db, Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::Value;

    use crate::config::{Config, MailerConfig, ReportConfig};
    use crate::handlers;
    use crate::services::{database::DatabaseService, mailer::HttpMailer, report::ReportBuilder};

    fn config() -> Config {
        Config {
            port: 8080,
            cron_secret_token: "cron-secret".to_string(),
            mailer: MailerConfig::default(),
            report: ReportConfig::default(),
        }
    }

    #[actix_web::test]
    async fn test_cron_requires_bearer_token() {
        let config = config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DatabaseService::new()))
                .app_data(web::Data::new(HttpMailer::new(config.mailer.clone())))
                .app_data(web::Data::new(ReportBuilder::new(config.report.clone())))
                .app_data(web::Data::new(config))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/cron/monthly-reports").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/api/v1/cron/monthly-reports")
            .insert_header(("Authorization", "Bearer wrong"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/api/v1/cron/monthly-reports")
            .insert_header(("Authorization", "Bearer cron-secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["emailsSent"], 0);

        let req = test::TestRequest::post()
            .uri("/api/v1/cron/refresh-renewals")
            .insert_header(("Authorization", "Bearer cron-secret"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
}
