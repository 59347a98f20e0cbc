use actix_web::HttpResponse;
use actix_web::web::Data;
use serde_json::json;

use crate::error::AppError;
use crate::services::database::DatabaseService;

pub async fn health_check(db: Data<DatabaseService>) -> Result<HttpResponse, AppError> {
    let stats = db.get_statistics().await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "statistics": stats,
    })))
}
