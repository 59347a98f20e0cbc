use actix_web::{get, post, put, HttpResponse};
use actix_web::web::{Data, Json, Path};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    common::ApiResponse,
    user::{CreateUserRequest, UpdatePreferencesRequest},
};
use crate::services::database::DatabaseService;

#[post("/register")]
pub async fn register_user(
    db: Data<DatabaseService>,
    payload: Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    request.validate()?;

    let user = db.create_user(request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

#[get("/{user_id}")]
pub async fn get_user(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = db.get_user(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

#[put("/{user_id}/preferences")]
pub async fn update_preferences(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
    payload: Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, AppError> {
    let user = db.update_preferences(&path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        user,
        "Notification preferences updated".to_string(),
    )))
}
