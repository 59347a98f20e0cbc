use actix_web::{delete, get, post, put, HttpResponse};
use actix_web::web::{Data, Json, Path};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    common::ApiResponse,
    subscription::{CreateSubscriptionRequest, UpdateSubscriptionRequest},
};
use crate::services::{database::DatabaseService, report::ReportBuilder};

#[get("/{user_id}/subscriptions")]
pub async fn list_subscriptions(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    db.get_user(&user_id).await?;
    let subscriptions = db.get_subscriptions_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(subscriptions)))
}

#[post("/{user_id}/subscriptions")]
pub async fn create_subscription(
    db: Data<DatabaseService>,
    path: Path<Uuid>,
    payload: Json<CreateSubscriptionRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    request.validate()?;

    let today = Utc::now().date_naive();
    let subscription = db.create_subscription(&path.into_inner(), request, today).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(subscription)))
}

#[get("/{user_id}/subscriptions/summary")]
pub async fn get_summary(
    db: Data<DatabaseService>,
    builder: Data<ReportBuilder>,
    path: Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    db.get_user(&user_id).await?;
    let subscriptions = db.get_subscriptions_by_user(&user_id).await?;
    let summary = builder.summary(&subscriptions, Utc::now().date_naive());
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[get("/{user_id}/subscriptions/{subscription_id}")]
pub async fn get_subscription(
    db: Data<DatabaseService>,
    path: Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, subscription_id) = path.into_inner();
    let subscription = db.get_subscription(&user_id, &subscription_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(subscription)))
}

#[put("/{user_id}/subscriptions/{subscription_id}")]
pub async fn update_subscription(
    db: Data<DatabaseService>,
    path: Path<(Uuid, Uuid)>,
    payload: Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, subscription_id) = path.into_inner();
    let request = payload.into_inner();
    request.validate()?;

    let today = Utc::now().date_naive();
    let subscription = db.update_subscription(&user_id, &subscription_id, request, today).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(subscription)))
}

#[delete("/{user_id}/subscriptions/{subscription_id}")]
pub async fn delete_subscription(
    db: Data<DatabaseService>,
    path: Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, subscription_id) = path.into_inner();
    db.delete_subscription(&user_id, &subscription_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        subscription_id,
        "Subscription deleted".to_string(),
    )))
}
