pub mod cron;
pub mod health;
pub mod subscriptions;
pub mod users;

use actix_web::web;

/// Registers every `/api/v1` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // User and Subscription Management
            .service(
                web::scope("/users")
                    .service(users::register_user)
                    .service(users::get_user)
                    .service(users::update_preferences)
                    .service(subscriptions::list_subscriptions)
                    .service(subscriptions::create_subscription)
                    // summary must precede /{subscription_id}
                    .service(subscriptions::get_summary)
                    .service(subscriptions::get_subscription)
                    .service(subscriptions::update_subscription)
                    .service(subscriptions::delete_subscription)
            )
            // Scheduled jobs
            .service(
                web::scope("/cron")
                    .service(cron::monthly_reports)
                    .service(cron::refresh_renewals)
            )
            // Health check
            .route("/health", web::get().to(health::health_check))
    );
}
