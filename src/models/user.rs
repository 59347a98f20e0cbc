use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub notification_preferences: NotificationPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub monthly_reports: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self { monthly_reports: true }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub monthly_reports: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub monthly_reports: bool,
}

impl User {
    pub fn new(request: CreateUserRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            notification_preferences: NotificationPreferences {
                monthly_reports: request.monthly_reports.unwrap_or(true),
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_preferences(&mut self, request: UpdatePreferencesRequest) {
        self.notification_preferences.monthly_reports = request.monthly_reports;
        self.updated_at = Utc::now();
    }
}
