use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    subscription::{CreateSubscriptionRequest, Subscription, UpdateSubscriptionRequest},
    user::{CreateUserRequest, UpdatePreferencesRequest, User},
};

/// In-process store for users and their subscriptions.
#[derive(Clone, Default)]
pub struct DatabaseService {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
}

impl DatabaseService {
    pub fn new() -> Self {
        Self::default()
    }

    // User operations
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let user = User::new(request);
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!("User with email {} already exists", user.email)));
        }

        users.insert(user.id, user.clone());
        log::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &Uuid) -> Result<User> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    pub async fn update_preferences(&self, user_id: &Uuid, request: UpdatePreferencesRequest) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.set_preferences(request);
        Ok(user.clone())
    }

    pub async fn users_with_monthly_reports(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.notification_preferences.monthly_reports)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    // Subscription operations
    pub async fn create_subscription(
        &self,
        user_id: &Uuid,
        request: CreateSubscriptionRequest,
        today: NaiveDate,
    ) -> Result<Subscription> {
        self.get_user(user_id).await?;
        let subscription = Subscription::new(*user_id, request, today)?;
        self.subscriptions.write().await.push(subscription.clone());
        log::info!(
            "Created subscription {} for user {}, next payment {}",
            subscription.id,
            user_id,
            subscription.next_payment
        );
        Ok(subscription)
    }

    pub async fn get_subscription(&self, user_id: &Uuid, subscription_id: &Uuid) -> Result<Subscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .find(|s| s.id == *subscription_id && s.user_id == *user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Subscription {} not found", subscription_id)))
    }

    pub async fn get_subscriptions_by_user(&self, user_id: &Uuid) -> Result<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect())
    }

    pub async fn update_subscription(
        &self,
        user_id: &Uuid,
        subscription_id: &Uuid,
        request: UpdateSubscriptionRequest,
        today: NaiveDate,
    ) -> Result<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == *subscription_id && s.user_id == *user_id)
            .ok_or_else(|| AppError::NotFound(format!("Subscription {} not found", subscription_id)))?;
        subscription.update(request, today)?;
        Ok(subscription.clone())
    }

    pub async fn delete_subscription(&self, user_id: &Uuid, subscription_id: &Uuid) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        let before = subscriptions.len();
        subscriptions.retain(|s| !(s.id == *subscription_id && s.user_id == *user_id));
        if subscriptions.len() == before {
            return Err(AppError::NotFound(format!("Subscription {} not found", subscription_id)));
        }
        log::info!("Deleted subscription {}", subscription_id);
        Ok(())
    }

    /// Rolls one subscription's stale `next_payment` forward.
    pub async fn refresh_next_payment(&self, subscription_id: &Uuid, today: NaiveDate) -> Result<bool> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == *subscription_id)
            .ok_or_else(|| AppError::NotFound(format!("Subscription {} not found", subscription_id)))?;
        subscription.refresh_next_payment(today)
    }

    pub async fn stale_subscription_ids(&self, today: NaiveDate) -> Result<Vec<Uuid>> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.next_payment < today)
            .map(|s| s.id)
            .collect())
    }

    pub async fn get_statistics(&self) -> Result<DatabaseStats> {
        let users = self.users.read().await;
        let subscriptions = self.subscriptions.read().await;
        Ok(DatabaseStats {
            total_users: users.len() as u64,
            report_recipients: users.values().filter(|u| u.notification_preferences.monthly_reports).count() as u64,
            total_subscriptions: subscriptions.len() as u64,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DatabaseStats {
    pub total_users: u64,
    pub report_recipients: u64,
    pub total_subscriptions: u64,
}
