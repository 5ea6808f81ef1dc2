// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{AdminNotification, UserNotification};

#[async_trait]
pub trait NotificationExt {
    async fn insert_user_notification(
        &self,
        user_id: Uuid,
        kind: String,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<UserNotification, Error>;

    async fn insert_admin_notification(
        &self,
        kind: String,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<AdminNotification, Error>;

    async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserNotification>, Error>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserNotification>, Error>;

    async fn get_admin_notifications(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminNotification>, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn insert_user_notification(
        &self,
        user_id: Uuid,
        kind: String,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<UserNotification, Error> {
        sqlx::query_as::<_, UserNotification>(
            r#"
            INSERT INTO user_notifications (user_id, kind, title, body, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, kind, title, body, metadata, read, created_at
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_admin_notification(
        &self,
        kind: String,
        title: String,
        body: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<AdminNotification, Error> {
        sqlx::query_as::<_, AdminNotification>(
            r#"
            INSERT INTO admin_notifications (kind, title, body, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING id, kind, title, body, metadata, read, created_at
            "#,
        )
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserNotification>, Error> {
        sqlx::query_as::<_, UserNotification>(
            r#"
            SELECT id, user_id, kind, title, body, metadata, read, created_at
            FROM user_notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserNotification>, Error> {
        sqlx::query_as::<_, UserNotification>(
            r#"
            UPDATE user_notifications
            SET read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, kind, title, body, metadata, read, created_at
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_admin_notifications(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminNotification>, Error> {
        sqlx::query_as::<_, AdminNotification>(
            r#"
            SELECT id, kind, title, body, metadata, read, created_at
            FROM admin_notifications
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}
