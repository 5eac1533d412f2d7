//! SQLite-Implementierung des AnalyticsRepository

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::models::{AnalyticsRecord, EreignisStatistik};
use crate::repository::{AnalyticsRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{jetzt, zeit_zu_text};

impl AnalyticsRepository for SqliteDb {
    async fn log_event(
        &self,
        event_type: &str,
        user_id: Option<Uuid>,
        metadata: serde_json::Value,
    ) -> DbResult<AnalyticsRecord> {
        let id = Uuid::new_v4();
        let (now, now_str) = jetzt();
        let user_str = user_id.map(|u| u.to_string());
        let metadata_str = serde_json::to_string(&metadata)?;

        sqlx::query(
            "INSERT INTO analytics (id, event_type, user_id, metadata_json, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(event_type)
        .bind(&user_str)
        .bind(&metadata_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(AnalyticsRecord {
            id,
            event_type: event_type.to_string(),
            user_id,
            metadata,
            created_at: now,
        })
    }

    async fn stats(
        &self,
        start: DateTime<Utc>,
        ende: DateTime<Utc>,
    ) -> DbResult<Vec<EreignisStatistik>> {
        // created_at ist einheitlich formatiert, die ersten 10 Zeichen sind das Datum
        let rows = sqlx::query(
            "SELECT event_type, substr(created_at, 1, 10) AS tag, COUNT(*) AS anzahl
             FROM analytics
             WHERE created_at BETWEEN ? AND ?
             GROUP BY event_type, tag
             ORDER BY tag DESC, anzahl DESC, event_type ASC",
        )
        .bind(zeit_zu_text(start))
        .bind(zeit_zu_text(ende))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| -> DbResult<EreignisStatistik> {
                Ok(EreignisStatistik {
                    event_type: r.try_get("event_type")?,
                    date: r.try_get("tag")?,
                    count: r.try_get("anzahl")?,
                })
            })
            .collect()
    }
}
