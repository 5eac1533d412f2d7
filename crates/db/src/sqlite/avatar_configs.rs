//! SQLite-Implementierung des AvatarConfigRepository

use sqlx::Row;

use crate::error::DbError;
use crate::models::{AvatarConfigRecord, NeueAvatarConfig};
use crate::repository::{AvatarConfigRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{jetzt, parse_einstellungen, parse_opt_zeit, parse_zeit};

const SPALTEN: &str = "public_id, idle_image, talking_image, sensitivity, settings_json,
                       created_at, last_accessed_at, access_count";

impl AvatarConfigRepository for SqliteDb {
    async fn create_config(&self, daten: NeueAvatarConfig<'_>) -> DbResult<AvatarConfigRecord> {
        let (now, now_str) = jetzt();
        let settings = serde_json::to_string(daten.einstellungen)?;

        sqlx::query(
            "INSERT INTO avatar_configs
               (public_id, idle_image, talking_image, sensitivity, settings_json, created_at, access_count)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(daten.public_id)
        .bind(daten.idle_image)
        .bind(daten.talking_image)
        .bind(daten.sensitivity as i64)
        .bind(&settings)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, || format!("Public-ID {} vergeben", daten.public_id)))?;

        Ok(AvatarConfigRecord {
            public_id: daten.public_id.to_string(),
            idle_image: daten.idle_image.map(str::to_string),
            talking_image: daten.talking_image.map(str::to_string),
            sensitivity: daten.sensitivity,
            einstellungen: daten.einstellungen.clone(),
            created_at: now,
            last_accessed_at: None,
            access_count: 0,
        })
    }

    async fn get_config(&self, public_id: &str) -> DbResult<Option<AvatarConfigRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM avatar_configs WHERE public_id = ?");
        let row = sqlx::query(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_config(&r)).transpose()
    }

    async fn get_and_touch(&self, public_id: &str) -> DbResult<Option<AvatarConfigRecord>> {
        let (_, now_str) = jetzt();
        let affected = sqlx::query(
            "UPDATE avatar_configs
             SET access_count = access_count + 1, last_accessed_at = ?
             WHERE public_id = ?",
        )
        .bind(&now_str)
        .bind(public_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        self.get_config(public_id).await
    }
}

fn row_to_config(row: &sqlx::sqlite::SqliteRow) -> DbResult<AvatarConfigRecord> {
    let sensitivity: i64 = row.try_get("sensitivity")?;
    let sensitivity = u8::try_from(sensitivity)
        .map_err(|_| DbError::UngueltigeDaten(format!("sensitivity {sensitivity}")))?;

    Ok(AvatarConfigRecord {
        public_id: row.try_get("public_id")?,
        idle_image: row.try_get("idle_image")?,
        talking_image: row.try_get("talking_image")?,
        sensitivity,
        einstellungen: parse_einstellungen(row)?,
        created_at: parse_zeit(row, "created_at")?,
        last_accessed_at: parse_opt_zeit(row, "last_accessed_at")?,
        access_count: row.try_get("access_count")?,
    })
}
