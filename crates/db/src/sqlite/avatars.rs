//! SQLite-Implementierung des AvatarRepository

use echosprite_core::{AvatarBilder, AvatarEinstellungen, DiscordUserId};
use uuid::Uuid;

use crate::error::DbError;
use crate::models::AvatarRecord;
use crate::repository::{AvatarRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{jetzt, parse_bilder, parse_einstellungen, parse_uuid, parse_zeit};

const SPALTEN: &str = "a.id, a.user_id, a.idle_image, a.talking_image, a.muted_image,
                       a.deafened_image, a.settings_json, a.created_at, a.updated_at";

impl AvatarRepository for SqliteDb {
    async fn upsert_avatar(
        &self,
        user_id: Uuid,
        bilder: &AvatarBilder,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<AvatarRecord> {
        let id_str = Uuid::new_v4().to_string();
        let (_, now_str) = jetzt();
        let settings = serde_json::to_string(einstellungen)?;

        sqlx::query(
            "INSERT INTO avatars
               (id, user_id, idle_image, talking_image, muted_image, deafened_image,
                settings_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                idle_image = excluded.idle_image,
                talking_image = excluded.talking_image,
                muted_image = excluded.muted_image,
                deafened_image = excluded.deafened_image,
                settings_json = excluded.settings_json,
                updated_at = excluded.updated_at",
        )
        .bind(&id_str)
        .bind(user_id.to_string())
        .bind(&bilder.idle)
        .bind(&bilder.talking)
        .bind(&bilder.muted)
        .bind(&bilder.deafened)
        .bind(&settings)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, || format!("Avatar fuer User {user_id}")))?;

        self.get_by_user_id(user_id)
            .await?
            .ok_or_else(|| DbError::intern("Avatar nach Upsert nicht gefunden"))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DbResult<Option<AvatarRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM avatars a WHERE a.user_id = ?");
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_avatar(&r)).transpose()
    }

    async fn get_avatar_by_discord_id(
        &self,
        discord_id: DiscordUserId,
    ) -> DbResult<Option<AvatarRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM avatars a
             JOIN users u ON u.id = a.user_id
             WHERE u.discord_id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(discord_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_avatar(&r)).transpose()
    }

    async fn update_settings(
        &self,
        user_id: Uuid,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<AvatarRecord> {
        let (_, now_str) = jetzt();
        let settings = serde_json::to_string(einstellungen)?;

        let affected = sqlx::query(
            "UPDATE avatars SET settings_json = ?, updated_at = ? WHERE user_id = ?",
        )
        .bind(&settings)
        .bind(&now_str)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Avatar fuer User {user_id}")));
        }

        self.get_by_user_id(user_id)
            .await?
            .ok_or_else(|| DbError::intern("Avatar nach Update nicht gefunden"))
    }

    async fn delete_avatar(&self, user_id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM avatars WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

fn row_to_avatar(row: &sqlx::sqlite::SqliteRow) -> DbResult<AvatarRecord> {
    Ok(AvatarRecord {
        id: parse_uuid(row, "id")?,
        user_id: parse_uuid(row, "user_id")?,
        bilder: parse_bilder(row)?,
        einstellungen: parse_einstellungen(row)?,
        created_at: parse_zeit(row, "created_at")?,
        updated_at: parse_zeit(row, "updated_at")?,
    })
}
