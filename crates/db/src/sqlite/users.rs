//! SQLite-Implementierung des UserRepository

use echosprite_core::DiscordUserId;
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerDaten, BenutzerRecord};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{jetzt, parse_uuid, parse_zeit};

const SPALTEN: &str = "id, discord_id, username, discriminator, avatar, created_at, updated_at";

impl UserRepository for SqliteDb {
    async fn upsert(&self, daten: BenutzerDaten<'_>) -> DbResult<BenutzerRecord> {
        let id_str = Uuid::new_v4().to_string();
        let (_, now_str) = jetzt();
        let discord_str = daten.discord_id.to_string();

        sqlx::query(
            "INSERT INTO users (id, discord_id, username, discriminator, avatar, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(discord_id) DO UPDATE SET
                username = excluded.username,
                discriminator = excluded.discriminator,
                avatar = excluded.avatar,
                updated_at = excluded.updated_at",
        )
        .bind(&id_str)
        .bind(&discord_str)
        .bind(daten.username)
        .bind(daten.discriminator)
        .bind(daten.avatar)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        self.get_by_discord_id(daten.discord_id)
            .await?
            .ok_or_else(|| DbError::intern("Benutzer nach Upsert nicht gefunden"))
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_discord_id(
        &self,
        discord_id: DiscordUserId,
    ) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users WHERE discord_id = ?");
        let row = sqlx::query(&sql)
            .bind(discord_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn list(&self) -> DbResult<Vec<BenutzerRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM users ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_benutzer).collect()
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    let discord_str: String = row.try_get("discord_id")?;
    let discord_id = discord_str
        .parse::<DiscordUserId>()
        .map_err(|e| DbError::UngueltigeDaten(e.to_string()))?;

    Ok(BenutzerRecord {
        id: parse_uuid(row, "id")?,
        discord_id,
        username: row.try_get("username")?,
        discriminator: row.try_get("discriminator")?,
        avatar: row.try_get("avatar")?,
        created_at: parse_zeit(row, "created_at")?,
        updated_at: parse_zeit(row, "updated_at")?,
    })
}
