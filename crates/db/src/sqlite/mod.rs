//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod analytics;
pub mod avatar_configs;
pub mod avatars;
pub mod pool;
pub mod profiles;
pub mod users;

pub use pool::SqliteDb;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

/// Einheitliches Zeitformat (Millisekunden, `Z`), damit Stringvergleiche
/// in SQL der zeitlichen Reihenfolge entsprechen
pub(crate) fn zeit_zu_text(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn jetzt() -> (DateTime<Utc>, String) {
    // Auf Millisekunden runden, damit der zurueckgegebene Wert dem gespeicherten entspricht
    let text = zeit_zu_text(Utc::now());
    let zeit = DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    (zeit, text)
}

pub(crate) fn parse_uuid(row: &sqlx::sqlite::SqliteRow, col: &str) -> DbResult<Uuid> {
    let s: String = row.try_get(col)?;
    Uuid::parse_str(&s).map_err(|e| DbError::intern(format!("Ungueltige UUID in '{col}': {e}")))
}

pub(crate) fn parse_zeit(row: &sqlx::sqlite::SqliteRow, col: &str) -> DbResult<DateTime<Utc>> {
    let s: String = row.try_get(col)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel in '{col}': {e}")))
}

pub(crate) fn parse_opt_zeit(
    row: &sqlx::sqlite::SqliteRow,
    col: &str,
) -> DbResult<Option<DateTime<Utc>>> {
    let s: Option<String> = row.try_get(col)?;
    s.as_deref()
        .map(|v| {
            DateTime::parse_from_rfc3339(v)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel in '{col}': {e}")))
        })
        .transpose()
}

/// Liest die vier Bild-Spalten (`*_image`)
pub(crate) fn parse_bilder(row: &sqlx::sqlite::SqliteRow) -> DbResult<echosprite_core::AvatarBilder> {
    Ok(echosprite_core::AvatarBilder {
        idle: row.try_get("idle_image")?,
        talking: row.try_get("talking_image")?,
        muted: row.try_get("muted_image")?,
        deafened: row.try_get("deafened_image")?,
    })
}

pub(crate) fn parse_einstellungen(
    row: &sqlx::sqlite::SqliteRow,
) -> DbResult<echosprite_core::AvatarEinstellungen> {
    let json: String = row.try_get("settings_json")?;
    Ok(serde_json::from_str(&json)?)
}
