//! Datenbankmodelle fuer EchoSprite
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Domain-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use echosprite_core::{AvatarBilder, AvatarEinstellungen, DiscordUserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz (eine Discord-Identitaet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub discord_id: DiscordUserId,
    pub username: String,
    pub discriminator: Option<String>,
    /// Discord-Avatar-Hash (nicht das EchoSprite-Bild)
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Anlegen oder Aktualisieren eines Benutzers
#[derive(Debug, Clone)]
pub struct BenutzerDaten<'a> {
    pub discord_id: DiscordUserId,
    pub username: &'a str,
    pub discriminator: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Avatare
// ---------------------------------------------------------------------------

/// Basis-Avatar eines Benutzers (genau einer pro Benutzer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bilder: AvatarBilder,
    pub einstellungen: AvatarEinstellungen,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Benanntes Avatar-Profil eines Benutzers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub ist_aktiv: bool,
    pub bilder: AvatarBilder,
    pub einstellungen: AvatarEinstellungen,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Anlegen eines Profils
#[derive(Debug, Clone)]
pub struct NeuesProfil<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub slug: &'a str,
    pub ist_aktiv: bool,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Ein protokolliertes Nutzungsereignis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub id: Uuid,
    pub event_type: String,
    pub user_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Aggregierte Ereignisanzahl pro Typ und Tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EreignisStatistik {
    pub event_type: String,
    /// Tag im Format `YYYY-MM-DD`
    pub date: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Oeffentliche Avatar-Konfigurationen (anonymer Ablauf)
// ---------------------------------------------------------------------------

/// Anonym gespeicherte Avatar-Konfiguration mit oeffentlicher ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfigRecord {
    pub public_id: String,
    pub idle_image: Option<String>,
    pub talking_image: Option<String>,
    pub sensitivity: u8,
    pub einstellungen: AvatarEinstellungen,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub access_count: i64,
}

/// Daten zum Anlegen einer Avatar-Konfiguration
#[derive(Debug, Clone)]
pub struct NeueAvatarConfig<'a> {
    pub public_id: &'a str,
    pub idle_image: Option<&'a str>,
    pub talking_image: Option<&'a str>,
    pub sensitivity: u8,
    pub einstellungen: &'a AvatarEinstellungen,
}
