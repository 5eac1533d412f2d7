//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Aktuell existiert eine SQLite-Implementierung
//! (`SqliteDb`), Tests verwenden dieselbe Implementierung im Speicher.

use chrono::{DateTime, Utc};
use echosprite_core::{AvatarBilder, AvatarEinstellungen, DiscordUserId};
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{
    AnalyticsRecord, AvatarConfigRecord, AvatarRecord, BenutzerDaten, BenutzerRecord,
    EreignisStatistik, NeueAvatarConfig, NeuesProfil, ProfilRecord,
};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://echosprite.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://echosprite.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Benutzer (Discord-Identitaeten)
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt den Benutzer an oder aktualisiert Name, Discriminator und Avatar-Hash
    async fn upsert(&self, daten: BenutzerDaten<'_>) -> DbResult<BenutzerRecord>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;
    async fn get_by_discord_id(&self, discord_id: DiscordUserId)
        -> DbResult<Option<BenutzerRecord>>;
    /// Alle Benutzer, neueste zuerst
    async fn list(&self) -> DbResult<Vec<BenutzerRecord>>;
}

/// Basis-Avatare (einer pro Benutzer)
#[allow(async_fn_in_trait)]
pub trait AvatarRepository: Send + Sync {
    async fn upsert_avatar(
        &self,
        user_id: Uuid,
        bilder: &AvatarBilder,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<AvatarRecord>;
    async fn get_by_user_id(&self, user_id: Uuid) -> DbResult<Option<AvatarRecord>>;
    async fn get_avatar_by_discord_id(
        &self,
        discord_id: DiscordUserId,
    ) -> DbResult<Option<AvatarRecord>>;
    async fn update_settings(
        &self,
        user_id: Uuid,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<AvatarRecord>;
    async fn delete_avatar(&self, user_id: Uuid) -> DbResult<bool>;
}

/// Benannte Avatar-Profile
#[allow(async_fn_in_trait)]
pub trait ProfilRepository: Send + Sync {
    async fn create_profile(&self, daten: NeuesProfil<'_>) -> DbResult<ProfilRecord>;
    async fn get_by_user_and_slug(&self, user_id: Uuid, slug: &str)
        -> DbResult<Option<ProfilRecord>>;
    /// Alle Profile eines Benutzers, aelteste zuerst
    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<ProfilRecord>>;
    async fn count_profiles(&self, user_id: Uuid) -> DbResult<i64>;
    async fn update_profile_images(
        &self,
        id: Uuid,
        bilder: &AvatarBilder,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<ProfilRecord>;
    /// Setzt genau ein Profil des Benutzers aktiv
    async fn set_active(&self, id: Uuid, user_id: Uuid) -> DbResult<()>;
    async fn get_active(&self, user_id: Uuid) -> DbResult<Option<ProfilRecord>>;
    async fn delete_profile(&self, id: Uuid, user_id: Uuid) -> DbResult<bool>;
    async fn rename_profile(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: &str,
        slug: &str,
    ) -> DbResult<ProfilRecord>;
}

/// Nutzungsereignisse
#[allow(async_fn_in_trait)]
pub trait AnalyticsRepository: Send + Sync {
    async fn log_event(
        &self,
        event_type: &str,
        user_id: Option<Uuid>,
        metadata: serde_json::Value,
    ) -> DbResult<AnalyticsRecord>;
    /// Ereignisse pro Typ und Tag im Zeitraum `[start, ende]`
    async fn stats(
        &self,
        start: DateTime<Utc>,
        ende: DateTime<Utc>,
    ) -> DbResult<Vec<EreignisStatistik>>;
}

/// Anonyme Avatar-Konfigurationen
#[allow(async_fn_in_trait)]
pub trait AvatarConfigRepository: Send + Sync {
    async fn create_config(&self, daten: NeueAvatarConfig<'_>) -> DbResult<AvatarConfigRecord>;
    async fn get_config(&self, public_id: &str) -> DbResult<Option<AvatarConfigRecord>>;
    /// Laedt die Konfiguration und zaehlt den Zugriff
    async fn get_and_touch(&self, public_id: &str) -> DbResult<Option<AvatarConfigRecord>>;
}
