//! Fehlertypen fuer die Avatar-Logik
//!
//! Die Meldungen sind englisch, weil sie unveraendert an Browser und
//! Discord-Benutzer weitergegeben werden.

use echosprite_core::{BildFehler, EchoSpriteError};
use echosprite_db::DbError;
use thiserror::Error;

/// Fehler der Avatar-, Profil- und Konfigurationslogik
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("No avatar found")]
    KeinAvatar,

    #[error("User not found")]
    BenutzerNichtGefunden,

    #[error("Profile \"{0}\" doesn't exist")]
    ProfilNichtGefunden(String),

    #[error("You already have a profile named \"{0}\"")]
    ProfilExistiert(String),

    #[error("You can have a maximum of {0} profiles")]
    ProfilLimit(i64),

    #[error("You cannot delete your only profile")]
    LetztesProfil,

    #[error("You don't have an active profile")]
    KeinAktivesProfil,

    #[error("Avatar configuration not found")]
    ConfigNichtGefunden,

    #[error(transparent)]
    Validierung(#[from] EchoSpriteError),

    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] DbError),
}

impl From<BildFehler> for AvatarError {
    fn from(e: BildFehler) -> Self {
        Self::Validierung(e.into())
    }
}

impl AvatarError {
    /// Gibt true zurueck wenn eine gesuchte Ressource fehlt (HTTP 404)
    pub fn ist_nicht_gefunden(&self) -> bool {
        matches!(
            self,
            Self::KeinAvatar
                | Self::BenutzerNichtGefunden
                | Self::ProfilNichtGefunden(_)
                | Self::KeinAktivesProfil
                | Self::ConfigNichtGefunden
        )
    }

    /// Gibt true zurueck wenn der Aufrufer die Anfrage korrigieren kann (HTTP 400)
    pub fn ist_eingabefehler(&self) -> bool {
        match self {
            Self::Validierung(e) => e.ist_eingabefehler(),
            Self::ProfilExistiert(_) | Self::ProfilLimit(_) | Self::LetztesProfil => true,
            _ => false,
        }
    }
}

/// Result-Alias fuer die Avatar-Logik
pub type AvatarResult<T> = Result<T, AvatarError>;
