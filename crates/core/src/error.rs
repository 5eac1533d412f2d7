//! Fehlertypen fuer EchoSprite
//!
//! Zentraler Fehler-Enum fuer Validierungs- und Domaenenfehler.
//! Die einzelnen Crates definieren eigene Fehler und konvertieren via `#[from]`.

use thiserror::Error;

/// Globaler Result-Alias fuer EchoSprite
pub type Result<T> = std::result::Result<T, EchoSpriteError>;

/// Domaenenfehler die von mehreren Crates geteilt werden
#[derive(Debug, Error)]
pub enum EchoSpriteError {
    // --- Eingaben (Meldung geht unveraendert an den Client) ---
    #[error("{0}")]
    Validierung(String),

    #[error("Invalid Discord ID: {0}")]
    UngueltigeId(String),

    // --- Bilder ---
    #[error(transparent)]
    Bild(#[from] crate::bild::BildFehler),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl EchoSpriteError {
    /// Erstellt einen Validierungsfehler aus einer beliebigen Nachricht
    pub fn validierung(msg: impl Into<String>) -> Self {
        Self::Validierung(msg.into())
    }

    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler durch ungueltige Eingaben entstand
    pub fn ist_eingabefehler(&self) -> bool {
        matches!(
            self,
            Self::Validierung(_) | Self::UngueltigeId(_) | Self::Bild(_)
        )
    }
}
