//! Fehlertypen fuer Sessions und OAuth

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Crate
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Session ---
    #[error("Session nicht gefunden oder abgelaufen")]
    SessionUngueltig,

    #[error("Session abgelaufen")]
    SessionAbgelaufen,

    // --- OAuth ---
    #[error("Discord OAuth not configured")]
    NichtKonfiguriert,

    #[error("OAuth-State ungueltig oder abgelaufen")]
    StateUngueltig,

    #[error("Discord hat den Code abgelehnt: {0}")]
    CodeAbgelehnt(String),

    #[error("Discord-Anfrage fehlgeschlagen: {0}")]
    Http(#[from] reqwest::Error),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer das Auth-Crate
pub type AuthResult<T> = Result<T, AuthError>;
