//! Fehlertypen fuer die Viewer-Verteilung

use thiserror::Error;

/// Fehlertyp fuer die Viewer-Verteilung
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Abo-Parameter fehlen oder sind ungueltig
    #[error("Ungueltiges Abo: {0}")]
    UngueltigesAbo(#[from] echosprite_core::EchoSpriteError),

    /// WebSocket-Fehler beim Senden oder Empfangen
    #[error("WebSocket-Fehler: {0}")]
    WebSocket(#[from] axum::Error),

    /// Verbindung wurde getrennt
    #[error("Verbindung getrennt")]
    VerbindungGetrennt,
}

/// Result-Alias fuer die Viewer-Verteilung
pub type SignalingResult<T> = Result<T, SignalingError>;
