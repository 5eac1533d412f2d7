//! Fehlertypen des Discord-Bots

use echosprite_avatar::AvatarError;
use echosprite_core::BildFehler;
use thiserror::Error;

/// Fehler bei der Befehlsverarbeitung
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Discord-Fehler: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Failed to download image")]
    Download,

    #[error(transparent)]
    Bild(#[from] BildFehler),

    #[error(transparent)]
    Avatar(#[from] AvatarError),

    #[error("Missing option: {0}")]
    FehlendeOption(String),

    #[error("Invalid option: {0}")]
    UngueltigeOption(String),

    #[error("Unknown command: {0}")]
    UnbekannterBefehl(String),
}

pub type BotResult<T> = Result<T, BotError>;
