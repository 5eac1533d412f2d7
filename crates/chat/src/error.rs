//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;

/// Chat-Fehlertypen
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is required")]
    LeereNachricht,

    #[error("Message too long: {0} characters (maximum: {})", crate::MAX_NACHRICHT_LAENGE)]
    ZuLang(usize),
}

pub type ChatResult<T> = Result<T, ChatError>;
