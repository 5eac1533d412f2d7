//! Fehlertypen der REST-API
//!
//! Jede Fehlerantwort hat die Form `{"success": false, "error": ..., "message": ...}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use echosprite_auth::AuthError;
use echosprite_avatar::AvatarError;
use echosprite_chat::ChatError;
use echosprite_core::EchoSpriteError;
use serde_json::json;
use thiserror::Error;

/// Meldung fuer 500er-Antworten im Produktionsmodus
pub const VERBORGENE_MELDUNG: &str = "An unexpected error occurred";

/// Alle Fehler, die ein Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validierung(String),

    #[error("Unauthorized")]
    NichtAngemeldet,

    #[error("Forbidden")]
    Verboten(&'static str),

    #[error("Payload too large")]
    ZuGross,

    #[error(transparent)]
    Avatar(#[from] AvatarError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Domaene(#[from] EchoSpriteError),

    #[error("{0}")]
    Intern(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validierung(msg: impl Into<String>) -> Self {
        Self::Validierung(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validierung(_) | Self::Chat(_) => StatusCode::BAD_REQUEST,
            Self::NichtAngemeldet => StatusCode::UNAUTHORIZED,
            Self::Verboten(_) => StatusCode::FORBIDDEN,
            Self::ZuGross => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Avatar(e) if e.ist_nicht_gefunden() => StatusCode::NOT_FOUND,
            Self::Avatar(e) if e.ist_eingabefehler() => StatusCode::BAD_REQUEST,
            Self::Avatar(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(AuthError::SessionUngueltig | AuthError::SessionAbgelaufen) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::StateUngueltig) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::CodeAbgelehnt(_)) => StatusCode::UNAUTHORIZED,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Domaene(e) if e.ist_eingabefehler() => StatusCode::BAD_REQUEST,
            Self::Domaene(_) | Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Zweiter Teil der Antwort (`message`)
    fn meldung(&self) -> String {
        match self {
            Self::NichtAngemeldet => "You must be logged in to access this resource.".into(),
            Self::Verboten(grund) => (*grund).into(),
            _ => match self.status() {
                StatusCode::BAD_REQUEST => "Invalid input data".into(),
                StatusCode::NOT_FOUND => "The requested resource does not exist".into(),
                StatusCode::UNAUTHORIZED => "Authentication failed".into(),
                StatusCode::PAYLOAD_TOO_LARGE => "Request body exceeds 15 MiB".into(),
                _ => self.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = if status.is_server_error() {
            tracing::error!(fehler = %self, "Interner Fehler bei API-Anfrage");
            ("Internal server error".to_string(), self.meldung())
        } else {
            if status == StatusCode::BAD_REQUEST {
                tracing::warn!(fehler = %self, "Validierung fehlgeschlagen");
            }
            (self.to_string(), self.meldung())
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": error,
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        if r.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::ZuGross;
        }
        Self::Validierung(r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self::Validierung(r.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self::Validierung(r.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuscodes() {
        assert_eq!(ApiError::validierung("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NichtAngemeldet.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Verboten("nein").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(AvatarError::KeinAvatar).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AvatarError::LetztesProfil).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::StateUngueltig).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::NichtKonfiguriert).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ChatError::LeereNachricht).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(EchoSpriteError::UngueltigeId("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn meldungen() {
        let e = ApiError::from(AvatarError::ConfigNichtGefunden);
        assert_eq!(e.to_string(), "Avatar configuration not found");
        assert_eq!(e.meldung(), "The requested resource does not exist");
        assert_eq!(
            ApiError::NichtAngemeldet.meldung(),
            "You must be logged in to access this resource."
        );
        assert_eq!(ApiError::intern("kaputt").meldung(), "kaputt");
    }
}
