//! Authentifizierung der REST-API
//!
//! Browser melden sich per Session-Cookie an, Admin-Endpunkte erwarten einen
//! Bearer-Token.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use echosprite_auth::{Session, SessionStore, SESSION_COOKIE};
use echosprite_auth::session::SESSION_TTL_SEKUNDEN;

use crate::error::ApiError;
use crate::ApiState;

/// Liest das Session-Token aus dem `Cookie`-Header
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|paar| paar.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, wert)| wert)
        .filter(|wert| !wert.is_empty())
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// `Set-Cookie`-Wert fuer eine neue Session
///
/// Im Produktionsmodus liegt das Frontend auf einer anderen Domain, dort
/// muss der Cookie `SameSite=None; Secure` sein.
pub fn session_cookie(token: &str, produktion: bool) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; Max-Age={SESSION_TTL_SEKUNDEN}; {}",
        same_site(produktion)
    )
}

/// `Set-Cookie`-Wert, der die Session im Browser entfernt
pub fn cookie_loeschen(produktion: bool) -> String {
    format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0; {}",
        same_site(produktion)
    )
}

fn same_site(produktion: bool) -> &'static str {
    if produktion {
        "SameSite=None; Secure"
    } else {
        "SameSite=Lax"
    }
}

/// Prueft das Session-Cookie einer Anfrage
pub async fn session_pruefen(
    sessions: &SessionStore,
    headers: &HeaderMap,
) -> Result<Session, ApiError> {
    let token = session_token(headers).ok_or(ApiError::NichtAngemeldet)?;
    sessions
        .validieren(token)
        .await
        .map_err(|_| ApiError::NichtAngemeldet)
}

/// Eingeloggter Benutzer (Handler-Argument)
#[derive(Debug, Clone)]
pub struct Angemeldet(pub Session);

#[async_trait]
impl FromRequestParts<ApiState> for Angemeldet {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        match session_pruefen(&state.sessions, &parts.headers).await {
            Ok(session) => Ok(Self(session)),
            Err(e) => {
                tracing::warn!(pfad = %parts.uri.path(), "Nicht angemeldeter Zugriff");
                Err(e)
            }
        }
    }
}

/// Zugriff mit dem konfigurierten Admin-Token
#[derive(Debug, Clone, Copy)]
pub struct Admin;

/// Vergleich ohne fruehen Abbruch beim ersten Unterschied
fn gleich(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait]
impl FromRequestParts<ApiState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let Some(erwartet) = state.konfig.admin_token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(ApiError::Verboten("Admin access is disabled"));
        };
        let token = bearer_token(&parts.headers).ok_or(ApiError::NichtAngemeldet)?;
        if gleich(token.as_bytes(), erwartet.as_bytes()) {
            Ok(Self)
        } else {
            tracing::warn!(pfad = %parts.uri.path(), "Ungueltiger Admin-Token");
            Err(ApiError::Verboten("Invalid admin token"))
        }
    }
}
