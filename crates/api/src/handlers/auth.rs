//! Discord-Login: Weiterleitung, Callback, aktueller Benutzer, Logout

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Redirect, Response},
};
use chrono::{DateTime, Utc};
use echosprite_core::DiscordUserId;
use echosprite_db::models::BenutzerDaten;
use serde::{Deserialize, Serialize};

use crate::auth::{cookie_loeschen, session_cookie, session_token, Angemeldet};
use crate::error::{ApiError, ApiResult};
use crate::handlers::Erfolg;
use crate::ApiState;

/// GET /auth/discord – leitet zur Discord-Autorisierung weiter
pub async fn login(State(state): State<ApiState>) -> ApiResult<Redirect> {
    let url = state.oauth.autorisierungs_url()?;
    Ok(Redirect::to(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParameter {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Gesetzt wenn der Benutzer die Autorisierung abgelehnt hat
    pub error: Option<String>,
}

/// Ziel im Frontend nach dem Login
fn frontend_ziel(state: &ApiState, ergebnis: &str) -> String {
    format!(
        "{}/app-discord.html?login={ergebnis}",
        state.avatar.urls().basis()
    )
}

/// GET /auth/discord/callback – Code einloesen, Session anlegen
pub async fn callback(
    State(state): State<ApiState>,
    parameter: Result<Query<CallbackParameter>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(p) = parameter?;

    if let Some(grund) = p.error {
        tracing::info!(grund = %grund, "Discord-Login abgebrochen");
        return Ok(Redirect::to(&frontend_ziel(&state, "cancelled")).into_response());
    }
    let (Some(code), Some(oauth_state)) = (p.code, p.state) else {
        return Err(ApiError::validierung("Missing code or state"));
    };

    state.oauth.state_pruefen(&oauth_state)?;
    let profil = state.oauth.code_einloesen(&code).await?;

    let benutzer = state
        .avatar
        .benutzer_sicherstellen(BenutzerDaten {
            discord_id: profil.id,
            username: profil.anzeigename(),
            discriminator: profil.discriminator.as_deref(),
            avatar: profil.avatar.as_deref(),
        })
        .await?;
    let session = state
        .sessions
        .erstellen(benutzer.id, benutzer.discord_id)
        .await?;

    state
        .avatar
        .ereignis_protokollieren(
            "login",
            Some(benutzer.id),
            serde_json::json!({ "discordId": benutzer.discord_id }),
        )
        .await;

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&session.token, state.konfig.produktion),
        )],
        Redirect::to(&frontend_ziel(&state, "success")),
    )
        .into_response())
}

/// Antwort von GET /auth/me
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeAntwort {
    pub id: String,
    pub discord_id: DiscordUserId,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// GET /auth/me – aktueller Benutzer
pub async fn me(
    State(state): State<ApiState>,
    Angemeldet(session): Angemeldet,
) -> ApiResult<Json<MeAntwort>> {
    let b = state.avatar.benutzer_laden(session.user_id).await?;
    Ok(Json(MeAntwort {
        id: b.id.to_string(),
        discord_id: b.discord_id,
        username: b.username,
        discriminator: b.discriminator,
        avatar: b.avatar,
        created_at: b.created_at,
    }))
}

/// GET /auth/logout – Session beenden, Cookie loeschen
pub async fn logout(State(state): State<ApiState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if state.sessions.invalidieren(token).await {
            tracing::info!("Benutzer abgemeldet");
        }
    }
    (
        [(header::SET_COOKIE, cookie_loeschen(state.konfig.produktion))],
        Json(Erfolg::neu("Logged out successfully")),
    )
}
