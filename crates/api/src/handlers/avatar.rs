//! Avatar-Endpunkte fuer die Webseite und die OBS-Quelle

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use echosprite_avatar::{AvatarError, Quelle, ViewerAvatar};
use echosprite_core::{AvatarBilder, AvatarEinstellungen, DiscordUserId};
use serde::{Deserialize, Serialize};

use crate::auth::Angemeldet;
use crate::error::ApiResult;
use crate::handlers::Erfolg;
use crate::ApiState;

/// Body von PUT /api/avatar
#[derive(Debug, Deserialize)]
pub struct AvatarUpload {
    #[serde(flatten)]
    pub bilder: AvatarBilder,
    #[serde(default)]
    pub settings: AvatarEinstellungen,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAntwort {
    pub success: bool,
    pub message: &'static str,
    pub viewer_url: String,
}

/// PUT /api/avatar – Basis-Avatar des eingeloggten Benutzers speichern
pub async fn hochladen(
    State(state): State<ApiState>,
    Angemeldet(session): Angemeldet,
    body: Result<Json<AvatarUpload>, JsonRejection>,
) -> ApiResult<Json<UploadAntwort>> {
    let Json(upload) = body?;
    state
        .avatar
        .avatar_speichern(session.user_id, upload.bilder, upload.settings, Quelle::Web)
        .await?;
    Ok(Json(UploadAntwort {
        success: true,
        message: "Avatar saved successfully",
        viewer_url: state.avatar.urls().einzel(session.discord_id),
    }))
}

/// DELETE /api/avatar
pub async fn loeschen(
    State(state): State<ApiState>,
    Angemeldet(session): Angemeldet,
) -> ApiResult<Json<Erfolg>> {
    if state
        .avatar
        .avatar_loeschen(session.discord_id, Quelle::Web)
        .await?
    {
        Ok(Json(Erfolg::neu("Avatar deleted successfully")))
    } else {
        Err(AvatarError::KeinAvatar.into())
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilParameter {
    pub profile: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarAntwort {
    pub success: bool,
    pub discord_id: DiscordUserId,
    #[serde(flatten)]
    pub viewer: ViewerAvatar,
}

/// GET /api/avatar/:discordId – oeffentlich, fuer die OBS-Quelle
pub async fn abrufen(
    State(state): State<ApiState>,
    pfad: Result<Path<String>, PathRejection>,
    parameter: Result<Query<ProfilParameter>, QueryRejection>,
) -> ApiResult<Json<AvatarAntwort>> {
    let Path(roh) = pfad?;
    let Query(p) = parameter?;
    let discord_id: DiscordUserId = roh.parse()?;

    let profil = p.profile.as_deref().filter(|s| !s.trim().is_empty());
    let viewer = state.avatar.avatar_fuer_viewer(discord_id, profil).await?;
    Ok(Json(AvatarAntwort {
        success: true,
        discord_id,
        viewer,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SprechBody {
    pub speaking: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprechAntwort {
    pub success: bool,
    pub in_voice: bool,
    pub changed: bool,
}

/// PUT /api/voice/speaking – vom Browser erkannter Sprechstatus
pub async fn sprechen(
    State(state): State<ApiState>,
    Angemeldet(session): Angemeldet,
    body: Result<Json<SprechBody>, JsonRejection>,
) -> ApiResult<Json<SprechAntwort>> {
    let Json(body) = body?;
    let in_voice = state.tracker.kanal_von(session.discord_id).is_some();
    let changed = state
        .tracker
        .sprechen_setzen(session.discord_id, body.speaking)
        .is_some();
    Ok(Json(SprechAntwort {
        success: true,
        in_voice,
        changed,
    }))
}
