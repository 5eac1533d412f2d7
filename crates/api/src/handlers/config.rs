//! Anonyme Avatar-Konfigurationen (Ablauf ohne Discord-Login)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use echosprite_avatar::{KonfigurationsStatistik, NeueKonfiguration, OeffentlicheKonfiguration};
use serde::Serialize;

use crate::error::ApiResult;
use crate::ApiState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GespeichertAntwort {
    pub success: bool,
    pub public_id: String,
    pub message: &'static str,
}

/// POST /api/avatar-config
pub async fn speichern(
    State(state): State<ApiState>,
    body: Result<Json<NeueKonfiguration>, JsonRejection>,
) -> ApiResult<Json<GespeichertAntwort>> {
    let Json(eingabe) = body?;
    let record = state.avatar.config_speichern(eingabe).await?;
    Ok(Json(GespeichertAntwort {
        success: true,
        public_id: record.public_id,
        message: "Avatar configuration saved successfully",
    }))
}

#[derive(Debug, Serialize)]
pub struct KonfigurationAntwort {
    pub success: bool,
    pub config: OeffentlicheKonfiguration,
}

/// GET /api/avatar-config/:publicId – zaehlt den Zugriff
pub async fn laden(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
) -> ApiResult<Json<KonfigurationAntwort>> {
    let config = state.avatar.config_laden(&public_id).await?;
    Ok(Json(KonfigurationAntwort {
        success: true,
        config,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatistikAntwort {
    pub success: bool,
    pub stats: KonfigurationsStatistik,
}

/// GET /api/avatar-config/:publicId/stats
pub async fn statistik(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
) -> ApiResult<Json<StatistikAntwort>> {
    let stats = state.avatar.config_statistik(&public_id).await?;
    Ok(Json(StatistikAntwort {
        success: true,
        stats,
    }))
}
