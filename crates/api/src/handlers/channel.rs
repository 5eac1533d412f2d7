//! Voice-Kanal-Snapshot

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
};
use echosprite_core::VoiceChannelId;
use echosprite_protocol::ViewerMitglied;
use echosprite_signaling::relay::viewer_mitglied;
use serde::Serialize;

use crate::error::ApiResult;
use crate::ApiState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MitgliederAntwort {
    pub success: bool,
    pub channel_id: VoiceChannelId,
    pub count: usize,
    pub members: Vec<ViewerMitglied>,
}

/// GET /api/channel/:channelId/members
pub async fn mitglieder(
    State(state): State<ApiState>,
    pfad: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MitgliederAntwort>> {
    let Path(roh) = pfad?;
    let channel_id: VoiceChannelId = roh.parse()?;
    let members: Vec<ViewerMitglied> = state
        .tracker
        .mitglieder_in_kanal(channel_id)
        .iter()
        .map(viewer_mitglied)
        .collect();
    Ok(Json(MitgliederAntwort {
        success: true,
        channel_id,
        count: members.len(),
        members,
    }))
}
