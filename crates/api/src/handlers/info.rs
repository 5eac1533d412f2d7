//! Dienstinformationen und Health-Check

use axum::{extract::State, response::Json};
use echosprite_observability::HealthResponse;
use serde_json::{json, Value};

use crate::ApiState;

/// GET / – Name, Version und Endpunktliste
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "EchoSprite API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "login": "GET /auth/discord",
            "me": "GET /auth/me",
            "logout": "GET /auth/logout",
            "uploadAvatar": "PUT /api/avatar",
            "deleteAvatar": "DELETE /api/avatar",
            "getAvatar": "GET /api/avatar/:discordId",
            "channelMembers": "GET /api/channel/:channelId/members",
            "speaking": "PUT /api/voice/speaking",
            "saveConfig": "POST /api/avatar-config",
            "getConfig": "GET /api/avatar-config/:publicId",
            "configStats": "GET /api/avatar-config/:publicId/stats",
            "lumimon": "POST /api/lumimon/chat",
            "monster": "POST /api/monster/chat",
            "websocket": "GET /ws?channelId=<id> | /ws?userId=<id>"
        }
    }))
}

/// GET /health – prueft die Datenbank live und liefert den Gesamtstatus
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let erreichbar = state.db.ist_erreichbar().await;
    state.health.db_status_setzen(erreichbar);
    Json(state.health.antwort())
}
