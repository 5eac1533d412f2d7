//! Lumimon- und Monster-Chat

use axum::{extract::rejection::JsonRejection, response::Json};
use echosprite_chat::{lumimon, monster_antwort, LumimonWerte};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
    /// Werte aus dem Browser, fehlen beim ersten Aufruf
    #[serde(default)]
    pub stats: Option<LumimonWerte>,
}

#[derive(Debug, Serialize)]
pub struct LumimonChatAntwort {
    pub success: bool,
    pub reply: String,
    pub stats: LumimonWerte,
}

/// POST /api/lumimon/chat
pub async fn lumimon(
    body: Result<Json<ChatBody>, JsonRejection>,
) -> ApiResult<Json<LumimonChatAntwort>> {
    let Json(body) = body?;
    let antwort = lumimon::antworten(&body.message, body.stats.unwrap_or_default())?;
    Ok(Json(LumimonChatAntwort {
        success: true,
        reply: antwort.reply,
        stats: antwort.stats,
    }))
}

#[derive(Debug, Serialize)]
pub struct MonsterChatAntwort {
    pub success: bool,
    pub reply: &'static str,
}

/// POST /api/monster/chat
pub async fn monster(
    body: Result<Json<ChatBody>, JsonRejection>,
) -> ApiResult<Json<MonsterChatAntwort>> {
    let Json(body) = body?;
    Ok(Json(MonsterChatAntwort {
        success: true,
        reply: monster_antwort(&body.message),
    }))
}
