//! Admin-Endpunkte (Bearer-Token)

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use echosprite_core::DiscordUserId;
use echosprite_db::models::EreignisStatistik;
use serde::{Deserialize, Serialize};

use crate::auth::Admin;
use crate::error::{ApiError, ApiResult};
use crate::ApiState;

/// Zeitraum ohne Angabe: die letzten 7 Tage
const STANDARD_ZEITRAUM_TAGE: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenutzerEintrag {
    pub id: String,
    pub discord_id: DiscordUserId,
    pub username: String,
    pub discriminator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BenutzerListe {
    pub success: bool,
    pub count: usize,
    pub users: Vec<BenutzerEintrag>,
}

/// GET /api/admin/users
pub async fn benutzer(State(state): State<ApiState>, _: Admin) -> ApiResult<Json<BenutzerListe>> {
    let users: Vec<BenutzerEintrag> = state
        .avatar
        .benutzer_auflisten()
        .await?
        .into_iter()
        .map(|b| BenutzerEintrag {
            id: b.id.to_string(),
            discord_id: b.discord_id,
            username: b.username,
            discriminator: b.discriminator,
            created_at: b.created_at,
            updated_at: b.updated_at,
        })
        .collect();
    Ok(Json(BenutzerListe {
        success: true,
        count: users.len(),
        users,
    }))
}

#[derive(Debug, Deserialize)]
pub struct Zeitraum {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Akzeptiert RFC 3339 oder ein reines Datum (`YYYY-MM-DD`, Tagesbeginn UTC)
pub fn zeitpunkt_parsen(feld: &str, wert: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(wert) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(wert, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .ok_or_else(|| ApiError::validierung(format!("Invalid date for {feld}: {wert}")))
}

#[derive(Debug, Serialize)]
pub struct StatistikAntwort {
    pub success: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stats: Vec<EreignisStatistik>,
}

/// GET /api/admin/stats?start&end
pub async fn statistik(
    State(state): State<ApiState>,
    _: Admin,
    parameter: Result<Query<Zeitraum>, QueryRejection>,
) -> ApiResult<Json<StatistikAntwort>> {
    let Query(z) = parameter?;
    let end = match z.end.as_deref() {
        Some(w) => zeitpunkt_parsen("end", w)?,
        None => Utc::now(),
    };
    let start = match z.start.as_deref() {
        Some(w) => zeitpunkt_parsen("start", w)?,
        None => end - Duration::days(STANDARD_ZEITRAUM_TAGE),
    };

    let stats = state.avatar.statistik(start, end).await?;
    Ok(Json(StatistikAntwort {
        success: true,
        start,
        end,
        stats,
    }))
}
