//! echosprite-api – REST-API fuer Webseite und OBS-Quellen
//!
//! - **Auth** (`/auth/...`): Discord-Login, Session-Cookie
//! - **API** (`/api/...`): Avatare, Voice-Snapshot, anonyme Konfigurationen,
//!   Chat, Admin-Statistiken
//! - **Viewer** (`/ws`): WebSocket fuer die OBS-Browserquellen
//!
//! Alle Antworten sind JSON, Fehler haben die Form
//! `{"success": false, "error": ..., "message": ...}`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod server;

use std::sync::Arc;

use echosprite_auth::{DiscordOAuth, SessionStore};
use echosprite_avatar::AvatarService;
use echosprite_db::SqliteDb;
use echosprite_observability::{EchoSpriteMetrics, HealthState};
use echosprite_signaling::ViewerBroadcaster;
use echosprite_voice::VoiceTracker;

pub use error::{ApiError, ApiResult};
pub use rate_limit::{LimitKlasse, RateLimitKonfig, RateLimiter};
pub use routes::router;
pub use server::RestServer;

/// Laufzeit-Einstellungen der API
#[derive(Debug, Clone, Default)]
pub struct ApiKonfig {
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt.
    pub cors_origins: Vec<String>,
    /// Produktionsmodus: Secure-Cookies, keine Details in 500er-Antworten
    pub produktion: bool,
    /// Bearer-Token fuer `/api/admin/...`; ohne Token sind die Endpunkte gesperrt
    pub admin_token: Option<String>,
}

/// Axum-State der REST-API
#[derive(Clone)]
pub struct ApiState {
    pub avatar: Arc<AvatarService<SqliteDb>>,
    pub db: Arc<SqliteDb>,
    pub sessions: Arc<SessionStore>,
    pub oauth: Arc<DiscordOAuth>,
    pub tracker: VoiceTracker,
    pub broadcaster: ViewerBroadcaster,
    pub limiter: Arc<RateLimiter>,
    pub health: HealthState,
    pub metriken: EchoSpriteMetrics,
    pub konfig: Arc<ApiKonfig>,
}
