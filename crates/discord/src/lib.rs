//! echosprite-discord – Discord-Bot
//!
//! Spiegelt Voice-States in den [`VoiceTracker`] und beantwortet die
//! Slash-Commands `/avatar`, `/channel`, `/settings`, `/profile`, `/help`
//! und `/status`. Alle Antworten sind ephemere Embeds.
//!
//! ## Module
//! - [`befehl`] – Optionen lesen, typisierte Befehle
//! - [`definitionen`] – Befehlsdefinitionen fuer die Registrierung
//! - [`dispatcher`] – Routing an die [`handlers`]
//! - [`gateway`] – serenity-EventHandler und Start

pub mod antwort;
pub mod befehl;
pub mod definitionen;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod kontext;
pub mod lader;

use std::sync::Arc;

use echosprite_avatar::AvatarService;
use echosprite_core::GuildId;
use echosprite_db::SqliteDb;
use echosprite_observability::{EchoSpriteMetrics, HealthState};
use echosprite_voice::VoiceTracker;

pub use antwort::Antwort;
pub use befehl::BotBefehl;
pub use definitionen::befehle_definieren;
pub use error::{BotError, BotResult};
pub use gateway::bot_starten;
pub use lader::{BildLader, HttpBildLader};

/// Zugangsdaten des Bots
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Befehle nur in dieser Guild registrieren (sofort sichtbar)
    pub dev_guild_id: Option<GuildId>,
}

/// Gemeinsamer Zustand aller Handler
#[derive(Clone)]
pub struct BotState {
    pub avatar: Arc<AvatarService<SqliteDb>>,
    pub db: Arc<SqliteDb>,
    pub tracker: VoiceTracker,
    pub lader: Arc<dyn BildLader>,
    pub health: HealthState,
    pub metriken: EchoSpriteMetrics,
}
