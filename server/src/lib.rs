//! echosprite-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Voice-Tracker, Viewer-Relay, Discord-Bot und
//! REST-API zu einem Prozess.

pub mod config;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use echosprite_api::{ApiState, RateLimiter, RestServer};
use echosprite_auth::{DiscordOAuth, SessionStore};
use echosprite_avatar::{AvatarService, ViewerUrls};
use echosprite_db::SqliteDb;
use echosprite_discord::{bot_starten, BotConfig, BotState, HttpBildLader};
use echosprite_observability::{observability_server_starten, EchoSpriteMetrics, HealthState};
use echosprite_signaling::{relay_starten, ViewerBroadcaster};
use echosprite_voice::VoiceTracker;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und migrieren
    /// 2. Dienste und Hintergrund-Tasks (Relay, Cleanup)
    /// 3. Discord-Bot (falls Token gesetzt)
    /// 4. Observability-Server
    /// 5. REST-API bis Ctrl-C / SIGTERM
    pub async fn starten(self) -> Result<()> {
        let config = self.config;
        let api_addr = config.api_bind_adresse()?;

        let db = Arc::new(SqliteDb::oeffnen(&config.datenbank_config()).await?);
        tracing::info!(url = %config.datenbank.url, "Datenbank bereit");

        let metriken = EchoSpriteMetrics::neu()?;
        let health = HealthState::neu();
        health.db_status_setzen(true);

        let urls = ViewerUrls::neu(config.web.frontend_url.clone());
        let avatar = Arc::new(AvatarService::neu(db.clone(), urls));
        let oauth = Arc::new(DiscordOAuth::neu(config.oauth_config())?);
        health.oauth_status_setzen(oauth.ist_konfiguriert());
        if !oauth.ist_konfiguriert() {
            tracing::warn!("Discord-OAuth nicht konfiguriert, Web-Login deaktiviert");
        }

        let sessions = SessionStore::neu();
        let tracker = VoiceTracker::neu();
        let broadcaster = ViewerBroadcaster::neu();
        let limiter = RateLimiter::neu(config.rate_limit_konfig());

        let mut tasks: Vec<JoinHandle<()>> = vec![
            relay_starten(&tracker, broadcaster.clone()),
            SessionStore::cleanup_starten(&sessions),
            RateLimiter::cleanup_starten(&limiter),
        ];

        match config.bot_token() {
            Some(token) => {
                let bot_config = BotConfig {
                    token: token.to_string(),
                    dev_guild_id: config.discord.dev_guild_id,
                };
                let bot_state = BotState {
                    avatar: avatar.clone(),
                    db: db.clone(),
                    tracker: tracker.clone(),
                    lader: Arc::new(HttpBildLader::neu()?),
                    health: health.clone(),
                    metriken: metriken.clone(),
                };
                tasks.push(tokio::spawn(async move {
                    if let Err(e) = bot_starten(bot_config, bot_state).await {
                        tracing::error!(fehler = %e, "Discord-Bot beendet");
                    }
                }));
            }
            None => {
                tracing::warn!("DISCORD_BOT_TOKEN nicht gesetzt, Bot wird nicht gestartet");
            }
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        if config.observability.aktiviert {
            let addr = config.observability_bind_adresse()?;
            let metriken = metriken.clone();
            let health = health.clone();
            let rx = shutdown_rx.clone();
            tasks.push(tokio::spawn(async move {
                if let Err(e) =
                    observability_server_starten(addr, metriken, health, warten(rx)).await
                {
                    tracing::error!(fehler = %e, "Observability-Server fehlgeschlagen");
                }
            }));
        }

        let state = ApiState {
            avatar,
            db: db.clone(),
            sessions,
            oauth,
            tracker,
            broadcaster,
            limiter,
            health,
            metriken,
            konfig: Arc::new(config.api_konfig()),
        };

        tracing::info!(
            adresse = %api_addr,
            frontend = %config.web.frontend_url,
            "Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)..."
        );

        let ergebnis = RestServer::neu(api_addr)
            .starten(state, async move {
                shutdown_signal().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
                let _ = shutdown_tx.send(true);
            })
            .await;

        for task in tasks {
            task.abort();
        }
        db.schliessen().await;
        tracing::info!("Server beendet");

        ergebnis
    }
}

/// Wartet bis der Shutdown-Kanal `true` meldet oder geschlossen wird
async fn warten(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

/// Ctrl-C oder (unter Unix) SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(fehler = %e, "Ctrl-C-Handler nicht verfuegbar");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(fehler = %e, "SIGTERM-Handler nicht verfuegbar");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
