//! EchoSprite Server – Einstiegspunkt
//!
//! Laedt `.env` und die Konfiguration, initialisiert das Logging und
//! startet den Server.

use anyhow::Result;
use echosprite_observability::logging_initialisieren;
use echosprite_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Fehlende .env ist kein Fehler
    dotenvy::dotenv().ok();

    let config_pfad =
        std::env::var("ECHOSPRITE_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let mut config = ServerConfig::laden(&config_pfad)?;
    config.umgebung_anwenden(|name| std::env::var(name).ok())?;
    config.validieren()?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        produktion = config.ist_produktion(),
        "EchoSprite Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
