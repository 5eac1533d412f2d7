//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Umgebungsvariablen (auch aus `.env`) ueberschreiben die
//! Datei.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};
use echosprite_api::{rate_limit::Limit, ApiKonfig, RateLimitKonfig};
use echosprite_auth::OAuthConfig;
use echosprite_avatar::urls::STANDARD_FRONTEND_URL;
use echosprite_core::GuildId;
use echosprite_db::DatabaseConfig;
use echosprite_observability::logging::{log_format_gueltig, log_level_gueltig};
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub netzwerk: NetzwerkEinstellungen,
    pub datenbank: DatenbankEinstellungen,
    pub logging: LoggingEinstellungen,
    /// Bot-Token und OAuth-Anwendung
    pub discord: DiscordEinstellungen,
    /// Frontend, CORS, Betriebsmodus
    pub web: WebEinstellungen,
    pub rate_limit: RateLimitEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    /// Port fuer REST-API und Viewer-WebSocket
    pub port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://echosprite.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Discord-Einstellungen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordEinstellungen {
    /// Ohne Token startet der Server ohne Bot
    pub bot_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Befehle nur in dieser Guild registrieren
    pub dev_guild_id: Option<GuildId>,
}

/// Betriebsmodus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Umgebung {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Umgebung {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            anders => bail!("Unbekannte Umgebung '{anders}' (erwartet: development, production)"),
        }
    }
}

/// Frontend- und Web-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebEinstellungen {
    /// Basis-URL des Frontends (Viewer-Seiten, Login-Weiterleitung)
    pub frontend_url: String,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
    pub umgebung: Umgebung,
    /// Bearer-Token fuer `/api/admin/...`
    pub admin_token: Option<String>,
}

impl Default for WebEinstellungen {
    fn default() -> Self {
        Self {
            frontend_url: STANDARD_FRONTEND_URL.into(),
            cors_origins: vec![],
            umgebung: Umgebung::Development,
            admin_token: None,
        }
    }
}

/// Rate-Limits pro Client-IP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitEinstellungen {
    pub api_max: u32,
    pub api_fenster_sekunden: u64,
    pub auth_max: u32,
    pub auth_fenster_sekunden: u64,
    pub upload_max: u32,
    pub upload_fenster_sekunden: u64,
}

impl Default for RateLimitEinstellungen {
    fn default() -> Self {
        Self {
            api_max: 100,
            api_fenster_sekunden: 15 * 60,
            auth_max: 10,
            auth_fenster_sekunden: 15 * 60,
            upload_max: 50,
            upload_fenster_sekunden: 60 * 60,
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    /// Port fuer Metriken und Health (Standard: 9300)
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
        }
    }
}

/// Leere Werte aus der Umgebung gelten als nicht gesetzt
fn nicht_leer(wert: Option<String>) -> Option<String> {
    wert.map(|w| w.trim().to_string()).filter(|w| !w.is_empty())
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Uebernimmt Umgebungsvariablen; `lookup` liefert den Wert einer Variable
    pub fn umgebung_anwenden(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        let var = |name: &str| nicht_leer(lookup(name));

        if let Some(port) = var("PORT") {
            self.netzwerk.port = port
                .parse()
                .with_context(|| format!("PORT ist keine gueltige Portnummer: {port}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.datenbank.url = url;
        }

        if let Some(token) = var("DISCORD_BOT_TOKEN") {
            self.discord.bot_token = Some(token);
        }
        if let Some(id) = var("DISCORD_CLIENT_ID") {
            self.discord.client_id = Some(id);
        }
        if let Some(secret) = var("DISCORD_CLIENT_SECRET") {
            self.discord.client_secret = Some(secret);
        }
        if let Some(uri) = var("DISCORD_REDIRECT_URI") {
            self.discord.redirect_uri = Some(uri);
        }
        if let Some(guild) = var("DISCORD_DEV_GUILD_ID") {
            self.discord.dev_guild_id = Some(
                guild
                    .parse()
                    .with_context(|| format!("DISCORD_DEV_GUILD_ID ungueltig: {guild}"))?,
            );
        }

        if let Some(url) = var("FRONTEND_URL") {
            self.web.frontend_url = url;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            self.web.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(umgebung) = var("ECHOSPRITE_ENV") {
            self.web.umgebung = umgebung.parse()?;
        }
        if let Some(token) = var("ECHOSPRITE_ADMIN_TOKEN") {
            self.web.admin_token = Some(token);
        }
        Ok(())
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            bail!("Ungueltiges Log-Level: {}", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            bail!("Ungueltiges Log-Format: {}", self.logging.format);
        }
        let r = &self.rate_limit;
        if r.api_max == 0 || r.auth_max == 0 || r.upload_max == 0 {
            bail!("Rate-Limits muessen groesser als 0 sein");
        }
        self.api_bind_adresse()?;
        if self.observability.aktiviert {
            self.observability_bind_adresse()?;
        }
        Ok(())
    }

    pub fn ist_produktion(&self) -> bool {
        self.web.umgebung == Umgebung::Production
    }

    /// Bind-Adresse fuer REST-API und WebSocket
    pub fn api_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port);
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse: {adresse}"))
    }

    /// Bind-Adresse fuer den Observability-Server
    pub fn observability_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.netzwerk.bind_adresse, self.observability.port);
        adresse
            .parse()
            .with_context(|| format!("Ungueltige Observability-Adresse: {adresse}"))
    }

    pub fn datenbank_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.wal,
        }
    }

    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig {
            client_id: self.discord.client_id.clone(),
            client_secret: self.discord.client_secret.clone(),
            redirect_uri: self.discord.redirect_uri.clone(),
        }
    }

    pub fn api_konfig(&self) -> ApiKonfig {
        ApiKonfig {
            cors_origins: self.web.cors_origins.clone(),
            produktion: self.ist_produktion(),
            admin_token: self.web.admin_token.clone(),
        }
    }

    pub fn rate_limit_konfig(&self) -> RateLimitKonfig {
        let r = &self.rate_limit;
        RateLimitKonfig {
            allgemein: Limit::neu(r.api_max, Duration::from_secs(r.api_fenster_sekunden)),
            auth: Limit::neu(r.auth_max, Duration::from_secs(r.auth_fenster_sekunden)),
            upload: Limit::neu(r.upload_max, Duration::from_secs(r.upload_fenster_sekunden)),
        }
    }

    /// Bot-Token, falls der Bot gestartet werden soll
    pub fn bot_token(&self) -> Option<&str> {
        self.discord
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn umgebung(paare: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = paare
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        cfg.validieren().unwrap();
        assert_eq!(cfg.netzwerk.port, 3000);
        assert_eq!(cfg.datenbank.url, "sqlite://echosprite.db");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.web.frontend_url, "https://rattusking.github.io/echosprite");
        assert!(!cfg.ist_produktion());
        assert!(cfg.bot_token().is_none());
    }

    #[test]
    fn bind_adressen() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.api_bind_adresse().unwrap().to_string(), "0.0.0.0:3000");
        assert_eq!(
            cfg.observability_bind_adresse().unwrap().to_string(),
            "0.0.0.0:9300"
        );
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [netzwerk]
            port = 8080

            [discord]
            dev_guild_id = "123456789"

            [web]
            umgebung = "production"
            cors_origins = ["https://a.example"]

            [rate_limit]
            upload_max = 5
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.netzwerk.port, 8080);
        assert_eq!(cfg.discord.dev_guild_id, Some(GuildId(123456789)));
        assert!(cfg.ist_produktion());
        assert_eq!(cfg.api_konfig().cors_origins, vec!["https://a.example"]);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.netzwerk.bind_adresse, "0.0.0.0");
        assert_eq!(cfg.rate_limit_konfig().upload.max, 5);
        assert_eq!(cfg.rate_limit_konfig().auth.max, 10);
    }

    #[test]
    fn umgebungsvariablen_ueberschreiben() {
        let mut cfg = ServerConfig::default();
        cfg.umgebung_anwenden(umgebung(&[
            ("PORT", "4000"),
            ("DATABASE_URL", "sqlite://test.db"),
            ("DISCORD_BOT_TOKEN", "bot-token"),
            ("DISCORD_CLIENT_ID", "42"),
            ("DISCORD_DEV_GUILD_ID", "987"),
            ("FRONTEND_URL", "https://frontend.example"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("ECHOSPRITE_ENV", "production"),
            ("ECHOSPRITE_ADMIN_TOKEN", "admin"),
            ("DISCORD_CLIENT_SECRET", ""),
        ]))
        .unwrap();

        assert_eq!(cfg.netzwerk.port, 4000);
        assert_eq!(cfg.datenbank.url, "sqlite://test.db");
        assert_eq!(cfg.bot_token(), Some("bot-token"));
        assert_eq!(cfg.oauth_config().client_id.as_deref(), Some("42"));
        assert!(cfg.oauth_config().client_secret.is_none());
        assert_eq!(cfg.discord.dev_guild_id, Some(GuildId(987)));
        assert_eq!(cfg.web.frontend_url, "https://frontend.example");
        assert_eq!(
            cfg.web.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(cfg.ist_produktion());
        assert_eq!(cfg.api_konfig().admin_token.as_deref(), Some("admin"));
    }

    #[test]
    fn ungueltige_umgebung() {
        let mut cfg = ServerConfig::default();
        assert!(cfg.umgebung_anwenden(umgebung(&[("PORT", "abc")])).is_err());
        assert!(cfg
            .umgebung_anwenden(umgebung(&[("ECHOSPRITE_ENV", "staging")]))
            .is_err());
        assert!(cfg
            .umgebung_anwenden(umgebung(&[("DISCORD_DEV_GUILD_ID", "guild")]))
            .is_err());
    }

    #[test]
    fn validierung() {
        let mut cfg = ServerConfig::default();
        cfg.logging.level = "laut".into();
        assert!(cfg.validieren().is_err());

        let mut cfg = ServerConfig::default();
        cfg.rate_limit.auth_max = 0;
        assert!(cfg.validieren().is_err());

        let mut cfg = ServerConfig::default();
        cfg.netzwerk.bind_adresse = "kein host".into();
        assert!(cfg.validieren().is_err());
    }
}
