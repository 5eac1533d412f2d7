//! Discord-OAuth2 (Authorization Code Flow, Scope `identify`)
//!
//! Ablauf: `autorisierungs_url` erzeugt einen zufaelligen `state` und merkt
//! ihn sich fuer zehn Minuten. Der Callback prueft den `state` genau einmal
//! und tauscht den Code gegen ein Access-Token, mit dem das Profil unter
//! `/users/@me` geladen wird.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use echosprite_core::DiscordUserId;
use serde::Deserialize;

use crate::error::{AuthError, AuthResult};
use crate::session::token_generieren;

const AUTORISIERUNGS_URL: &str = "https://discord.com/oauth2/authorize";
const STANDARD_API_BASIS: &str = "https://discord.com/api/v10";
const STATE_TTL: Duration = Duration::from_secs(10 * 60);
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Zugangsdaten der Discord-Anwendung
#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Antwort von `/oauth2/token`
#[derive(Debug, Deserialize)]
struct TokenAntwort {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Profil aus `/users/@me`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiscordProfil {
    pub id: DiscordUserId,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
}

impl DiscordProfil {
    /// Anzeigename (globaler Name vor Benutzername)
    pub fn anzeigename(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// Discord-OAuth2-Client
#[derive(Debug)]
pub struct DiscordOAuth {
    config: OAuthConfig,
    api_basis: String,
    http: reqwest::Client,
    /// state -> Erstellungszeitpunkt
    offene_states: DashMap<String, Instant>,
}

impl DiscordOAuth {
    pub fn neu(config: OAuthConfig) -> AuthResult<Self> {
        Self::mit_api_basis(config, STANDARD_API_BASIS)
    }

    /// Wie `neu`, aber gegen eine andere API-Basis-URL
    pub fn mit_api_basis(config: OAuthConfig, api_basis: impl Into<String>) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!(fehler = %e, "HTTP-Client fuer Discord-OAuth nicht erstellbar");
                AuthError::Http(e)
            })?;
        Ok(Self {
            config,
            api_basis: api_basis.into(),
            http,
            offene_states: DashMap::new(),
        })
    }

    /// Gibt true zurueck wenn Client-ID, Secret und Redirect-URI gesetzt sind
    pub fn ist_konfiguriert(&self) -> bool {
        self.zugangsdaten().is_ok()
    }

    fn zugangsdaten(&self) -> AuthResult<(&str, &str, &str)> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
            self.config.redirect_uri.as_deref(),
        ) {
            (Some(id), Some(secret), Some(redirect))
                if !id.is_empty() && !secret.is_empty() && !redirect.is_empty() =>
            {
                Ok((id, secret, redirect))
            }
            _ => Err(AuthError::NichtKonfiguriert),
        }
    }

    /// Erzeugt die Discord-Autorisierungs-URL mit frischem `state`
    pub fn autorisierungs_url(&self) -> AuthResult<String> {
        let (client_id, _, redirect_uri) = self.zugangsdaten()?;
        self.abgelaufene_states_entfernen();

        let state = token_generieren();
        let url = reqwest::Url::parse_with_params(
            AUTORISIERUNGS_URL,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", "identify"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AuthError::intern(format!("Autorisierungs-URL: {e}")))?;

        self.offene_states.insert(state, Instant::now());
        Ok(url.into())
    }

    /// Prueft und verbraucht einen `state`
    pub fn state_pruefen(&self, state: &str) -> AuthResult<()> {
        match self.offene_states.remove(state) {
            Some((_, erstellt)) if erstellt.elapsed() <= STATE_TTL => Ok(()),
            _ => Err(AuthError::StateUngueltig),
        }
    }

    fn abgelaufene_states_entfernen(&self) {
        self.offene_states
            .retain(|_, erstellt| erstellt.elapsed() <= STATE_TTL);
    }

    /// Tauscht den Autorisierungscode gegen das Discord-Profil
    pub async fn code_einloesen(&self, code: &str) -> AuthResult<DiscordProfil> {
        let (client_id, client_secret, redirect_uri) = self.zugangsdaten()?;

        let antwort: TokenAntwort = self
            .http
            .post(format!("{}/oauth2/token", self.api_basis))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await?
            .json()
            .await?;

        let access_token = match (antwort.access_token, antwort.error) {
            (Some(token), None) => token,
            (_, fehler) => {
                let grund = antwort
                    .error_description
                    .or(fehler)
                    .unwrap_or_else(|| "kein access_token".into());
                tracing::warn!(grund = %grund, "Discord-Token-Austausch abgelehnt");
                return Err(AuthError::CodeAbgelehnt(grund));
            }
        };

        let profil: DiscordProfil = self
            .http
            .get(format!("{}/users/@me", self.api_basis))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(discord_id = %profil.id, username = %profil.username, "Discord-Login erfolgreich");
        Ok(profil)
    }
}
