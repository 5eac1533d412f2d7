//! Session-Management fuer EchoSprite
//!
//! Nach dem Discord-Login erhaelt der Browser ein Session-Token im Cookie
//! `echosprite_session`. Sessions werden im Speicher gehalten (HashMap mit
//! TTL), ein Hintergrund-Task bereinigt abgelaufene Sessions.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use echosprite_core::DiscordUserId;
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Name des Session-Cookies
pub const SESSION_COOKIE: &str = "echosprite_session";

/// Lebensdauer einer Login-Session (entspricht dem Cookie-`Max-Age`)
pub const SESSION_TTL_SEKUNDEN: i64 = 24 * 60 * 60;

/// Abstand der Bereinigungslaeufe
const BEREINIGUNG_ALLE: Duration = Duration::from_secs(15 * 60);

/// Zufallsbytes pro Token
const TOKEN_BYTES: usize = 32;

/// Eingeloggter Browser
#[derive(Debug, Clone)]
pub struct Session {
    /// Cookie-Wert
    pub token: String,
    pub user_id: Uuid,
    pub discord_id: DiscordUserId,
    pub erstellt_am: DateTime<Utc>,
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    fn abgelaufen_zu(&self, zeitpunkt: DateTime<Utc>) -> bool {
        self.laeuft_ab_am <= zeitpunkt
    }

    pub fn ist_gueltig(&self) -> bool {
        !self.abgelaufen_zu(Utc::now())
    }
}

/// Sessions aller eingeloggten Browser, nach Token
///
/// Ein Neustart des Servers meldet alle Browser ab.
#[derive(Debug, Default)]
pub struct SessionStore {
    eintraege: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Entfernt abgelaufene Sessions alle 15 Minuten
    pub fn cleanup_starten(store: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(store);
        tokio::spawn(async move {
            let mut takt = tokio::time::interval(BEREINIGUNG_ALLE);
            takt.tick().await;
            loop {
                takt.tick().await;
                match store.cleanup_abgelaufene().await {
                    0 => {}
                    anzahl => tracing::debug!(anzahl, "Abgelaufene Sessions entfernt"),
                }
            }
        })
    }

    /// Meldet einen Discord-Benutzer an und liefert das Cookie-Token
    pub async fn erstellen(&self, user_id: Uuid, discord_id: DiscordUserId) -> AuthResult<Session> {
        let erstellt_am = Utc::now();
        let session = Session {
            token: token_generieren(),
            user_id,
            discord_id,
            erstellt_am,
            laeuft_ab_am: erstellt_am + chrono::Duration::seconds(SESSION_TTL_SEKUNDEN),
        };

        let mut eintraege = self.eintraege.write().await;
        if eintraege.contains_key(&session.token) {
            return Err(AuthError::intern("Token-Kollision"));
        }
        eintraege.insert(session.token.clone(), session.clone());
        tracing::debug!(discord_id = %discord_id, "Session angelegt");
        Ok(session)
    }

    /// Sucht die Session zu einem Cookie-Token
    ///
    /// Unbekannte Tokens ergeben `SessionUngueltig`, abgelaufene
    /// `SessionAbgelaufen`.
    pub async fn validieren(&self, token: &str) -> AuthResult<Session> {
        let eintraege = self.eintraege.read().await;
        let session = eintraege.get(token).ok_or(AuthError::SessionUngueltig)?;
        if session.abgelaufen_zu(Utc::now()) {
            return Err(AuthError::SessionAbgelaufen);
        }
        Ok(session.clone())
    }

    /// Logout; `false` wenn das Token unbekannt war
    pub async fn invalidieren(&self, token: &str) -> bool {
        let bekannt = self.eintraege.write().await.remove(token).is_some();
        if bekannt {
            tracing::debug!("Session beendet");
        }
        bekannt
    }

    /// Entfernt abgelaufene Sessions, liefert deren Anzahl
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut eintraege = self.eintraege.write().await;
        let vorher = eintraege.len();
        eintraege.retain(|_, s| !s.abgelaufen_zu(jetzt));
        vorher - eintraege.len()
    }

    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        self.eintraege
            .read()
            .await
            .values()
            .filter(|s| !s.abgelaufen_zu(jetzt))
            .count()
    }

    #[cfg(test)]
    async fn ablaufen_lassen(&self, token: &str) {
        if let Some(s) = self.eintraege.write().await.get_mut(token) {
            s.laeuft_ab_am = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

/// URL-sicheres Base64 ohne Padding, 43 Zeichen
pub(crate) fn token_generieren() -> String {
    use base64::Engine as _;

    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
