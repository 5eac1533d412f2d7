//! Anonyme Avatar-Konfigurationen (Ablauf ohne Discord-Login)
//!
//! Der Browser speichert Bilder unter einer zufaelligen oeffentlichen ID
//! und bindet danach `viewer.html?id=<publicId>` in OBS ein.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use echosprite_core::bild::daten_url_pruefen;
use echosprite_core::einstellungen::STANDARD_EMPFINDLICHKEIT;
use echosprite_core::{AvatarEinstellungen, EchoSpriteError};
use echosprite_db::models::{AvatarConfigRecord, NeueAvatarConfig};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{AvatarError, AvatarResult};
use crate::service::{AvatarService, AvatarSpeicher};

/// Laenge der oeffentlichen ID in Bytes (hex-kodiert doppelt so lang)
const PUBLIC_ID_BYTES: usize = 16;

/// Eingabe fuer `config_speichern` (JSON-Body von `POST /api/avatar-config`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeueKonfiguration {
    pub idle_image: Option<String>,
    pub talking_image: Option<String>,
    pub sensitivity: Option<i64>,
    #[serde(default)]
    pub settings: AvatarEinstellungen,
}

/// Oeffentliche Ansicht einer Konfiguration (mit Bildern)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeffentlicheKonfiguration {
    pub idle_image: Option<String>,
    pub talking_image: Option<String>,
    pub sensitivity: u8,
    pub settings: AvatarEinstellungen,
}

impl From<AvatarConfigRecord> for OeffentlicheKonfiguration {
    fn from(r: AvatarConfigRecord) -> Self {
        Self {
            idle_image: r.idle_image,
            talking_image: r.talking_image,
            sensitivity: r.sensitivity,
            settings: r.einstellungen,
        }
    }
}

/// Metadaten einer Konfiguration ohne Bilddaten
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KonfigurationsStatistik {
    pub public_id: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub has_idle_image: bool,
    pub has_talking_image: bool,
}

/// Erzeugt eine zufaellige, hex-kodierte oeffentliche ID
pub fn public_id_generieren() -> String {
    let mut bytes = [0u8; PUBLIC_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(PUBLIC_ID_BYTES * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

impl<R: AvatarSpeicher> AvatarService<R> {
    /// Speichert eine anonyme Konfiguration und gibt sie mit ihrer ID zurueck
    pub async fn config_speichern(
        &self,
        eingabe: NeueKonfiguration,
    ) -> AvatarResult<AvatarConfigRecord> {
        if eingabe.idle_image.is_none() && eingabe.talking_image.is_none() {
            return Err(EchoSpriteError::validierung(
                "At least one image (idle or talking) is required",
            )
            .into());
        }
        if let Some(ref url) = eingabe.idle_image {
            daten_url_pruefen("idle", url)?;
        }
        if let Some(ref url) = eingabe.talking_image {
            daten_url_pruefen("talking", url)?;
        }

        let sensitivity = match eingabe.sensitivity {
            None => STANDARD_EMPFINDLICHKEIT,
            Some(s) if (0..=100).contains(&s) => s as u8,
            Some(_) => {
                return Err(EchoSpriteError::validierung(
                    "Sensitivity must be between 0 and 100",
                )
                .into())
            }
        };
        eingabe.settings.validieren()?;

        let public_id = public_id_generieren();
        let record = self
            .repo
            .create_config(NeueAvatarConfig {
                public_id: &public_id,
                idle_image: eingabe.idle_image.as_deref(),
                talking_image: eingabe.talking_image.as_deref(),
                sensitivity,
                einstellungen: &eingabe.settings,
            })
            .await?;

        tracing::info!(public_id = %record.public_id, "Avatar-Konfiguration gespeichert");
        Ok(record)
    }

    /// Laedt eine Konfiguration und zaehlt den Zugriff
    pub async fn config_laden(&self, public_id: &str) -> AvatarResult<OeffentlicheKonfiguration> {
        let record = self
            .repo
            .get_and_touch(public_id)
            .await?
            .ok_or(AvatarError::ConfigNichtGefunden)?;
        tracing::debug!(public_id, zugriffe = record.access_count, "Avatar-Konfiguration abgerufen");
        Ok(record.into())
    }

    /// Metadaten ohne Bilder, zaehlt nicht als Zugriff
    pub async fn config_statistik(&self, public_id: &str) -> AvatarResult<KonfigurationsStatistik> {
        let r = self
            .repo
            .get_config(public_id)
            .await?
            .ok_or(AvatarError::ConfigNichtGefunden)?;
        Ok(KonfigurationsStatistik {
            has_idle_image: r.idle_image.is_some(),
            has_talking_image: r.talking_image.is_some(),
            public_id: r.public_id,
            created_at: r.created_at,
            last_accessed_at: r.last_accessed_at,
            access_count: r.access_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::ViewerUrls;
    use echosprite_db::SqliteDb;
    use std::sync::Arc;

    async fn service() -> AvatarService<SqliteDb> {
        let db = SqliteDb::in_memory().await.expect("DB");
        AvatarService::neu(Arc::new(db), ViewerUrls::default())
    }

    #[test]
    fn public_id_format() {
        let id = public_id_generieren();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, public_id_generieren());
    }

    #[tokio::test]
    async fn speichern_laden_statistik() {
        let s = service().await;
        let record = s
            .config_speichern(NeueKonfiguration {
                idle_image: Some("data:image/png;base64,AA".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(record.sensitivity, 30);

        let geladen = s.config_laden(&record.public_id).await.unwrap();
        assert_eq!(geladen.idle_image.as_deref(), Some("data:image/png;base64,AA"));
        s.config_laden(&record.public_id).await.unwrap();

        let stats = s.config_statistik(&record.public_id).await.unwrap();
        assert_eq!(stats.access_count, 2);
        assert!(stats.has_idle_image);
        assert!(!stats.has_talking_image);
        assert!(stats.last_accessed_at.is_some());
    }

    #[tokio::test]
    async fn validierung() {
        let s = service().await;
        let e = s.config_speichern(NeueKonfiguration::default()).await.unwrap_err();
        assert!(e.ist_eingabefehler());

        let e = s
            .config_speichern(NeueKonfiguration {
                talking_image: Some("http://example.com/x.png".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(e.to_string(), "Invalid image format for talking");

        let e = s
            .config_speichern(NeueKonfiguration {
                idle_image: Some("data:image/png;base64,AA".into()),
                sensitivity: Some(101),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(e.to_string(), "Sensitivity must be between 0 and 100");
    }

    #[tokio::test]
    async fn unbekannte_id() {
        let s = service().await;
        assert!(s.config_laden("fehlt").await.unwrap_err().ist_nicht_gefunden());
        assert!(s.config_statistik("fehlt").await.unwrap_err().ist_nicht_gefunden());
    }
}
