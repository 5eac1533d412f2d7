//! Download von Discord-Anhaengen als Daten-URL

use std::time::Duration;

use async_trait::async_trait;
use echosprite_core::bild::{anhang_pruefen, daten_url_erstellen};

use crate::befehl::AnhangInfo;
use crate::error::{BotError, BotResult};

/// Zeitlimit fuer einen Bild-Download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// MIME-Typ, wenn der Server keinen `content-type` liefert
pub const STANDARD_MIME: &str = "image/png";

/// Laedt ein Bild und gibt Bytes und MIME-Typ zurueck
#[async_trait]
pub trait BildLader: Send + Sync {
    async fn laden(&self, url: &str) -> BotResult<(Vec<u8>, String)>;
}

/// Laedt Bilder per HTTP GET (reqwest)
pub struct HttpBildLader {
    client: reqwest::Client,
}

impl HttpBildLader {
    pub fn neu() -> BotResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!(fehler = %e, "HTTP-Client fuer Downloads nicht erstellbar");
                BotError::Download
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BildLader for HttpBildLader {
    async fn laden(&self, url: &str) -> BotResult<(Vec<u8>, String)> {
        let fehler = |e: reqwest::Error| {
            tracing::error!(url, fehler = %e, "Bild-Download fehlgeschlagen");
            BotError::Download
        };

        let antwort = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fehler)?;

        let mime = antwort
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| STANDARD_MIME.to_string());

        let bytes = antwort.bytes().await.map_err(fehler)?;
        Ok((bytes.to_vec(), mime))
    }
}

/// Basis-MIME ohne Parameter, nur fuer `image/*`
fn bild_mime(typ: &str) -> Option<String> {
    let basis = typ.split(';').next().unwrap_or(typ).trim().to_ascii_lowercase();
    basis.starts_with("image/").then_some(basis)
}

/// Prueft einen Anhang und laedt ihn als Daten-URL
///
/// Liefert der CDN keinen Bildtyp (z.B. `application/octet-stream`), gilt der
/// bereits gepruefte Typ des Anhangs.
pub async fn anhang_laden(lader: &dyn BildLader, anhang: &AnhangInfo) -> BotResult<String> {
    anhang_pruefen(anhang.content_type.as_deref(), anhang.groesse)?;
    let (bytes, mime) = lader.laden(&anhang.url).await?;
    let mime = bild_mime(&mime)
        .or_else(|| anhang.content_type.as_deref().and_then(bild_mime))
        .unwrap_or_else(|| STANDARD_MIME.to_string());
    Ok(daten_url_erstellen(&mime, &bytes))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use echosprite_core::bild::{daten_url_pruefen, MAX_BILD_BYTES};

    /// Liefert immer dieselben Bytes, zaehlt Aufrufe
    #[derive(Default)]
    pub(crate) struct FesterLader {
        pub(crate) aufrufe: std::sync::atomic::AtomicUsize,
        pub(crate) fehlschlagen: bool,
        /// Antwort-MIME statt `image/png`
        pub(crate) mime: Option<String>,
        /// Anzahl Null-Bytes statt der PNG-Signatur
        pub(crate) groesse: Option<usize>,
    }

    #[async_trait]
    impl BildLader for FesterLader {
        async fn laden(&self, _url: &str) -> BotResult<(Vec<u8>, String)> {
            self.aufrufe
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if self.fehlschlagen {
                return Err(BotError::Download);
            }
            let bytes = match self.groesse {
                Some(n) => vec![0u8; n],
                None => vec![0x89, b'P', b'N', b'G'],
            };
            let mime = self.mime.clone().unwrap_or_else(|| "image/png".to_string());
            Ok((bytes, mime))
        }
    }

    pub(crate) fn anhang(typ: &str, groesse: u64) -> AnhangInfo {
        AnhangInfo {
            url: "https://cdn.discordapp.com/attachments/1/2/a.png".into(),
            content_type: Some(typ.into()),
            groesse,
            dateiname: "a.png".into(),
        }
    }

    #[tokio::test]
    async fn gueltiger_anhang_wird_daten_url() {
        let lader = FesterLader::default();
        let url = anhang_laden(&lader, &anhang("image/png", 4)).await.unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn ungueltiger_anhang_wird_nicht_geladen() {
        let lader = FesterLader::default();
        let e = anhang_laden(&lader, &anhang("application/pdf", 4))
            .await
            .unwrap_err();
        assert!(e.to_string().starts_with("Invalid file type"));

        let e = anhang_laden(&lader, &anhang("image/png", 11 * 1024 * 1024))
            .await
            .unwrap_err();
        assert_eq!(e.to_string(), "File too large: 11.00MB. Maximum: 10MB");
        assert_eq!(lader.aufrufe.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fremder_antwort_typ_nimmt_anhang_typ() {
        let lader = FesterLader {
            mime: Some("application/octet-stream".into()),
            ..Default::default()
        };
        let url = anhang_laden(&lader, &anhang("image/webp", 4)).await.unwrap();
        assert!(url.starts_with("data:image/webp;base64,"));
        assert!(daten_url_pruefen("idle", &url).is_ok());
    }

    #[tokio::test]
    async fn anhang_mit_maximaler_groesse_ist_speicherbar() {
        let lader = FesterLader {
            groesse: Some(MAX_BILD_BYTES as usize),
            ..Default::default()
        };
        let url = anhang_laden(&lader, &anhang("image/png", MAX_BILD_BYTES))
            .await
            .unwrap();
        assert!(daten_url_pruefen("idle", &url).is_ok());
    }
}
