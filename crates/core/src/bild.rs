//! Avatar-Bilder als Daten-URLs
//!
//! Bilder werden als `data:image/<typ>;base64,...` gespeichert und direkt an
//! den Browser ausgeliefert. Hier liegen die Grenzwerte und Pruefungen fuer
//! Web-Uploads und Discord-Anhaenge.

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximale Groesse eines Bildes in Bytes (10 MiB)
pub const MAX_BILD_BYTES: u64 = 10 * 1024 * 1024;

/// Platz fuer `data:<mime>;base64,` vor den Nutzdaten
const DATEN_URL_PRAEFIX_RESERVE: usize = 512;

/// Maximale Laenge einer Daten-URL: Base64 eines `MAX_BILD_BYTES` grossen
/// Bildes (`4 * ceil(n / 3)`) plus Praefix
pub const MAX_DATEN_URL_LAENGE: usize =
    4 * (MAX_BILD_BYTES as usize).div_ceil(3) + DATEN_URL_PRAEFIX_RESERVE;

/// Erlaubte MIME-Typen fuer Discord-Anhaenge
pub const ERLAUBTE_TYPEN: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// Fehler bei der Bildpruefung
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BildFehler {
    #[error("Invalid image format for {0}")]
    KeineDatenUrl(String),

    #[error("Image too large for {0}")]
    ZuGross(String),

    #[error("Invalid file type: {0}. Allowed: PNG, JPEG, GIF, WebP")]
    UngueltigerTyp(String),

    #[error("File too large: {0:.2}MB. Maximum: 10MB")]
    AnhangZuGross(f64),

    #[error("At least idle or talking image is required")]
    KeinBild,
}

/// Die vier Bild-Slots eines Avatars
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarBilder {
    #[serde(default)]
    pub idle: Option<String>,
    #[serde(default)]
    pub talking: Option<String>,
    #[serde(default)]
    pub muted: Option<String>,
    #[serde(default)]
    pub deafened: Option<String>,
}

impl AvatarBilder {
    /// Gibt true zurueck wenn mindestens idle oder talking gesetzt ist
    pub fn hat_grundbild(&self) -> bool {
        self.idle.is_some() || self.talking.is_some()
    }

    /// Prueft alle gesetzten Slots auf gueltige Daten-URLs
    pub fn validieren(&self) -> Result<(), BildFehler> {
        for (slot, wert) in self.slots() {
            if let Some(url) = wert {
                daten_url_pruefen(slot, url)?;
            }
        }
        Ok(())
    }

    /// Slot-Name und Inhalt in fester Reihenfolge
    pub fn slots(&self) -> [(&'static str, Option<&String>); 4] {
        [
            ("idle", self.idle.as_ref()),
            ("talking", self.talking.as_ref()),
            ("muted", self.muted.as_ref()),
            ("deafened", self.deafened.as_ref()),
        ]
    }
}

/// Prueft eine einzelne Daten-URL
pub fn daten_url_pruefen(slot: &str, url: &str) -> Result<(), BildFehler> {
    if !url.starts_with("data:image/") {
        return Err(BildFehler::KeineDatenUrl(slot.to_string()));
    }
    if url.len() > MAX_DATEN_URL_LAENGE {
        return Err(BildFehler::ZuGross(slot.to_string()));
    }
    Ok(())
}

/// Prueft Typ und Groesse eines Discord-Anhangs vor dem Download
pub fn anhang_pruefen(content_type: Option<&str>, groesse: u64) -> Result<(), BildFehler> {
    let typ = content_type.unwrap_or("unknown");
    // Discord liefert teils "image/png; charset=..." o.ae.
    let basis = typ.split(';').next().unwrap_or(typ).trim().to_ascii_lowercase();
    if !ERLAUBTE_TYPEN.contains(&basis.as_str()) {
        return Err(BildFehler::UngueltigerTyp(typ.to_string()));
    }
    if groesse > MAX_BILD_BYTES {
        return Err(BildFehler::AnhangZuGross(groesse as f64 / 1024.0 / 1024.0));
    }
    Ok(())
}

/// Baut eine Daten-URL aus rohen Bytes
pub fn daten_url_erstellen(mime: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{b64}")
}
