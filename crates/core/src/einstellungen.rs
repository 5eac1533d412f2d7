//! Avatar-Einstellungen
//!
//! Alle Felder sind optional. Fehlende Werte werden erst bei der Anzeige
//! durch die Standardwerte ersetzt, damit ein gespeichertes Objekt nur die
//! Werte enthaelt, die der Benutzer wirklich gesetzt hat.

use serde::{Deserialize, Serialize};

use crate::error::{EchoSpriteError, Result};

/// Standardabstand zwischen Avataren in der Gruppenansicht (Pixel)
pub const STANDARD_ABSTAND: u8 = 20;

/// Standard-Empfindlichkeit der Mikrofonerkennung
pub const STANDARD_EMPFINDLICHKEIT: u8 = 30;

/// Persistierte Avatar-Einstellungen (camelCase im JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarEinstellungen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_names: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_self: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_inactive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl AvatarEinstellungen {
    /// Prueft die Wertebereiche (0..=100 fuer Empfindlichkeit und Abstand)
    pub fn validieren(&self) -> Result<()> {
        if let Some(s) = self.sensitivity {
            if s > 100 {
                return Err(EchoSpriteError::validierung(
                    "sensitivity must be between 0 and 100",
                ));
            }
        }
        if let Some(s) = self.spacing {
            if s > 100 {
                return Err(EchoSpriteError::validierung(
                    "spacing must be between 0 and 100",
                ));
            }
        }
        if let Some(ref a) = self.animation {
            if a.len() > 50 {
                return Err(EchoSpriteError::validierung("animation name too long"));
            }
        }
        Ok(())
    }

    /// Wendet eine einzelne Aenderung an und validiert das Ergebnis
    pub fn anwenden(&mut self, aenderung: EinstellungsAenderung) -> Result<()> {
        match aenderung {
            EinstellungsAenderung::Bounce(v) => self.bounce = Some(v),
            EinstellungsAenderung::Fade(v) => self.fade = Some(v),
            EinstellungsAenderung::Spacing(v) => self.spacing = Some(v),
            EinstellungsAenderung::ShowNames(v) => self.show_names = Some(v),
            EinstellungsAenderung::IncludeSelf(v) => self.include_self = Some(v),
            EinstellungsAenderung::DimInactive(v) => self.dim_inactive = Some(v),
        }
        self.validieren()
    }

    pub fn show_names_oder_standard(&self) -> bool {
        self.show_names.unwrap_or(true)
    }

    pub fn include_self_oder_standard(&self) -> bool {
        self.include_self.unwrap_or(true)
    }

    pub fn spacing_oder_standard(&self) -> u8 {
        self.spacing.unwrap_or(STANDARD_ABSTAND)
    }

    pub fn sensitivity_oder_standard(&self) -> u8 {
        self.sensitivity.unwrap_or(STANDARD_EMPFINDLICHKEIT)
    }
}

/// Eine einzelne Einstellungsaenderung (aus einem Slash-Command)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EinstellungsAenderung {
    Bounce(bool),
    Fade(bool),
    Spacing(u8),
    ShowNames(bool),
    IncludeSelf(bool),
    DimInactive(bool),
}

impl EinstellungsAenderung {
    /// JSON-Schluessel der Einstellung
    pub fn schluessel(&self) -> &'static str {
        match self {
            Self::Bounce(_) => "bounce",
            Self::Fade(_) => "fade",
            Self::Spacing(_) => "spacing",
            Self::ShowNames(_) => "showNames",
            Self::IncludeSelf(_) => "includeSelf",
            Self::DimInactive(_) => "dimInactive",
        }
    }

    /// Wert als JSON (fuer Analytics)
    pub fn wert(&self) -> serde_json::Value {
        match *self {
            Self::Spacing(v) => serde_json::Value::from(v),
            Self::Bounce(v)
            | Self::Fade(v)
            | Self::ShowNames(v)
            | Self::IncludeSelf(v)
            | Self::DimInactive(v) => serde_json::Value::from(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leere_einstellungen_sind_leeres_objekt() {
        let json = serde_json::to_string(&AvatarEinstellungen::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn camel_case_felder() {
        let e: AvatarEinstellungen =
            serde_json::from_str(r#"{"showNames":false,"dimInactive":true,"spacing":35}"#).unwrap();
        assert_eq!(e.show_names, Some(false));
        assert_eq!(e.dim_inactive, Some(true));
        assert_eq!(e.spacing_oder_standard(), 35);
        assert!(e.include_self_oder_standard());
    }

    #[test]
    fn bereich_wird_geprueft() {
        let e = AvatarEinstellungen {
            sensitivity: Some(101),
            ..Default::default()
        };
        assert!(e.validieren().is_err());

        let mut e = AvatarEinstellungen::default();
        assert!(e.anwenden(EinstellungsAenderung::Spacing(150)).is_err());
        assert!(e.anwenden(EinstellungsAenderung::Spacing(100)).is_ok());
    }

    #[test]
    fn aenderung_anwenden() {
        let mut e = AvatarEinstellungen::default();
        e.anwenden(EinstellungsAenderung::Bounce(true)).unwrap();
        e.anwenden(EinstellungsAenderung::ShowNames(false)).unwrap();
        assert_eq!(e.bounce, Some(true));
        assert!(!e.show_names_oder_standard());
        assert_eq!(EinstellungsAenderung::DimInactive(true).schluessel(), "dimInactive");
    }

    #[test]
    fn standardwerte() {
        let e = AvatarEinstellungen::default();
        assert_eq!(e.spacing_oder_standard(), STANDARD_ABSTAND);
        assert_eq!(e.sensitivity_oder_standard(), STANDARD_EMPFINDLICHKEIT);
        assert!(e.show_names_oder_standard());
    }
}
