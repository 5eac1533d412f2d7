//! Antworten des Bots als Embed-Beschreibung
//!
//! Handler bauen eine [`Antwort`], erst das Gateway wandelt sie in ein
//! serenity-Embed um. So lassen sich die Handler ohne Discord testen.

use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp};

/// Standard-Fusszeile aller Antworten
pub const FUSSZEILE: &str = "EchoSprite - Reactive VTuber Avatars";

pub const FARBE_ERFOLG: u32 = 0x8a2be2;
pub const FARBE_FEHLER: u32 = 0xff4444;
pub const FARBE_INFO: u32 = 0x4488ff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntwortArt {
    Erfolg,
    Fehler,
    Info,
    /// Eigene Farbe ohne Titel-Praefix (Hilfe, Status)
    Eigen(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feld {
    pub name: String,
    pub wert: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Antwort {
    pub art: AntwortArt,
    pub titel: String,
    pub beschreibung: String,
    pub felder: Vec<Feld>,
    pub fusszeile: String,
}

impl Antwort {
    fn neu(art: AntwortArt, titel: impl Into<String>, beschreibung: impl Into<String>) -> Self {
        Self {
            art,
            titel: titel.into(),
            beschreibung: beschreibung.into(),
            felder: Vec::new(),
            fusszeile: FUSSZEILE.to_string(),
        }
    }

    pub fn erfolg(titel: impl Into<String>, beschreibung: impl Into<String>) -> Self {
        Self::neu(AntwortArt::Erfolg, titel, beschreibung)
    }

    pub fn fehler(titel: impl Into<String>, beschreibung: impl Into<String>) -> Self {
        Self::neu(AntwortArt::Fehler, titel, beschreibung)
    }

    pub fn info(titel: impl Into<String>, beschreibung: impl Into<String>) -> Self {
        Self::neu(AntwortArt::Info, titel, beschreibung)
    }

    pub fn eigen(farbe: u32, titel: impl Into<String>, beschreibung: impl Into<String>) -> Self {
        Self::neu(AntwortArt::Eigen(farbe), titel, beschreibung)
    }

    /// Fuer unerwartete Fehler waehrend eines Befehls
    pub fn befehl_fehlgeschlagen(meldung: impl std::fmt::Display) -> Self {
        Self::fehler(
            "Command Failed",
            format!(
                "An unexpected error occurred while processing your command.\n\nError: {meldung}"
            ),
        )
    }

    pub fn feld(mut self, name: impl Into<String>, wert: impl Into<String>, inline: bool) -> Self {
        self.felder.push(Feld {
            name: name.into(),
            wert: wert.into(),
            inline,
        });
        self
    }

    pub fn mit_fusszeile(mut self, text: impl Into<String>) -> Self {
        self.fusszeile = text.into();
        self
    }

    pub fn farbe(&self) -> u32 {
        match self.art {
            AntwortArt::Erfolg => FARBE_ERFOLG,
            AntwortArt::Fehler => FARBE_FEHLER,
            AntwortArt::Info => FARBE_INFO,
            AntwortArt::Eigen(f) => f,
        }
    }

    /// Titel mit Symbol-Praefix je nach Art
    pub fn voller_titel(&self) -> String {
        match self.art {
            AntwortArt::Erfolg => format!("✅ {}", self.titel),
            AntwortArt::Fehler => format!("❌ {}", self.titel),
            AntwortArt::Info => format!("ℹ️ {}", self.titel),
            AntwortArt::Eigen(_) => self.titel.clone(),
        }
    }

    pub fn ist_fehler(&self) -> bool {
        self.art == AntwortArt::Fehler
    }

    pub fn als_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .color(self.farbe())
            .title(self.voller_titel())
            .description(&self.beschreibung)
            .timestamp(Timestamp::now())
            .footer(CreateEmbedFooter::new(&self.fusszeile));
        for f in &self.felder {
            embed = embed.field(&f.name, &f.wert, f.inline);
        }
        embed
    }
}

/// ✅ oder ❌
pub(crate) fn haken(wert: bool) -> &'static str {
    if wert {
        "✅"
    } else {
        "❌"
    }
}

/// Text als Codeblock (zum Kopieren von URLs)
pub(crate) fn codeblock(text: &str) -> String {
    format!("```{text}```")
}
