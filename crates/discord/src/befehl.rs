//! Slash-Command-Eingaben als typisierte Befehle
//!
//! Die Optionen einer Interaktion werden zuerst in eine einfache
//! [`Optionen`]-Map gelesen und dann in einen [`BotBefehl`] uebersetzt.

use std::collections::HashMap;

use echosprite_core::EinstellungsAenderung;
use serenity::all::{CommandInteraction, ResolvedOption, ResolvedValue};

use crate::error::{BotError, BotResult};

/// Ein Discord-Anhang (nur die Felder, die der Bot braucht)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnhangInfo {
    pub url: String,
    pub content_type: Option<String>,
    pub groesse: u64,
    pub dateiname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsWert {
    Text(String),
    Zahl(i64),
    Bool(bool),
    Anhang(AnhangInfo),
}

/// Optionen eines (Unter-)Befehls nach Name
pub type Optionen = HashMap<String, OptionsWert>;

/// Bilder eines Uploads; idle und talking sind Pflicht
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAnhaenge {
    pub idle: AnhangInfo,
    pub talking: AnhangInfo,
    pub muted: Option<AnhangInfo>,
    pub deafened: Option<AnhangInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotBefehl {
    AvatarUpload(UploadAnhaenge),
    AvatarView,
    AvatarUrl,
    AvatarDelete,

    ChannelUrl,
    ChannelPreview,
    ChannelMembers,

    SettingsView,
    SettingsSetzen(EinstellungsAenderung),

    ProfileCreate { name: String },
    ProfileUpload { profil: String, anhaenge: UploadAnhaenge },
    ProfileList,
    ProfileSwitch { profil: String },
    ProfileUrl { profil: Option<String> },
    ProfileDelete { profil: String },
    ProfileRename { alt: String, neu: String },

    Help,
    Status,
}

fn text(optionen: &Optionen, name: &str) -> Option<String> {
    match optionen.get(name) {
        Some(OptionsWert::Text(t)) => Some(t.clone()),
        _ => None,
    }
}

fn text_pflicht(optionen: &Optionen, name: &str) -> BotResult<String> {
    text(optionen, name).ok_or_else(|| BotError::FehlendeOption(name.to_string()))
}

fn bool_pflicht(optionen: &Optionen, name: &str) -> BotResult<bool> {
    match optionen.get(name) {
        Some(OptionsWert::Bool(b)) => Ok(*b),
        _ => Err(BotError::FehlendeOption(name.to_string())),
    }
}

fn anhang(optionen: &Optionen, name: &str) -> Option<AnhangInfo> {
    match optionen.get(name) {
        Some(OptionsWert::Anhang(a)) => Some(a.clone()),
        _ => None,
    }
}

fn anhang_pflicht(optionen: &Optionen, name: &str) -> BotResult<AnhangInfo> {
    anhang(optionen, name).ok_or_else(|| BotError::FehlendeOption(name.to_string()))
}

fn anhaenge(optionen: &Optionen) -> BotResult<UploadAnhaenge> {
    Ok(UploadAnhaenge {
        idle: anhang_pflicht(optionen, "idle")?,
        talking: anhang_pflicht(optionen, "talking")?,
        muted: anhang(optionen, "muted"),
        deafened: anhang(optionen, "deafened"),
    })
}

fn abstand(optionen: &Optionen) -> BotResult<u8> {
    match optionen.get("value") {
        Some(OptionsWert::Zahl(n)) if (0..=100).contains(n) => Ok(*n as u8),
        Some(OptionsWert::Zahl(n)) => Err(BotError::UngueltigeOption(format!(
            "spacing must be between 0 and 100, got {n}"
        ))),
        _ => Err(BotError::FehlendeOption("value".into())),
    }
}

impl BotBefehl {
    /// Uebersetzt Befehlsname, Unterbefehl und Optionen
    pub fn parsen(name: &str, unterbefehl: Option<&str>, optionen: &Optionen) -> BotResult<Self> {
        let unbekannt = || {
            BotError::UnbekannterBefehl(match unterbefehl {
                Some(sub) => format!("{name} {sub}"),
                None => name.to_string(),
            })
        };

        let befehl = match (name, unterbefehl) {
            ("avatar", Some("upload")) => Self::AvatarUpload(anhaenge(optionen)?),
            ("avatar", Some("view")) => Self::AvatarView,
            ("avatar", Some("url")) => Self::AvatarUrl,
            ("avatar", Some("delete")) => Self::AvatarDelete,

            ("channel", Some("url")) => Self::ChannelUrl,
            ("channel", Some("preview")) => Self::ChannelPreview,
            ("channel", Some("members")) => Self::ChannelMembers,

            ("settings", Some("view")) => Self::SettingsView,
            ("settings", Some(sub)) => {
                let aenderung = match sub {
                    "bounce" => EinstellungsAenderung::Bounce(bool_pflicht(optionen, "enabled")?),
                    "fade" => EinstellungsAenderung::Fade(bool_pflicht(optionen, "enabled")?),
                    "spacing" => EinstellungsAenderung::Spacing(abstand(optionen)?),
                    "show-names" => {
                        EinstellungsAenderung::ShowNames(bool_pflicht(optionen, "enabled")?)
                    }
                    "include-self" => {
                        EinstellungsAenderung::IncludeSelf(bool_pflicht(optionen, "enabled")?)
                    }
                    "dim-inactive" => {
                        EinstellungsAenderung::DimInactive(bool_pflicht(optionen, "enabled")?)
                    }
                    _ => return Err(unbekannt()),
                };
                Self::SettingsSetzen(aenderung)
            }

            ("profile", Some("create")) => Self::ProfileCreate {
                name: text_pflicht(optionen, "name")?,
            },
            ("profile", Some("upload")) => Self::ProfileUpload {
                profil: text_pflicht(optionen, "profile")?,
                anhaenge: anhaenge(optionen)?,
            },
            ("profile", Some("list")) => Self::ProfileList,
            ("profile", Some("switch")) => Self::ProfileSwitch {
                profil: text_pflicht(optionen, "profile")?,
            },
            ("profile", Some("url")) => Self::ProfileUrl {
                profil: text(optionen, "profile"),
            },
            ("profile", Some("delete")) => Self::ProfileDelete {
                profil: text_pflicht(optionen, "profile")?,
            },
            ("profile", Some("rename")) => Self::ProfileRename {
                alt: text_pflicht(optionen, "old")?,
                neu: text_pflicht(optionen, "new")?,
            },

            ("help", _) => Self::Help,
            ("status", _) => Self::Status,
            _ => return Err(unbekannt()),
        };
        Ok(befehl)
    }

    /// Titel der Fehlerantwort, wenn der Befehl scheitert
    pub fn fehlertitel(&self) -> &'static str {
        match self {
            Self::AvatarUpload(_) | Self::ProfileUpload { .. } => "Upload Failed",
            Self::AvatarView => "Failed to View Avatar",
            Self::AvatarUrl => "Failed to Get URLs",
            Self::AvatarDelete => "Failed to Delete Avatar",
            Self::ChannelUrl | Self::ProfileUrl { .. } => "Failed to Get URL",
            Self::ChannelPreview | Self::ChannelMembers => "Failed to Preview Channel",
            Self::SettingsView => "Failed to View Settings",
            Self::SettingsSetzen(_) => "Failed to Update Settings",
            Self::ProfileCreate { .. } => "Failed to Create Profile",
            Self::ProfileList => "Failed to List Profiles",
            Self::ProfileSwitch { .. } => "Failed to Switch Profile",
            Self::ProfileDelete { .. } => "Failed to Delete Profile",
            Self::ProfileRename { .. } => "Failed to Rename Profile",
            Self::Help | Self::Status => "Command Failed",
        }
    }

    /// Text der Fehlerantwort
    ///
    /// Uploads und Profilbefehle zeigen die Fehlermeldung, die uebrigen
    /// Befehle einen festen Text.
    pub fn fehlertext(&self, fehler: &BotError) -> String {
        let fest = match self {
            Self::AvatarView => "An error occurred while retrieving your avatar.",
            Self::AvatarUrl => "An error occurred while generating your URLs.",
            Self::AvatarDelete => "An error occurred while deleting your avatar.",
            Self::ChannelUrl => "An error occurred while generating the channel URL.",
            Self::ChannelPreview | Self::ChannelMembers => {
                "An error occurred while previewing the channel."
            }
            Self::SettingsView => "An error occurred while retrieving your settings.",
            Self::SettingsSetzen(_) => "An error occurred while updating your settings.",
            Self::ProfileList => "An error occurred while retrieving your profiles.",
            _ => return fehler.to_string(),
        };
        fest.to_string()
    }
}

fn anhang_info(a: &serenity::all::Attachment) -> AnhangInfo {
    AnhangInfo {
        url: a.url.clone(),
        content_type: a.content_type.clone(),
        groesse: u64::from(a.size),
        dateiname: a.filename.clone(),
    }
}

fn optionen_sammeln(optionen: &[ResolvedOption<'_>], ziel: &mut Optionen) {
    for o in optionen {
        let wert = match &o.value {
            ResolvedValue::String(s) => OptionsWert::Text((*s).to_string()),
            ResolvedValue::Integer(n) => OptionsWert::Zahl(*n),
            ResolvedValue::Boolean(b) => OptionsWert::Bool(*b),
            ResolvedValue::Attachment(a) => OptionsWert::Anhang(anhang_info(a)),
            _ => continue,
        };
        ziel.insert(o.name.to_string(), wert);
    }
}

/// Liest Unterbefehl und Optionen einer Interaktion
pub fn optionen_lesen(cmd: &CommandInteraction) -> (Option<String>, Optionen) {
    let aufgeloest = cmd.data.options();
    let mut optionen = Optionen::new();

    for o in &aufgeloest {
        if let ResolvedValue::SubCommand(unter) = &o.value {
            optionen_sammeln(unter, &mut optionen);
            return (Some(o.name.to_string()), optionen);
        }
    }

    optionen_sammeln(&aufgeloest, &mut optionen);
    (None, optionen)
}
