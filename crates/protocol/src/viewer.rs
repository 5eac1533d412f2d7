//! Viewer-Nachrichten (Server -> Browser)
//!
//! ## Format
//! - JSON mit `type`-Tag, Felder in camelCase
//! - `init` enthaelt eine Liste von Mitgliedern und wird vom Browser
//!   zusammengefuehrt, deshalb wird auch ein einzelner Beitritt als `init`
//!   mit genau einem Mitglied gesendet

use echosprite_core::{AvatarZustand, DiscordUserId, EchoSpriteError, VoiceChannelId};
use serde::{Deserialize, Serialize};

/// Ein Mitglied wie es der Viewer anzeigt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerMitglied {
    pub user_id: DiscordUserId,
    pub username: String,
    pub state: AvatarZustand,
    /// Discord-Profilbild (CDN-URL), falls vorhanden
    pub avatar: Option<String>,
}

/// Alle Nachrichten an den Viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewerNachricht {
    /// Snapshot (bei Verbindungsaufbau) oder neue Mitglieder
    Init { members: Vec<ViewerMitglied> },
    /// Zustandswechsel eines Mitglieds
    Update {
        #[serde(rename = "userId")]
        user_id: DiscordUserId,
        state: AvatarZustand,
    },
    /// Mitglied hat den Kanal verlassen
    Leave {
        #[serde(rename = "userId")]
        user_id: DiscordUserId,
    },
    /// Fehler (z.B. fehlende Abo-Parameter), danach wird geschlossen
    Error { message: String },
}

impl ViewerNachricht {
    /// Serialisiert die Nachricht als JSON-Text
    pub fn als_json(&self) -> String {
        // Alle Felder sind serialisierbar, ein Fehler ist hier nicht moeglich
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Query-Parameter der WebSocket-Verbindung (`/ws?channelId=` oder `?userId=`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerAbfrage {
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
}

/// Was ein Viewer beobachtet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAbo {
    /// Gruppenansicht eines Voice-Kanals
    Kanal(VoiceChannelId),
    /// Einzelansicht eines Benutzers (folgt ihm ueber Kanalwechsel)
    Benutzer(DiscordUserId),
}

impl ViewerAbfrage {
    /// Bestimmt das Abo; `channelId` hat Vorrang vor `userId`
    pub fn abo(&self) -> Result<ViewerAbo, EchoSpriteError> {
        if let Some(ref kanal) = self.channel_id {
            return kanal.parse().map(ViewerAbo::Kanal);
        }
        if let Some(ref user) = self.user_id {
            return user.parse().map(ViewerAbo::Benutzer);
        }
        Err(EchoSpriteError::validierung("channelId or userId required"))
    }
}
