//! echosprite-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die von allen anderen
//! EchoSprite-Crates gemeinsam genutzt werden: Discord-IDs, Avatar-Zustaende,
//! Avatar-Einstellungen sowie die Validierung von Bild-Daten-URLs.

pub mod bild;
pub mod einstellungen;
pub mod error;
pub mod slug;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use bild::{AvatarBilder, BildFehler};
pub use einstellungen::{AvatarEinstellungen, EinstellungsAenderung};
pub use error::{EchoSpriteError, Result};
pub use slug::name_zu_slug;
pub use types::{AvatarZustand, DiscordUserId, GuildId, VoiceChannelId};
