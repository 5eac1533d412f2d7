//! Gemeinsame Identifikationstypen fuer EchoSprite
//!
//! Discord-Snowflakes sind 64-Bit-Zahlen. Browser koennen diese nicht
//! verlustfrei als JSON-Zahl halten, deshalb werden alle IDs als String
//! serialisiert und sowohl aus Strings als auch aus Zahlen gelesen.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EchoSpriteError;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnowflakeRoh {
    Text(String),
    Zahl(u64),
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Gibt die innere Snowflake zurueck
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = EchoSpriteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(EchoSpriteError::UngueltigeId(s.to_string()));
                }
                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| EchoSpriteError::UngueltigeId(s.to_string()))
            }
        }

        impl From<u64> for $name {
            fn from(wert: u64) -> Self {
                Self(wert)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match SnowflakeRoh::deserialize(deserializer)? {
                    SnowflakeRoh::Zahl(n) => Ok(Self(n)),
                    SnowflakeRoh::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

snowflake_id!(
    /// Discord-Benutzer-ID
    DiscordUserId
);

snowflake_id!(
    /// Discord-Voice-Kanal-ID
    VoiceChannelId
);

snowflake_id!(
    /// Discord-Server-ID (Guild)
    GuildId
);

/// Anzeigezustand eines Avatars
///
/// Die Reihenfolge der Ableitung: taub vor stumm vor sprechend vor idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvatarZustand {
    #[default]
    Idle,
    Talking,
    Muted,
    Deafened,
}

impl AvatarZustand {
    /// Leitet den Anzeigezustand aus den Voice-Flags ab
    pub fn ableiten(taub: bool, stumm: bool, spricht: bool) -> Self {
        if taub {
            Self::Deafened
        } else if stumm {
            Self::Muted
        } else if spricht {
            Self::Talking
        } else {
            Self::Idle
        }
    }

    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Talking => "talking",
            Self::Muted => "muted",
            Self::Deafened => "deafened",
        }
    }
}

impl fmt::Display for AvatarZustand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.als_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_als_string_serialisiert() {
        let id = DiscordUserId(123456789012345678);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123456789012345678\"");
    }

    #[test]
    fn id_aus_string_und_zahl() {
        let a: VoiceChannelId = serde_json::from_str("\"42\"").unwrap();
        let b: VoiceChannelId = serde_json::from_str("42").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 42);
    }

    #[test]
    fn ungueltige_id_abgelehnt() {
        assert!("abc".parse::<DiscordUserId>().is_err());
        assert!("".parse::<DiscordUserId>().is_err());
        assert!("-5".parse::<DiscordUserId>().is_err());
        assert!(serde_json::from_str::<GuildId>("\"12x\"").is_err());
    }

    #[test]
    fn zustand_ableitung_prioritaet() {
        assert_eq!(AvatarZustand::ableiten(true, true, true), AvatarZustand::Deafened);
        assert_eq!(AvatarZustand::ableiten(false, true, true), AvatarZustand::Muted);
        assert_eq!(AvatarZustand::ableiten(false, false, true), AvatarZustand::Talking);
        assert_eq!(AvatarZustand::ableiten(false, false, false), AvatarZustand::Idle);
    }

    #[test]
    fn zustand_json_kleingeschrieben() {
        let json = serde_json::to_string(&AvatarZustand::Deafened).unwrap();
        assert_eq!(json, "\"deafened\"");
        let z: AvatarZustand = serde_json::from_str("\"talking\"").unwrap();
        assert_eq!(z, AvatarZustand::Talking);
    }
}
