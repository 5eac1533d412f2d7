//! Wer einen Befehl ausfuehrt und in welchem Voice-Kanal er sitzt

use echosprite_core::{DiscordUserId, VoiceChannelId};
use echosprite_db::models::BenutzerDaten;
use serenity::all::{CommandInteraction, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceKanal {
    pub id: VoiceChannelId,
    pub name: String,
}

/// Aufrufer eines Slash-Commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BefehlsKontext {
    pub user_id: DiscordUserId,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar_hash: Option<String>,
    pub voice_kanal: Option<VoiceKanal>,
}

impl BefehlsKontext {
    pub fn benutzer_daten(&self) -> BenutzerDaten<'_> {
        BenutzerDaten {
            discord_id: self.user_id,
            username: &self.username,
            discriminator: self.discriminator.as_deref(),
            avatar: self.avatar_hash.as_deref(),
        }
    }

    /// Liest Aufrufer und Voice-Kanal aus Interaktion und Cache
    pub fn aus_interaktion(ctx: &Context, cmd: &CommandInteraction) -> Self {
        let user = &cmd.user;
        // Der Cache-Guard darf nicht ueber ein await gehalten werden
        let voice_kanal = cmd.guild_id.and_then(|gid| {
            let guild = ctx.cache.guild(gid)?;
            let kanal_id = guild.voice_states.get(&user.id)?.channel_id?;
            let name = guild
                .channels
                .get(&kanal_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| kanal_id.to_string());
            Some(VoiceKanal {
                id: VoiceChannelId(kanal_id.get()),
                name,
            })
        });

        Self {
            user_id: DiscordUserId(user.id.get()),
            username: user.name.clone(),
            discriminator: user.discriminator.map(|d| format!("{:04}", d.get())),
            avatar_hash: user.avatar.map(|h| h.to_string()),
            voice_kanal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benutzer_daten_leihen_felder() {
        let k = BefehlsKontext {
            user_id: DiscordUserId(5),
            username: "alice".into(),
            discriminator: Some("0420".into()),
            avatar_hash: None,
            voice_kanal: None,
        };
        let d = k.benutzer_daten();
        assert_eq!(d.discord_id, DiscordUserId(5));
        assert_eq!(d.username, "alice");
        assert_eq!(d.discriminator, Some("0420"));
        assert!(d.avatar.is_none());
    }
}
