//! Voice-Zustand eines einzelnen Discord-Mitglieds

use echosprite_core::{AvatarZustand, DiscordUserId, GuildId, VoiceChannelId};

/// Basis-URL des Discord-CDN fuer Profilbilder
const DISCORD_CDN: &str = "https://cdn.discordapp.com";

/// Ein Voice-State-Update vom Gateway (oder aus dem Guild-Snapshot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceUpdate {
    pub user_id: DiscordUserId,
    pub guild_id: Option<GuildId>,
    /// `None` bedeutet: Voice verlassen
    pub channel_id: Option<VoiceChannelId>,
    pub username: String,
    pub avatar_hash: Option<String>,
    pub self_mute: bool,
    pub self_deaf: bool,
    pub server_mute: bool,
    pub server_deaf: bool,
    pub streaming: bool,
}

/// Gespiegelter Zustand eines Mitglieds in einem Voice-Kanal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MitgliedZustand {
    pub user_id: DiscordUserId,
    pub guild_id: Option<GuildId>,
    pub channel_id: VoiceChannelId,
    pub username: String,
    pub avatar_hash: Option<String>,
    pub self_mute: bool,
    pub self_deaf: bool,
    pub server_mute: bool,
    pub server_deaf: bool,
    pub streaming: bool,
    /// Wird nicht vom Gateway geliefert, sondern vom Browser gemeldet
    pub spricht: bool,
}

impl MitgliedZustand {
    pub(crate) fn aus_update(update: &VoiceUpdate, channel_id: VoiceChannelId) -> Self {
        Self {
            user_id: update.user_id,
            guild_id: update.guild_id,
            channel_id,
            username: update.username.clone(),
            avatar_hash: update.avatar_hash.clone(),
            self_mute: update.self_mute,
            self_deaf: update.self_deaf,
            server_mute: update.server_mute,
            server_deaf: update.server_deaf,
            streaming: update.streaming,
            spricht: false,
        }
    }

    pub fn ist_taub(&self) -> bool {
        self.self_deaf || self.server_deaf
    }

    pub fn ist_stumm(&self) -> bool {
        self.self_mute || self.server_mute
    }

    /// Abgeleiteter Anzeigezustand fuer den Viewer
    pub fn zustand(&self) -> AvatarZustand {
        AvatarZustand::ableiten(self.ist_taub(), self.ist_stumm(), self.spricht)
    }

    /// Discord-Profilbild im CDN (falls ein Hash bekannt ist)
    pub fn discord_avatar_url(&self) -> Option<String> {
        self.avatar_hash.as_ref().map(|hash| {
            let endung = if hash.starts_with("a_") { "gif" } else { "png" };
            format!("{DISCORD_CDN}/avatars/{}/{hash}.{endung}", self.user_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update() -> VoiceUpdate {
        VoiceUpdate {
            user_id: DiscordUserId(10),
            guild_id: Some(GuildId(1)),
            channel_id: Some(VoiceChannelId(100)),
            username: "alice".into(),
            avatar_hash: Some("abc".into()),
            self_mute: false,
            self_deaf: false,
            server_mute: false,
            server_deaf: false,
            streaming: false,
        }
    }

    #[test]
    fn server_deaf_zaehlt_als_taub() {
        let mut m = MitgliedZustand::aus_update(&update(), VoiceChannelId(100));
        assert_eq!(m.zustand(), AvatarZustand::Idle);
        m.server_deaf = true;
        m.self_mute = true;
        assert_eq!(m.zustand(), AvatarZustand::Deafened);
    }

    #[test]
    fn avatar_url_animiert_und_statisch() {
        let mut m = MitgliedZustand::aus_update(&update(), VoiceChannelId(100));
        assert_eq!(
            m.discord_avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/10/abc.png")
        );
        m.avatar_hash = Some("a_xyz".into());
        assert!(m.discord_avatar_url().unwrap().ends_with(".gif"));
        m.avatar_hash = None;
        assert!(m.discord_avatar_url().is_none());
    }
}
