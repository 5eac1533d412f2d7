//! `/channel url|preview|members`

use echosprite_voice::MitgliedZustand;

use crate::antwort::{codeblock, Antwort};
use crate::handlers::OBS_EINSTELLUNGEN;
use crate::kontext::BefehlsKontext;
use crate::BotState;

fn nicht_im_kanal() -> Antwort {
    Antwort::fehler(
        "Not in Voice Channel",
        "You must be in a voice channel to use this command.",
    )
}

/// Symbol fuer den Voice-Zustand eines Mitglieds
pub(crate) fn mitglied_symbol(m: &MitgliedZustand) -> &'static str {
    if m.ist_taub() {
        "🔕"
    } else if m.ist_stumm() {
        "🔇"
    } else if m.streaming {
        "📹"
    } else {
        "🎤"
    }
}

pub fn url(state: &BotState, k: &BefehlsKontext) -> Antwort {
    let Some(ref kanal) = k.voice_kanal else {
        return nicht_im_kanal();
    };

    let url = state.avatar.urls().gruppe(kanal.id);
    Antwort::erfolg("Group Viewer URL", format!("URL for **{}**:", kanal.name))
        .feld(
            "👥 Group Viewer",
            format!("Shows all avatars in this voice channel\n{}", codeblock(&url)),
            false,
        )
        .feld("📺 OBS Settings", OBS_EINSTELLUNGEN, false)
        .feld(
            "💡 Features",
            "• Automatically shows everyone in voice\n• Updates in real-time when people join/leave\n• Shows talking, muted, and deafened states\n• Perfect for collaborations!",
            false,
        )
}

/// Vorschau und Mitgliederliste sind dieselbe Antwort
pub fn preview(state: &BotState, k: &BefehlsKontext) -> Antwort {
    let Some(ref kanal) = k.voice_kanal else {
        return nicht_im_kanal();
    };

    let mitglieder = state.tracker.mitglieder_in_kanal(kanal.id);
    let liste = mitglieder
        .iter()
        .map(|m| format!("{} {}", mitglied_symbol(m), m.username))
        .collect::<Vec<_>>()
        .join("\n");

    Antwort::info(
        format!("Voice Channel: {}", kanal.name),
        format!("**{} member(s) in voice:**\n{liste}", mitglieder.len()),
    )
    .feld(
        "💡 Tip",
        "Use `/channel url` to get the group viewer URL for OBS!",
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testhilfe::{kontext, kontext_im_kanal, state};
    use echosprite_core::{DiscordUserId, GuildId, VoiceChannelId};
    use echosprite_voice::VoiceUpdate;

    fn update(id: u64, name: &str) -> VoiceUpdate {
        VoiceUpdate {
            user_id: DiscordUserId(id),
            guild_id: Some(GuildId(1)),
            channel_id: Some(VoiceChannelId(77)),
            username: name.into(),
            avatar_hash: None,
            self_mute: false,
            self_deaf: false,
            server_mute: false,
            server_deaf: false,
            streaming: false,
        }
    }

    #[tokio::test]
    async fn ohne_kanal() {
        let s = state().await;
        assert_eq!(url(&s, &kontext()).titel, "Not in Voice Channel");
        assert!(preview(&s, &kontext()).ist_fehler());
    }

    #[tokio::test]
    async fn gruppen_url() {
        let s = state().await;
        let a = url(&s, &kontext_im_kanal());
        assert_eq!(a.beschreibung, "URL for **Lounge**:");
        assert!(a.felder[0]
            .wert
            .contains("https://frontend.test/viewer-group.html?channelId=77"));
    }

    #[tokio::test]
    async fn mitgliederliste_mit_symbolen() {
        let s = state().await;
        s.tracker.aktualisieren(update(1, "anna"));
        s.tracker.aktualisieren(VoiceUpdate {
            self_mute: true,
            self_deaf: true,
            ..update(2, "bert")
        });
        s.tracker.aktualisieren(VoiceUpdate {
            server_mute: true,
            ..update(3, "carl")
        });
        s.tracker.aktualisieren(VoiceUpdate {
            streaming: true,
            ..update(4, "dora")
        });

        let a = preview(&s, &kontext_im_kanal());
        assert_eq!(a.titel, "Voice Channel: Lounge");
        assert!(a.beschreibung.starts_with("**4 member(s) in voice:**"));
        assert!(a.beschreibung.contains("🎤 anna"));
        assert!(a.beschreibung.contains("🔕 bert"));
        assert!(a.beschreibung.contains("🔇 carl"));
        assert!(a.beschreibung.contains("📹 dora"));
    }
}
