//! Befehls-Dispatcher – Routet Slash-Commands an die Handler
//!
//! Fehler eines Handlers werden hier in eine Fehlerantwort mit dem zum
//! Befehl passenden Titel umgewandelt. Es gibt immer eine Antwort.

use crate::antwort::Antwort;
use crate::befehl::BotBefehl;
use crate::handlers::{avatar, channel, profile, settings, utility};
use crate::kontext::BefehlsKontext;
use crate::BotState;

/// Fuehrt einen Befehl aus und liefert die Antwort fuer Discord
pub async fn ausfuehren(state: &BotState, k: &BefehlsKontext, befehl: &BotBefehl) -> Antwort {
    let ergebnis = match befehl {
        BotBefehl::AvatarUpload(anhaenge) => avatar::upload(state, k, anhaenge).await,
        BotBefehl::AvatarView => avatar::view(state, k).await,
        BotBefehl::AvatarUrl => avatar::url(state, k).await,
        BotBefehl::AvatarDelete => avatar::delete(state, k).await,

        BotBefehl::ChannelUrl => Ok(channel::url(state, k)),
        BotBefehl::ChannelPreview | BotBefehl::ChannelMembers => Ok(channel::preview(state, k)),

        BotBefehl::SettingsView => settings::view(state, k).await,
        BotBefehl::SettingsSetzen(aenderung) => settings::setzen(state, k, *aenderung).await,

        BotBefehl::ProfileCreate { name } => profile::create(state, k, name).await,
        BotBefehl::ProfileUpload { profil, anhaenge } => {
            profile::upload(state, k, profil, anhaenge).await
        }
        BotBefehl::ProfileList => profile::list(state, k).await,
        BotBefehl::ProfileSwitch { profil } => profile::switch(state, k, profil).await,
        BotBefehl::ProfileUrl { profil } => profile::url(state, k, profil.as_deref()).await,
        BotBefehl::ProfileDelete { profil } => profile::delete(state, k, profil).await,
        BotBefehl::ProfileRename { alt, neu } => profile::rename(state, k, alt, neu).await,

        BotBefehl::Help => Ok(utility::help(state)),
        BotBefehl::Status => Ok(utility::status(state).await),
    };

    match ergebnis {
        Ok(antwort) => antwort,
        Err(e) => {
            tracing::error!(discord_id = %k.user_id, befehl = ?befehl, fehler = %e, "Befehl fehlgeschlagen");
            Antwort::fehler(befehl.fehlertitel(), befehl.fehlertext(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testhilfe::{anhaenge, kontext, state};

    #[tokio::test]
    async fn fehler_wird_zur_antwort() {
        let s = state().await;
        let mut a = anhaenge(false);
        a.idle.groesse = 20 * 1024 * 1024;

        let antwort = ausfuehren(&s, &kontext(), &BotBefehl::AvatarUpload(a)).await;
        assert!(antwort.ist_fehler());
        assert_eq!(antwort.titel, "Upload Failed");
        assert_eq!(antwort.beschreibung, "File too large: 20.00MB. Maximum: 10MB");
    }

    #[tokio::test]
    async fn ungueltiger_profilname() {
        let s = state().await;
        let antwort = ausfuehren(
            &s,
            &kontext(),
            &BotBefehl::ProfileCreate { name: "!!!".into() },
        )
        .await;
        assert_eq!(antwort.titel, "Failed to Create Profile");
        assert_eq!(
            antwort.beschreibung,
            "Profile name must contain letters or numbers"
        );
    }

    #[tokio::test]
    async fn erfolgreicher_ablauf() {
        let s = state().await;
        let k = kontext();
        let antwort = ausfuehren(&s, &k, &BotBefehl::AvatarUpload(anhaenge(false))).await;
        assert_eq!(antwort.titel, "Avatar Uploaded!");
        let antwort = ausfuehren(&s, &k, &BotBefehl::AvatarUrl).await;
        assert_eq!(antwort.titel, "Your OBS Browser Source URLs");
        let antwort = ausfuehren(&s, &k, &BotBefehl::ChannelMembers).await;
        assert_eq!(antwort.titel, "Not in Voice Channel");
    }
}
