//! Relay – Tracker-Ereignisse an Viewer weiterleiten
//!
//! Ein einzelner Task liest alle Ereignisse des `VoiceTracker` und verteilt
//! sie an die Gruppen- und Einzelansichten. Verpasste Ereignisse (Lag)
//! werden nur protokolliert, reconnectende Viewer erhalten ohnehin einen
//! frischen Snapshot.

use echosprite_protocol::{ViewerAbo, ViewerMitglied, ViewerNachricht};
use echosprite_voice::{MitgliedZustand, VoiceEreignis, VoiceTracker};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::broadcast::ViewerBroadcaster;

/// Wandelt einen Mitgliedszustand in die Viewer-Darstellung
pub fn viewer_mitglied(m: &MitgliedZustand) -> ViewerMitglied {
    ViewerMitglied {
        user_id: m.user_id,
        username: m.username.clone(),
        state: m.zustand(),
        avatar: m.discord_avatar_url(),
    }
}

/// Initialer Zustand fuer einen neu verbundenen Viewer
pub fn snapshot(tracker: &VoiceTracker, abo: ViewerAbo) -> ViewerNachricht {
    let members = match abo {
        ViewerAbo::Kanal(kanal) => tracker
            .mitglieder_in_kanal(kanal)
            .iter()
            .map(viewer_mitglied)
            .collect(),
        ViewerAbo::Benutzer(user) => tracker
            .mitglied(user)
            .iter()
            .map(viewer_mitglied)
            .collect(),
    };
    ViewerNachricht::Init { members }
}

/// Verteilt ein einzelnes Ereignis und gibt die Anzahl der Empfaenger zurueck
pub fn ereignis_verteilen(broadcaster: &ViewerBroadcaster, ereignis: &VoiceEreignis) -> usize {
    let nachricht = match ereignis {
        VoiceEreignis::Beigetreten(m) => ViewerNachricht::Init {
            members: vec![viewer_mitglied(m)],
        },
        VoiceEreignis::Verlassen { user_id, .. } => ViewerNachricht::Leave { user_id: *user_id },
        VoiceEreignis::ZustandGeaendert {
            user_id, zustand, ..
        } => ViewerNachricht::Update {
            user_id: *user_id,
            state: *zustand,
        },
    };

    let kanal = ereignis.channel_id();
    let user = ereignis.user_id();
    broadcaster.an_kanal_senden(&kanal, nachricht.clone())
        + broadcaster.an_user_beobachter_senden(&user, nachricht)
}

/// Startet den Relay-Task
pub fn relay_starten(tracker: &VoiceTracker, broadcaster: ViewerBroadcaster) -> JoinHandle<()> {
    let mut rx = tracker.abonnieren();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ereignis) => {
                    let empfaenger = ereignis_verteilen(&broadcaster, &ereignis);
                    tracing::trace!(user_id = %ereignis.user_id(), empfaenger, "Voice-Ereignis verteilt");
                }
                Err(RecvError::Lagged(anzahl)) => {
                    tracing::warn!(verpasst = anzahl, "Relay hinkt hinterher, Ereignisse verworfen");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Voice-Tracker beendet, Relay stoppt");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use echosprite_core::{AvatarZustand, DiscordUserId, GuildId, VoiceChannelId};
    use echosprite_voice::VoiceUpdate;
    use std::time::Duration;

    fn update(user: u64, kanal: Option<u64>) -> VoiceUpdate {
        VoiceUpdate {
            user_id: DiscordUserId(user),
            guild_id: Some(GuildId(1)),
            channel_id: kanal.map(VoiceChannelId),
            username: format!("user{user}"),
            avatar_hash: None,
            self_mute: false,
            self_deaf: false,
            server_mute: false,
            server_deaf: false,
            streaming: false,
        }
    }

    #[test]
    fn snapshot_fuer_kanal_und_benutzer() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));
        tracker.aktualisieren(update(2, Some(100)));

        match snapshot(&tracker, ViewerAbo::Kanal(VoiceChannelId(100))) {
            ViewerNachricht::Init { members } => assert_eq!(members.len(), 2),
            andere => panic!("unerwartet: {andere:?}"),
        }
        match snapshot(&tracker, ViewerAbo::Benutzer(DiscordUserId(3))) {
            ViewerNachricht::Init { members } => assert!(members.is_empty()),
            andere => panic!("unerwartet: {andere:?}"),
        }
    }

    async fn warten(rx: &mut tokio::sync::mpsc::Receiver<ViewerNachricht>) -> ViewerNachricht {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("Timeout")
            .expect("Queue geschlossen")
    }

    #[tokio::test]
    async fn relay_leitet_weiter() {
        let tracker = VoiceTracker::neu();
        let broadcaster = ViewerBroadcaster::neu();
        let (_, mut gruppe) = broadcaster.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(100)));
        let (_, mut einzel) = broadcaster.viewer_registrieren(ViewerAbo::Benutzer(DiscordUserId(1)));
        let handle = relay_starten(&tracker, broadcaster);

        tracker.aktualisieren(update(1, Some(100)));
        tracker.sprechen_setzen(DiscordUserId(1), true);
        tracker.aktualisieren(update(1, None));

        assert!(matches!(warten(&mut gruppe).await, ViewerNachricht::Init { .. }));
        assert_eq!(
            warten(&mut gruppe).await,
            ViewerNachricht::Update {
                user_id: DiscordUserId(1),
                state: AvatarZustand::Talking
            }
        );
        assert_eq!(
            warten(&mut gruppe).await,
            ViewerNachricht::Leave {
                user_id: DiscordUserId(1)
            }
        );
        assert!(matches!(warten(&mut einzel).await, ViewerNachricht::Init { members } if members.len() == 1));

        handle.abort();
    }
}
