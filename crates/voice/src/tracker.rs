//! VoiceTracker – Spiegel des Discord-Voice-Zustands
//!
//! Der Gateway-Handler meldet jedes Voice-State-Update hier. Der Tracker
//! berechnet daraus Beitritt, Verlassen und Zustandswechsel und verteilt
//! diese ueber einen Broadcast-Kanal an alle Abonnenten (WebSocket-Relay,
//! Metriken).

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use echosprite_core::{AvatarZustand, DiscordUserId, GuildId, VoiceChannelId};
use tokio::sync::broadcast;

use crate::state::{MitgliedZustand, VoiceUpdate};

// ---------------------------------------------------------------------------
// Ereignisse
// ---------------------------------------------------------------------------

/// Aenderungen die der Tracker meldet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEreignis {
    /// Mitglied hat einen Voice-Kanal betreten
    Beigetreten(MitgliedZustand),
    /// Mitglied hat den Kanal verlassen (oder gewechselt)
    Verlassen {
        user_id: DiscordUserId,
        channel_id: VoiceChannelId,
    },
    /// Anzeigezustand hat sich geaendert
    ZustandGeaendert {
        user_id: DiscordUserId,
        channel_id: VoiceChannelId,
        zustand: AvatarZustand,
    },
}

impl VoiceEreignis {
    pub fn user_id(&self) -> DiscordUserId {
        match self {
            Self::Beigetreten(m) => m.user_id,
            Self::Verlassen { user_id, .. } | Self::ZustandGeaendert { user_id, .. } => *user_id,
        }
    }

    pub fn channel_id(&self) -> VoiceChannelId {
        match self {
            Self::Beigetreten(m) => m.channel_id,
            Self::Verlassen { channel_id, .. } | Self::ZustandGeaendert { channel_id, .. } => {
                *channel_id
            }
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceTracker
// ---------------------------------------------------------------------------

/// Groesse des Broadcast-Kanals fuer Voice-Ereignisse
const EVENT_KANAL_GROESSE: usize = 512;

/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct VoiceTracker {
    inner: Arc<VoiceTrackerInner>,
}

struct VoiceTrackerInner {
    /// Alle Mitglieder in einem Voice-Kanal, indiziert nach Discord-ID
    mitglieder: DashMap<DiscordUserId, MitgliedZustand>,
    event_tx: broadcast::Sender<VoiceEreignis>,
}

impl Default for VoiceTracker {
    fn default() -> Self {
        Self::neu()
    }
}

impl VoiceTracker {
    pub fn neu() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_KANAL_GROESSE);
        Self {
            inner: Arc::new(VoiceTrackerInner {
                mitglieder: DashMap::new(),
                event_tx,
            }),
        }
    }

    /// Neuer Empfaenger fuer alle zukuenftigen Ereignisse
    pub fn abonnieren(&self) -> broadcast::Receiver<VoiceEreignis> {
        self.inner.event_tx.subscribe()
    }

    /// Uebernimmt ein Voice-State-Update und gibt die resultierenden Ereignisse zurueck
    ///
    /// Lesen, Schreiben und Verteilen laufen unter dem Lock des Eintrags, wie
    /// bei `sprechen_setzen`.
    pub fn aktualisieren(&self, update: VoiceUpdate) -> Vec<VoiceEreignis> {
        let melden = |ereignisse: Vec<VoiceEreignis>| {
            self.verteilen(&ereignisse);
            ereignisse
        };

        match (self.inner.mitglieder.entry(update.user_id), update.channel_id) {
            (Entry::Vacant(_), None) => Vec::new(),
            (Entry::Occupied(eintrag), None) => {
                let (_, alt) = eintrag.remove_entry();
                tracing::debug!(user_id = %update.user_id, channel_id = %alt.channel_id, "Voice verlassen");
                melden(vec![VoiceEreignis::Verlassen {
                    user_id: alt.user_id,
                    channel_id: alt.channel_id,
                }])
            }
            (Entry::Vacant(eintrag), Some(kanal)) => {
                let neu = MitgliedZustand::aus_update(&update, kanal);
                let _gesperrt = eintrag.insert(neu.clone());
                tracing::debug!(user_id = %update.user_id, channel_id = %kanal, "Voice betreten");
                melden(vec![VoiceEreignis::Beigetreten(neu)])
            }
            (Entry::Occupied(mut eintrag), Some(kanal)) if eintrag.get().channel_id != kanal => {
                // Kanalwechsel: Sprechstatus gilt nicht im neuen Kanal
                let neu = MitgliedZustand::aus_update(&update, kanal);
                let alt = eintrag.insert(neu.clone());
                tracing::debug!(
                    user_id = %update.user_id,
                    von = %alt.channel_id,
                    nach = %kanal,
                    "Voice-Kanal gewechselt"
                );
                melden(vec![
                    VoiceEreignis::Verlassen {
                        user_id: alt.user_id,
                        channel_id: alt.channel_id,
                    },
                    VoiceEreignis::Beigetreten(neu),
                ])
            }
            (Entry::Occupied(mut eintrag), Some(kanal)) => {
                let vorher = eintrag.get().zustand();
                let mut neu = MitgliedZustand::aus_update(&update, kanal);
                neu.spricht = eintrag.get().spricht;
                let zustand = neu.zustand();
                eintrag.insert(neu);
                if zustand == vorher {
                    return Vec::new();
                }
                melden(vec![VoiceEreignis::ZustandGeaendert {
                    user_id: update.user_id,
                    channel_id: kanal,
                    zustand,
                }])
            }
        }
    }

    /// Setzt den Sprechstatus (vom Browser gemeldet)
    ///
    /// Gibt `None` zurueck wenn das Mitglied in keinem Kanal ist oder sich der
    /// Anzeigezustand nicht aendert (z.B. sprechen waehrend stumm).
    pub fn sprechen_setzen(&self, user_id: DiscordUserId, spricht: bool) -> Option<VoiceEreignis> {
        let mut eintrag = self.inner.mitglieder.get_mut(&user_id)?;
        let vorher = eintrag.zustand();
        eintrag.spricht = spricht;
        let nachher = eintrag.zustand();
        if vorher == nachher {
            return None;
        }
        let ereignis = VoiceEreignis::ZustandGeaendert {
            user_id,
            channel_id: eintrag.channel_id,
            zustand: nachher,
        };
        self.verteilen(std::slice::from_ref(&ereignis));
        Some(ereignis)
    }

    /// Uebernimmt den Voice-Snapshot einer Guild (z.B. nach Reconnect)
    ///
    /// Mitglieder der Guild, die nicht mehr im Snapshot stehen, werden entfernt.
    pub fn gilde_initialisieren(&self, guild_id: GuildId, zustaende: Vec<VoiceUpdate>) -> usize {
        let im_snapshot: HashSet<DiscordUserId> = zustaende
            .iter()
            .filter(|u| u.channel_id.is_some())
            .map(|u| u.user_id)
            .collect();

        let veraltet: Vec<DiscordUserId> = self
            .inner
            .mitglieder
            .iter()
            .filter(|e| e.guild_id == Some(guild_id) && !im_snapshot.contains(e.key()))
            .map(|e| *e.key())
            .collect();

        for user_id in veraltet {
            if let Some((_, alt)) = self.inner.mitglieder.remove(&user_id) {
                self.verteilen(&[VoiceEreignis::Verlassen {
                    user_id,
                    channel_id: alt.channel_id,
                }]);
            }
        }

        for update in zustaende {
            self.aktualisieren(update);
        }

        tracing::info!(guild_id = %guild_id, mitglieder = im_snapshot.len(), "Voice-Snapshot uebernommen");
        im_snapshot.len()
    }

    /// Alle Mitglieder eines Kanals, nach Name sortiert
    pub fn mitglieder_in_kanal(&self, channel_id: VoiceChannelId) -> Vec<MitgliedZustand> {
        let mut liste: Vec<MitgliedZustand> = self
            .inner
            .mitglieder
            .iter()
            .filter(|e| e.channel_id == channel_id)
            .map(|e| e.value().clone())
            .collect();
        liste.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));
        liste
    }

    pub fn mitglied(&self, user_id: DiscordUserId) -> Option<MitgliedZustand> {
        self.inner.mitglieder.get(&user_id).map(|e| e.value().clone())
    }

    /// Voice-Kanal in dem sich das Mitglied gerade befindet
    pub fn kanal_von(&self, user_id: DiscordUserId) -> Option<VoiceChannelId> {
        self.inner.mitglieder.get(&user_id).map(|e| e.channel_id)
    }

    /// Anzahl aller Mitglieder in Voice-Kanaelen
    pub fn anzahl(&self) -> usize {
        self.inner.mitglieder.len()
    }

    fn verteilen(&self, ereignisse: &[VoiceEreignis]) {
        for ereignis in ereignisse {
            // Fehler heisst nur: aktuell kein Abonnent
            let _ = self.inner.event_tx.send(ereignis.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn beitritt_und_verlassen() {
        let tracker = VoiceTracker::neu();

        let ereignisse = tracker.aktualisieren(update(1, Some(100)));
        assert!(matches!(ereignisse.as_slice(), [VoiceEreignis::Beigetreten(m)] if m.channel_id == VoiceChannelId(100)));
        assert_eq!(tracker.kanal_von(DiscordUserId(1)), Some(VoiceChannelId(100)));

        let ereignisse = tracker.aktualisieren(update(1, None));
        assert_eq!(
            ereignisse,
            vec![VoiceEreignis::Verlassen {
                user_id: DiscordUserId(1),
                channel_id: VoiceChannelId(100)
            }]
        );
        assert_eq!(tracker.anzahl(), 0);
    }

    #[test]
    fn verlassen_ohne_beitritt_ist_leer() {
        let tracker = VoiceTracker::neu();
        assert!(tracker.aktualisieren(update(1, None)).is_empty());
    }

    #[test]
    fn kanalwechsel_meldet_verlassen_und_beitritt() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));
        tracker.sprechen_setzen(DiscordUserId(1), true);

        let ereignisse = tracker.aktualisieren(update(1, Some(200)));
        assert_eq!(ereignisse.len(), 2);
        assert_eq!(ereignisse[0].channel_id(), VoiceChannelId(100));
        assert!(matches!(&ereignisse[1], VoiceEreignis::Beigetreten(m) if !m.spricht));
        assert!(tracker.mitglieder_in_kanal(VoiceChannelId(100)).is_empty());
        assert_eq!(tracker.mitglieder_in_kanal(VoiceChannelId(200)).len(), 1);
    }

    #[test]
    fn stumm_schalten_aendert_zustand() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));

        let mut u = update(1, Some(100));
        u.self_mute = true;
        let ereignisse = tracker.aktualisieren(u.clone());
        assert_eq!(
            ereignisse,
            vec![VoiceEreignis::ZustandGeaendert {
                user_id: DiscordUserId(1),
                channel_id: VoiceChannelId(100),
                zustand: AvatarZustand::Muted
            }]
        );

        // Gleicher Zustand erneut: keine Meldung
        assert!(tracker.aktualisieren(u).is_empty());
    }

    #[test]
    fn sprechen_waehrend_stumm_ohne_ereignis() {
        let tracker = VoiceTracker::neu();
        let mut u = update(1, Some(100));
        u.self_mute = true;
        tracker.aktualisieren(u);

        assert!(tracker.sprechen_setzen(DiscordUserId(1), true).is_none());
        assert!(tracker.sprechen_setzen(DiscordUserId(99), true).is_none());
    }

    #[test]
    fn sprechen_erhaelt_sich_bei_update_im_selben_kanal() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));
        let e = tracker.sprechen_setzen(DiscordUserId(1), true).unwrap();
        assert!(matches!(e, VoiceEreignis::ZustandGeaendert { zustand: AvatarZustand::Talking, .. }));

        let mut u = update(1, Some(100));
        u.streaming = true;
        assert!(tracker.aktualisieren(u).is_empty());
        assert!(tracker.mitglied(DiscordUserId(1)).unwrap().spricht);
    }

    #[test]
    fn paralleles_update_ueberschreibt_sprechstatus_nicht() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));
        let fertig = std::sync::atomic::AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..200_000 {
                    if fertig.load(std::sync::atomic::Ordering::Relaxed) {
                        break;
                    }
                    tracker.aktualisieren(update(1, Some(100)));
                }
            });

            for i in 0..2_000 {
                let spricht = i % 2 == 0;
                tracker.sprechen_setzen(DiscordUserId(1), spricht);
                assert_eq!(tracker.mitglied(DiscordUserId(1)).unwrap().spricht, spricht);
            }
            fertig.store(true, std::sync::atomic::Ordering::Relaxed);
        });
    }

    #[test]
    fn snapshot_entfernt_veraltete_mitglieder() {
        let tracker = VoiceTracker::neu();
        tracker.aktualisieren(update(1, Some(100)));
        tracker.aktualisieren(update(2, Some(100)));

        let anzahl = tracker.gilde_initialisieren(GuildId(1), vec![update(2, Some(100)), update(3, Some(100))]);
        assert_eq!(anzahl, 2);
        assert!(tracker.mitglied(DiscordUserId(1)).is_none());

        let namen: Vec<_> = tracker
            .mitglieder_in_kanal(VoiceChannelId(100))
            .into_iter()
            .map(|m| m.username)
            .collect();
        assert_eq!(namen, vec!["user2", "user3"]);
    }

    #[tokio::test]
    async fn ereignisse_werden_verteilt() {
        let tracker = VoiceTracker::neu();
        let mut rx = tracker.abonnieren();

        tracker.aktualisieren(update(5, Some(100)));
        tracker.sprechen_setzen(DiscordUserId(5), true);

        let erstes = rx.recv().await.unwrap();
        assert!(matches!(erstes, VoiceEreignis::Beigetreten(_)));
        let zweites = rx.recv().await.unwrap();
        assert_eq!(zweites.user_id(), DiscordUserId(5));
    }
}
