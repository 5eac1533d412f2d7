//! Viewer-Broadcaster – Sendet Nachrichten an alle relevanten Viewer
//!
//! Der ViewerBroadcaster verwaltet die Send-Queues aller verbundenen
//! Browser-Quellen und stellt Methoden bereit, um Nachrichten gezielt oder
//! an alle zu senden.
//!
//! ## Selektives Broadcasting
//! - An alle Viewer: `an_alle_senden`
//! - An Gruppenansichten eines Kanals: `an_kanal_senden`
//! - An Einzelansichten eines Benutzers: `an_user_beobachter_senden`

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use echosprite_core::{DiscordUserId, VoiceChannelId};
use echosprite_protocol::{ViewerAbo, ViewerNachricht};
use tokio::sync::mpsc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Groesse der Send-Queue pro Viewer
const SEND_QUEUE_GROESSE: usize = 64;

/// Eindeutige ID einer Viewer-Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(pub Uuid);

impl ViewerId {
    pub fn neu() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ViewerSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue eines verbundenen Viewers
#[derive(Clone, Debug)]
struct ViewerSender {
    viewer_id: ViewerId,
    abo: ViewerAbo,
    tx: mpsc::Sender<ViewerNachricht>,
}

impl ViewerSender {
    /// Sendet eine Nachricht nicht-blockierend an den Viewer
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    fn senden(&self, nachricht: ViewerNachricht) -> bool {
        match self.tx.try_send(nachricht) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(viewer = %self.viewer_id, "Send-Queue voll, Nachricht verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(viewer = %self.viewer_id, "Send-Queue geschlossen (Viewer getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ViewerBroadcaster
// ---------------------------------------------------------------------------

/// Zentraler Broadcaster fuer alle verbundenen Viewer
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct ViewerBroadcaster {
    inner: Arc<ViewerBroadcasterInner>,
}

struct ViewerBroadcasterInner {
    viewer: DashMap<ViewerId, ViewerSender>,
    /// Gruppenansichten: channel_id -> Viewer
    kanal_abos: DashMap<VoiceChannelId, Vec<ViewerId>>,
    /// Einzelansichten: user_id -> Viewer
    user_abos: DashMap<DiscordUserId, Vec<ViewerId>>,
}

impl ViewerBroadcaster {
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(ViewerBroadcasterInner {
                viewer: DashMap::new(),
                kanal_abos: DashMap::new(),
                user_abos: DashMap::new(),
            }),
        }
    }

    /// Registriert einen neuen Viewer und gibt seine Empfangs-Queue zurueck
    ///
    /// Die WebSocket-Schleife liest aus dieser Queue und sendet an den Browser.
    pub fn viewer_registrieren(&self, abo: ViewerAbo) -> (ViewerId, mpsc::Receiver<ViewerNachricht>) {
        let viewer_id = ViewerId::neu();
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.inner
            .viewer
            .insert(viewer_id, ViewerSender { viewer_id, abo, tx });

        match abo {
            ViewerAbo::Kanal(kanal) => self.inner.kanal_abos.entry(kanal).or_default().push(viewer_id),
            ViewerAbo::Benutzer(user) => self.inner.user_abos.entry(user).or_default().push(viewer_id),
        }

        tracing::debug!(viewer = %viewer_id, abo = ?abo, "Viewer registriert");
        (viewer_id, rx)
    }

    /// Entfernt einen Viewer aus dem Broadcaster
    pub fn viewer_entfernen(&self, viewer_id: &ViewerId) {
        let Some((_, sender)) = self.inner.viewer.remove(viewer_id) else {
            return;
        };

        match sender.abo {
            ViewerAbo::Kanal(kanal) => {
                self.inner.kanal_abos.remove_if_mut(&kanal, |_, ids| {
                    ids.retain(|id| id != viewer_id);
                    ids.is_empty()
                });
            }
            ViewerAbo::Benutzer(user) => {
                self.inner.user_abos.remove_if_mut(&user, |_, ids| {
                    ids.retain(|id| id != viewer_id);
                    ids.is_empty()
                });
            }
        }
        tracing::debug!(viewer = %viewer_id, "Viewer entfernt");
    }

    /// Sendet eine Nachricht an einen einzelnen Viewer
    pub fn an_viewer_senden(&self, viewer_id: &ViewerId, nachricht: ViewerNachricht) -> bool {
        match self.inner.viewer.get(viewer_id) {
            Some(sender) => sender.senden(nachricht),
            None => false,
        }
    }

    /// Sendet eine Nachricht an alle Gruppenansichten eines Kanals
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_kanal_senden(&self, kanal: &VoiceChannelId, nachricht: ViewerNachricht) -> usize {
        let ids = match self.inner.kanal_abos.get(kanal) {
            Some(ids) => ids.clone(),
            None => return 0,
        };
        self.an_ids_senden(&ids, nachricht)
    }

    /// Sendet eine Nachricht an alle Einzelansichten eines Benutzers
    pub fn an_user_beobachter_senden(
        &self,
        user: &DiscordUserId,
        nachricht: ViewerNachricht,
    ) -> usize {
        let ids = match self.inner.user_abos.get(user) {
            Some(ids) => ids.clone(),
            None => return 0,
        };
        self.an_ids_senden(&ids, nachricht)
    }

    /// Sendet eine Nachricht an alle verbundenen Viewer
    pub fn an_alle_senden(&self, nachricht: ViewerNachricht) -> usize {
        let mut gesendet = 0;
        self.inner.viewer.iter().for_each(|entry| {
            if entry.value().senden(nachricht.clone()) {
                gesendet += 1;
            }
        });
        gesendet
    }

    fn an_ids_senden(&self, ids: &[ViewerId], nachricht: ViewerNachricht) -> usize {
        let mut gesendet = 0;
        for id in ids {
            if let Some(sender) = self.inner.viewer.get(id) {
                if sender.senden(nachricht.clone()) {
                    gesendet += 1;
                }
            }
        }
        gesendet
    }

    /// Gibt die Anzahl der verbundenen Viewer zurueck
    pub fn viewer_anzahl(&self) -> usize {
        self.inner.viewer.len()
    }

    /// Anzahl der Gruppenansichten fuer einen Kanal
    pub fn kanal_beobachter(&self, kanal: &VoiceChannelId) -> usize {
        self.inner.kanal_abos.get(kanal).map(|ids| ids.len()).unwrap_or(0)
    }
}

impl Default for ViewerBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use echosprite_core::AvatarZustand;

    fn update(user: u64) -> ViewerNachricht {
        ViewerNachricht::Update {
            user_id: DiscordUserId(user),
            state: AvatarZustand::Talking,
        }
    }

    #[tokio::test]
    async fn kanal_nachricht_erreicht_nur_kanal_viewer() {
        let b = ViewerBroadcaster::neu();
        let (_, mut rx1) = b.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(1)));
        let (_, mut rx2) = b.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(2)));

        let gesendet = b.an_kanal_senden(&VoiceChannelId(1), update(5));
        assert_eq!(gesendet, 1);
        assert_eq!(rx1.recv().await, Some(update(5)));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn user_beobachter() {
        let b = ViewerBroadcaster::neu();
        let (_, mut rx) = b.viewer_registrieren(ViewerAbo::Benutzer(DiscordUserId(5)));
        let (_, mut andere) = b.viewer_registrieren(ViewerAbo::Benutzer(DiscordUserId(6)));

        assert_eq!(b.an_user_beobachter_senden(&DiscordUserId(5), update(5)), 1);
        assert_eq!(rx.recv().await, Some(update(5)));
        assert!(andere.try_recv().is_err());
    }

    #[tokio::test]
    async fn entfernen_raeumt_abos_auf() {
        let b = ViewerBroadcaster::neu();
        let (id, _rx) = b.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(1)));
        assert_eq!(b.kanal_beobachter(&VoiceChannelId(1)), 1);

        b.viewer_entfernen(&id);
        assert_eq!(b.viewer_anzahl(), 0);
        assert_eq!(b.kanal_beobachter(&VoiceChannelId(1)), 0);
        assert_eq!(b.an_kanal_senden(&VoiceChannelId(1), update(1)), 0);
    }

    #[tokio::test]
    async fn volle_queue_verwirft() {
        let b = ViewerBroadcaster::neu();
        let (id, _rx) = b.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(1)));

        for _ in 0..SEND_QUEUE_GROESSE {
            assert!(b.an_viewer_senden(&id, update(1)));
        }
        assert!(!b.an_viewer_senden(&id, update(1)));
    }

    #[tokio::test]
    async fn an_alle() {
        let b = ViewerBroadcaster::neu();
        let (_, mut rx1) = b.viewer_registrieren(ViewerAbo::Kanal(VoiceChannelId(1)));
        let (_, mut rx2) = b.viewer_registrieren(ViewerAbo::Benutzer(DiscordUserId(2)));

        assert_eq!(b.an_alle_senden(update(9)), 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }
}
