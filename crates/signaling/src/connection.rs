//! Viewer-Verbindung – WebSocket-Schleife einer Browser-Quelle
//!
//! Ablauf:
//! 1. Viewer beim Broadcaster registrieren
//! 2. Snapshot (`init`) des abonnierten Kanals bzw. Benutzers senden
//! 3. Queue-Nachrichten weiterleiten, alle 30s pingen
//! 4. Bei Close, Fehler oder ausbleibendem Pong abmelden

use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use echosprite_protocol::{ViewerAbo, ViewerNachricht};
use echosprite_voice::VoiceTracker;
use futures_util::{SinkExt, StreamExt};

use crate::broadcast::ViewerBroadcaster;
use crate::error::{SignalingError, SignalingResult};
use crate::relay::snapshot;

/// Intervall zwischen zwei Pings
const PING_INTERVALL: Duration = Duration::from_secs(30);

/// Ohne Pong innerhalb dieser Zeit gilt die Verbindung als tot
const PONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Bedient eine Viewer-Verbindung bis zum Verbindungsende
pub async fn viewer_bedienen(
    socket: WebSocket,
    abo: ViewerAbo,
    tracker: VoiceTracker,
    broadcaster: ViewerBroadcaster,
) {
    let (viewer_id, mut rx) = broadcaster.viewer_registrieren(abo);
    let (mut sender, mut receiver) = socket.split();

    tracing::info!(viewer = %viewer_id, abo = ?abo, "Viewer verbunden");

    let init = snapshot(&tracker, abo).als_json();
    if sender.send(Message::Text(init)).await.is_err() {
        broadcaster.viewer_entfernen(&viewer_id);
        return;
    }

    let mut ping = tokio::time::interval(PING_INTERVALL);
    ping.tick().await;
    let mut letzter_pong = Instant::now();

    let grund: SignalingResult<()> = loop {
        tokio::select! {
            _ = ping.tick() => {
                if letzter_pong.elapsed() > PONG_TIMEOUT {
                    tracing::debug!(viewer = %viewer_id, "Kein Pong erhalten, Verbindung wird beendet");
                    break Err(SignalingError::VerbindungGetrennt);
                }
                if let Err(e) = sender.send(Message::Ping(Vec::new())).await {
                    break Err(e.into());
                }
            }
            nachricht = rx.recv() => {
                let Some(nachricht) = nachricht else {
                    break Ok(());
                };
                if let Err(e) = sender.send(Message::Text(nachricht.als_json())).await {
                    break Err(e.into());
                }
            }
            eingehend = receiver.next() => {
                match eingehend {
                    Some(Ok(Message::Pong(_))) => letzter_pong = Instant::now(),
                    Some(Ok(Message::Close(_))) | None => break Ok(()),
                    Some(Err(e)) => break Err(e.into()),
                    // Viewer senden keine Befehle, alles andere wird ignoriert
                    Some(Ok(_)) => {}
                }
            }
        }
    };

    broadcaster.viewer_entfernen(&viewer_id);
    let _ = sender.send(Message::Close(None)).await;

    match grund {
        Ok(()) => tracing::info!(viewer = %viewer_id, "Viewer getrennt"),
        Err(e) => tracing::debug!(viewer = %viewer_id, fehler = %e, "Viewer-Verbindung abgebrochen"),
    }
}

/// Sendet eine Fehlermeldung und schliesst die Verbindung
///
/// Wird fuer Verbindungen ohne gueltiges Abo (`channelId`/`userId`) verwendet.
pub async fn fehler_senden(mut socket: WebSocket, meldung: impl Into<String>) {
    let nachricht = ViewerNachricht::Error {
        message: meldung.into(),
    };
    let _ = socket.send(Message::Text(nachricht.als_json())).await;
    let _ = socket.send(Message::Close(None)).await;
}
