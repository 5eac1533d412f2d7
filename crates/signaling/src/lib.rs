//! echosprite-signaling – Viewer-Verteilung
//!
//! Verteilt den Voice-Zustand an verbundene OBS-Browser-Quellen:
//! - [`broadcast`] – Registry der Viewer-Queues mit Kanal- und Benutzer-Abos
//! - [`relay`] – Uebersetzt Tracker-Ereignisse in Viewer-Nachrichten
//! - [`connection`] – WebSocket-Schleife pro Viewer (Ping/Pong, Queue)

pub mod broadcast;
pub mod connection;
pub mod error;
pub mod relay;

pub use broadcast::{ViewerBroadcaster, ViewerId};
pub use connection::{fehler_senden, viewer_bedienen};
pub use error::{SignalingError, SignalingResult};
pub use relay::{relay_starten, snapshot};
