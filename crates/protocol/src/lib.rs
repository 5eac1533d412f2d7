//! echosprite-protocol – Viewer-Protokoll
//!
//! Definiert die JSON-Nachrichten, die der Server ueber den WebSocket an
//! OBS-Browser-Quellen sendet, sowie die Abo-Parameter der Verbindung.

pub mod viewer;

pub use viewer::{ViewerAbo, ViewerAbfrage, ViewerMitglied, ViewerNachricht};
