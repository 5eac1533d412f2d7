//! echosprite-voice – Voice-State-Spiegel
//!
//! Haelt den Voice-Zustand aller Discord-Mitglieder im Speicher, die der
//! Bot sieht, und meldet Aenderungen als Ereignisse.
//!
//! ## Module
//! - [`state`] – Zustand eines Mitglieds und Gateway-Updates
//! - [`tracker`] – Der `VoiceTracker` mit Event-Broadcast

pub mod state;
pub mod tracker;

pub use state::{MitgliedZustand, VoiceUpdate};
pub use tracker::{VoiceEreignis, VoiceTracker};
