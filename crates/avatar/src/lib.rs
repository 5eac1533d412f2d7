//! echosprite-avatar – Geschaeftslogik fuer Avatare
//!
//! Gemeinsame Logik fuer REST-API und Discord-Bot:
//! - [`service`] – Basis-Avatar, Einstellungen, Analytics
//! - [`profile`] – benannte Profile (max. 20 pro Benutzer)
//! - [`config`] – anonyme Konfigurationen mit oeffentlicher ID
//! - [`urls`] – OBS-Browserquellen-URLs

pub mod config;
pub mod error;
pub mod profile;
pub mod service;
pub mod urls;

pub use config::{KonfigurationsStatistik, NeueKonfiguration, OeffentlicheKonfiguration};
pub use error::{AvatarError, AvatarResult};
pub use profile::{ProfilErstellt, ProfilGeloescht, ProfilWechsel, MAX_PROFILE};
pub use service::{AvatarService, AvatarSpeicher, ProfilInfo, Quelle, ViewerAvatar};
pub use urls::ViewerUrls;
