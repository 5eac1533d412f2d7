//! echosprite-db – Datenbank-Schicht
//!
//! Dieses Crate stellt das Repository-Pattern fuer Benutzer, Avatare,
//! Profile, Analytics und anonyme Avatar-Konfigurationen bereit. Die
//! Implementierung basiert auf SQLite via sqlx, Migrationen werden beim
//! Oeffnen automatisch ausgefuehrt.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    AnalyticsRepository, AvatarConfigRepository, AvatarRepository, DatabaseConfig, DbResult,
    ProfilRepository, UserRepository,
};
pub use sqlite::SqliteDb;
