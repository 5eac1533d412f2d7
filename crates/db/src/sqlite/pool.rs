//! SQLite-Verbindungen fuer EchoSprite
//!
//! Bilder liegen als Daten-URLs direkt in den Tabellen, einzelne Zeilen
//! koennen daher mehrere Megabyte gross sein.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Wartezeit auf eine gesperrte Datenbank, bevor ein Fehler gemeldet wird
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Gemeinsamer Pool aller Repositories
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

fn verbindungs_optionen(url: &str) -> Result<SqliteConnectOptions, DbError> {
    Ok(SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT))
}

impl SqliteDb {
    /// Oeffnet die Datenbankdatei (legt sie bei Bedarf an) und migriert
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let optionen = verbindungs_optionen(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen.max(1))
            .connect_with(optionen)
            .await?;
        tracing::info!(
            url = %config.url,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "SQLite-Datenbank geoeffnet"
        );

        Self::migriert(pool).await
    }

    /// Frische In-Memory-Datenbank (Tests)
    pub async fn in_memory() -> Result<Self, DbError> {
        // Jede Verbindung haette sonst ihre eigene leere Datenbank
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect_with(verbindungs_optionen("sqlite::memory:")?)
            .await?;
        Self::migriert(pool).await
    }

    async fn migriert(pool: SqlitePool) -> Result<Self, DbError> {
        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    /// Fuehrt ausstehende Migrationen aus `migrations/` aus
    pub async fn migrationen_ausfuehren(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Migrationen aktuell");
        Ok(())
    }

    /// Live-Pruefung fuer `/health` und `/status`
    pub async fn ist_erreichbar(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Wartet auf laufende Abfragen und schliesst den Pool
    pub async fn schliessen(&self) {
        self.pool.close().await;
        tracing::info!("Datenbank geschlossen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_ist_erreichbar_bis_zum_schliessen() {
        let db = SqliteDb::in_memory().await.unwrap();
        assert!(db.ist_erreichbar().await);
        db.schliessen().await;
        assert!(!db.ist_erreichbar().await);
    }

    #[tokio::test]
    async fn migrationen_sind_wiederholbar() {
        let db = SqliteDb::in_memory().await.unwrap();
        db.migrationen_ausfuehren().await.unwrap();
    }
}
