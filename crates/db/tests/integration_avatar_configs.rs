//! Integration-Tests fuer AvatarConfigRepository (In-Memory SQLite)

use echosprite_core::AvatarEinstellungen;
use echosprite_db::{models::NeueAvatarConfig, AvatarConfigRepository, SqliteDb};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

#[tokio::test]
async fn konfiguration_anlegen_und_zugriff_zaehlen() {
    let db = db().await;
    let einstellungen = AvatarEinstellungen::default();

    let config = db
        .create_config(NeueAvatarConfig {
            public_id: "00112233445566778899aabbccddeeff",
            idle_image: Some("data:image/png;base64,AA=="),
            talking_image: None,
            sensitivity: 30,
            einstellungen: &einstellungen,
        })
        .await
        .unwrap();
    assert_eq!(config.access_count, 0);

    let erster = db
        .get_and_touch("00112233445566778899aabbccddeeff")
        .await
        .unwrap()
        .expect("Konfiguration sollte existieren");
    assert_eq!(erster.access_count, 1);
    assert!(erster.last_accessed_at.is_some());

    let zweiter = db
        .get_and_touch("00112233445566778899aabbccddeeff")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(zweiter.access_count, 2);

    // Reines Lesen zaehlt nicht
    let ohne = db
        .get_config("00112233445566778899aabbccddeeff")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ohne.access_count, 2);
}

#[tokio::test]
async fn unbekannte_id_ist_none() {
    let db = db().await;
    assert!(db.get_and_touch("gibtsnicht").await.unwrap().is_none());
    assert!(db.get_config("gibtsnicht").await.unwrap().is_none());
}
