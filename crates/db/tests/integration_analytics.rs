//! Integration-Tests fuer AnalyticsRepository (In-Memory SQLite)

use chrono::{Duration, Utc};
use echosprite_core::DiscordUserId;
use echosprite_db::{models::BenutzerDaten, AnalyticsRepository, SqliteDb, UserRepository};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

#[tokio::test]
async fn ereignis_protokollieren() {
    let db = db().await;

    let eintrag = db
        .log_event("slash_command", None, serde_json::json!({"command": "help"}))
        .await
        .unwrap();

    assert_eq!(eintrag.event_type, "slash_command");
    assert!(eintrag.user_id.is_none());
    assert_eq!(eintrag.metadata["command"], "help");
}

#[tokio::test]
async fn statistik_gruppiert_nach_typ_und_tag() {
    let db = db().await;
    let user = db
        .upsert(BenutzerDaten {
            discord_id: DiscordUserId(1),
            username: "a",
            discriminator: None,
            avatar: None,
        })
        .await
        .unwrap();

    for _ in 0..3 {
        db.log_event("slash_command", Some(user.id), serde_json::json!({}))
            .await
            .unwrap();
    }
    db.log_event("login", Some(user.id), serde_json::json!({}))
        .await
        .unwrap();

    let start = Utc::now() - Duration::days(1);
    let ende = Utc::now() + Duration::days(1);
    let stats = db.stats(start, ende).await.unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].event_type, "slash_command");
    assert_eq!(stats[0].count, 3);
    assert_eq!(stats[1].event_type, "login");
    assert_eq!(stats[1].count, 1);
    assert_eq!(stats[0].date.len(), 10);
}

#[tokio::test]
async fn statistik_ausserhalb_des_zeitraums_leer() {
    let db = db().await;
    db.log_event("login", None, serde_json::json!({})).await.unwrap();

    let start = Utc::now() - Duration::days(10);
    let ende = Utc::now() - Duration::days(5);
    assert!(db.stats(start, ende).await.unwrap().is_empty());
}
