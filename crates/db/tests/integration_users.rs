//! Integration-Tests fuer UserRepository (In-Memory SQLite)

use echosprite_core::DiscordUserId;
use echosprite_db::{models::BenutzerDaten, SqliteDb, UserRepository};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn daten(discord_id: u64, username: &str) -> BenutzerDaten<'_> {
    BenutzerDaten {
        discord_id: DiscordUserId(discord_id),
        username,
        discriminator: Some("0"),
        avatar: None,
    }
}

#[tokio::test]
async fn benutzer_anlegen_und_laden() {
    let db = db().await;

    let user = db
        .upsert(daten(111111111111111111, "alice"))
        .await
        .expect("Upsert fehlgeschlagen");

    assert_eq!(user.username, "alice");
    assert_eq!(user.discord_id, DiscordUserId(111111111111111111));

    let geladen = db
        .get_by_id(user.id)
        .await
        .unwrap()
        .expect("Benutzer sollte gefunden werden");
    assert_eq!(geladen.discord_id, user.discord_id);

    let per_discord = db
        .get_by_discord_id(DiscordUserId(111111111111111111))
        .await
        .unwrap()
        .expect("Benutzer sollte per Discord-ID gefunden werden");
    assert_eq!(per_discord.id, user.id);
}

#[tokio::test]
async fn upsert_aktualisiert_bestehenden_benutzer() {
    let db = db().await;

    let erster = db.upsert(daten(42, "alt")).await.unwrap();
    let zweiter = db
        .upsert(BenutzerDaten {
            discord_id: DiscordUserId(42),
            username: "neu",
            discriminator: None,
            avatar: Some("a_hash"),
        })
        .await
        .unwrap();

    assert_eq!(erster.id, zweiter.id, "Upsert darf keine zweite Zeile anlegen");
    assert_eq!(zweiter.username, "neu");
    assert_eq!(zweiter.avatar.as_deref(), Some("a_hash"));
    assert!(zweiter.discriminator.is_none());
    assert_eq!(db.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unbekannter_benutzer_ist_none() {
    let db = db().await;
    let ergebnis = db.get_by_discord_id(DiscordUserId(7)).await.unwrap();
    assert!(ergebnis.is_none());
}

#[tokio::test]
async fn liste_neueste_zuerst() {
    let db = db().await;
    db.upsert(daten(1, "erster")).await.unwrap();
    db.upsert(daten(2, "zweiter")).await.unwrap();

    let liste = db.list().await.unwrap();
    assert_eq!(liste.len(), 2);
    assert_eq!(liste[0].username, "zweiter");
    assert_eq!(liste[1].username, "erster");
}
