//! Integration-Tests fuer AvatarRepository (In-Memory SQLite)

use echosprite_core::{AvatarBilder, AvatarEinstellungen, DiscordUserId};
use echosprite_db::{
    models::BenutzerDaten, AvatarRepository, DbError, SqliteDb, UserRepository,
};
use uuid::Uuid;

async fn db_mit_user() -> (SqliteDb, Uuid) {
    let db = SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden");
    let user = db
        .upsert(BenutzerDaten {
            discord_id: DiscordUserId(500),
            username: "vtuber",
            discriminator: None,
            avatar: None,
        })
        .await
        .unwrap();
    (db, user.id)
}

fn bilder() -> AvatarBilder {
    AvatarBilder {
        idle: Some("data:image/png;base64,SURMRQ==".into()),
        talking: Some("data:image/png;base64,VEFMSw==".into()),
        muted: None,
        deafened: None,
    }
}

#[tokio::test]
async fn avatar_speichern_und_laden() {
    let (db, user_id) = db_mit_user().await;

    let einstellungen = AvatarEinstellungen {
        bounce: Some(true),
        ..Default::default()
    };
    let avatar = db.upsert_avatar(user_id, &bilder(), &einstellungen).await.unwrap();
    assert_eq!(avatar.user_id, user_id);
    assert_eq!(avatar.einstellungen.bounce, Some(true));

    let per_discord = db
        .get_avatar_by_discord_id(DiscordUserId(500))
        .await
        .unwrap()
        .expect("Avatar sollte gefunden werden");
    assert_eq!(per_discord.bilder, bilder());
}

#[tokio::test]
async fn upsert_ersetzt_bilder() {
    let (db, user_id) = db_mit_user().await;
    let erster = db
        .upsert_avatar(user_id, &bilder(), &AvatarEinstellungen::default())
        .await
        .unwrap();

    let mut neue = bilder();
    neue.muted = Some("data:image/gif;base64,TVVURQ==".into());
    let zweiter = db
        .upsert_avatar(user_id, &neue, &AvatarEinstellungen::default())
        .await
        .unwrap();

    assert_eq!(erster.id, zweiter.id);
    assert_eq!(zweiter.bilder.muted.as_deref(), Some("data:image/gif;base64,TVVURQ=="));
}

#[tokio::test]
async fn einstellungen_aktualisieren() {
    let (db, user_id) = db_mit_user().await;
    db.upsert_avatar(user_id, &bilder(), &AvatarEinstellungen::default())
        .await
        .unwrap();

    let einstellungen = AvatarEinstellungen {
        spacing: Some(42),
        show_names: Some(false),
        ..Default::default()
    };
    let avatar = db.update_settings(user_id, &einstellungen).await.unwrap();
    assert_eq!(avatar.einstellungen, einstellungen);
}

#[tokio::test]
async fn einstellungen_ohne_avatar_nicht_gefunden() {
    let (db, user_id) = db_mit_user().await;
    let ergebnis = db
        .update_settings(user_id, &AvatarEinstellungen::default())
        .await;
    assert!(matches!(ergebnis, Err(DbError::NichtGefunden(_))));
}

#[tokio::test]
async fn avatar_loeschen() {
    let (db, user_id) = db_mit_user().await;
    db.upsert_avatar(user_id, &bilder(), &AvatarEinstellungen::default())
        .await
        .unwrap();

    assert!(db.delete_avatar(user_id).await.unwrap());
    assert!(!db.delete_avatar(user_id).await.unwrap());
    assert!(db.get_by_user_id(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn avatar_ohne_benutzer_verletzt_fremdschluessel() {
    let db = SqliteDb::in_memory().await.unwrap();
    let ergebnis = db
        .upsert_avatar(Uuid::new_v4(), &bilder(), &AvatarEinstellungen::default())
        .await;
    assert!(ergebnis.is_err());
}
