//! Integration-Tests fuer den Viewer-WebSocket (echter TCP-Server)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use echosprite_api::{router, ApiKonfig, ApiState, RateLimitKonfig, RateLimiter};
use echosprite_auth::{DiscordOAuth, OAuthConfig, SessionStore};
use echosprite_avatar::{AvatarService, ViewerUrls};
use echosprite_core::{DiscordUserId, GuildId, VoiceChannelId};
use echosprite_db::SqliteDb;
use echosprite_observability::{EchoSpriteMetrics, HealthState};
use echosprite_signaling::{relay_starten, ViewerBroadcaster};
use echosprite_voice::{VoiceTracker, VoiceUpdate};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WARTEZEIT: Duration = Duration::from_secs(5);

fn im_kanal(user: u64, kanal: u64, name: &str) -> VoiceUpdate {
    VoiceUpdate {
        user_id: DiscordUserId(user),
        guild_id: Some(GuildId(1)),
        channel_id: Some(VoiceChannelId(kanal)),
        username: name.into(),
        avatar_hash: None,
        self_mute: false,
        self_deaf: false,
        server_mute: false,
        server_deaf: false,
        streaming: false,
    }
}

/// Startet Router und Relay auf einem freien Port
async fn server_starten() -> (SocketAddr, ApiState) {
    let db = Arc::new(SqliteDb::in_memory().await.expect("DB"));
    let state = ApiState {
        avatar: Arc::new(AvatarService::neu(
            Arc::clone(&db),
            ViewerUrls::neu("https://frontend.test"),
        )),
        db,
        sessions: SessionStore::neu(),
        oauth: Arc::new(DiscordOAuth::neu(OAuthConfig::default()).expect("OAuth")),
        tracker: VoiceTracker::neu(),
        broadcaster: ViewerBroadcaster::neu(),
        limiter: RateLimiter::neu(RateLimitKonfig::default()),
        health: HealthState::default(),
        metriken: EchoSpriteMetrics::neu().expect("Metriken"),
        konfig: Arc::new(ApiKonfig::default()),
    };
    relay_starten(&state.tracker, state.broadcaster.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

async fn verbinden(addr: SocketAddr, abfrage: &str) -> Client {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws{abfrage}"))
        .await
        .expect("WebSocket-Handshake");
    client
}

/// Naechste Nachricht (Pings werden uebersprungen)
async fn naechste(client: &mut Client) -> Message {
    loop {
        let nachricht = tokio::time::timeout(WARTEZEIT, client.next())
            .await
            .expect("Timeout beim Warten auf Nachricht")
            .expect("Verbindung unerwartet beendet")
            .expect("WebSocket-Fehler");
        if !matches!(nachricht, Message::Ping(_) | Message::Pong(_)) {
            return nachricht;
        }
    }
}

async fn naechstes_json(client: &mut Client) -> Value {
    match naechste(client).await {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        andere => panic!("Textnachricht erwartet, erhalten: {andere:?}"),
    }
}

#[tokio::test]
async fn kanal_viewer_erhaelt_snapshot_und_updates() {
    let (addr, state) = server_starten().await;
    state.tracker.aktualisieren(im_kanal(1, 500, "alice"));
    state.tracker.aktualisieren(im_kanal(2, 600, "bob"));

    let mut client = verbinden(addr, "?channelId=500").await;

    let init = naechstes_json(&mut client).await;
    assert_eq!(init["type"], "init");
    let members = init["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["userId"], "1");
    assert_eq!(members[0]["username"], "alice");
    assert_eq!(members[0]["state"], "idle");

    state.tracker.sprechen_setzen(DiscordUserId(1), true);
    let update = naechstes_json(&mut client).await;
    assert_eq!(update["type"], "update");
    assert_eq!(update["userId"], "1");
    assert_eq!(update["state"], "talking");

    let mut weg = im_kanal(1, 500, "alice");
    weg.channel_id = None;
    state.tracker.aktualisieren(weg);
    let leave = naechstes_json(&mut client).await;
    assert_eq!(leave["type"], "leave");
    assert_eq!(leave["userId"], "1");
}

#[tokio::test]
async fn benutzer_viewer_erhaelt_beitritt() {
    let (addr, state) = server_starten().await;

    let mut client = verbinden(addr, "?userId=7").await;
    let init = naechstes_json(&mut client).await;
    assert_eq!(init["type"], "init");
    assert!(init["members"].as_array().unwrap().is_empty());

    state.tracker.aktualisieren(im_kanal(7, 500, "carol"));
    let beitritt = naechstes_json(&mut client).await;
    assert_eq!(beitritt["type"], "init");
    assert_eq!(beitritt["members"][0]["userId"], "7");
}

#[tokio::test]
async fn ohne_abo_fehler_und_close() {
    let (addr, state) = server_starten().await;

    let mut client = verbinden(addr, "").await;
    let fehler = naechstes_json(&mut client).await;
    assert_eq!(fehler["type"], "error");
    assert!(fehler["message"].as_str().unwrap().contains("channelId or userId"));

    assert!(matches!(naechste(&mut client).await, Message::Close(_)));
    assert_eq!(state.broadcaster.viewer_anzahl(), 0);
}
