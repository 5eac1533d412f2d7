//! `/avatar upload|view|url|delete`

use echosprite_avatar::{AvatarError, Quelle};
use echosprite_core::AvatarEinstellungen;

use crate::antwort::{codeblock, haken, Antwort};
use crate::befehl::UploadAnhaenge;
use crate::error::BotResult;
use crate::handlers::{bilder_laden, hochgeladene_zustaende, OBS_EINSTELLUNGEN};
use crate::kontext::BefehlsKontext;
use crate::BotState;

fn kein_avatar() -> Antwort {
    Antwort::fehler(
        "No Avatar Found",
        "You haven't uploaded an avatar yet. Use `/avatar upload` to get started!",
    )
}

pub async fn upload(
    state: &BotState,
    k: &BefehlsKontext,
    anhaenge: &UploadAnhaenge,
) -> BotResult<Antwort> {
    tracing::info!(discord_id = %k.user_id, "Lade Avatar-Bilder herunter");
    let bilder = bilder_laden(state, anhaenge).await?;

    let benutzer = state.avatar.benutzer_sicherstellen(k.benutzer_daten()).await?;
    // Vorhandene Einstellungen bleiben beim erneuten Upload erhalten
    let einstellungen = state
        .avatar
        .avatar_laden(k.user_id)
        .await?
        .map(|a| a.einstellungen)
        .unwrap_or_default();

    let zustaende = hochgeladene_zustaende(&bilder);
    state
        .avatar
        .avatar_speichern(benutzer.id, bilder, einstellungen, Quelle::Discord)
        .await?;

    let url = state.avatar.urls().einzel(k.user_id);
    Ok(Antwort::erfolg(
        "Avatar Uploaded!",
        "Your avatar has been saved successfully.",
    )
    .feld("📊 States Uploaded", zustaende, true)
    .feld("🔗 Individual Viewer URL", codeblock(&url), false)
    .feld(
        "💡 Next Steps",
        "1. Copy the URL above\n2. Add it as a Browser Source in OBS\n3. Set size to 1920x1080\n4. Join a Discord voice channel\n5. Your avatar will react automatically!",
        false,
    ))
}

fn einstellungen_text(e: &AvatarEinstellungen) -> String {
    if *e == AvatarEinstellungen::default() {
        return "Default settings".to_string();
    }
    serde_json::to_string_pretty(e).unwrap_or_else(|_| "Default settings".to_string())
}

pub async fn view(state: &BotState, k: &BefehlsKontext) -> BotResult<Antwort> {
    let Some(avatar) = state.avatar.avatar_laden(k.user_id).await? else {
        return Ok(kein_avatar());
    };

    let b = &avatar.bilder;
    Ok(Antwort::info(
        "Your Avatar Configuration",
        "Here are your current avatar states:",
    )
    .feld(
        "📊 Avatar States",
        format!(
            "Idle: {}\nTalking: {}\nMuted: {}\nDeafened: {}",
            haken(b.idle.is_some()),
            haken(b.talking.is_some()),
            haken(b.muted.is_some()),
            haken(b.deafened.is_some())
        ),
        true,
    )
    .feld("⚙️ Settings", einstellungen_text(&avatar.einstellungen), false)
    .feld(
        "🕐 Last Updated",
        avatar.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        true,
    ))
}

pub async fn url(state: &BotState, k: &BefehlsKontext) -> BotResult<Antwort> {
    if state.avatar.avatar_laden(k.user_id).await?.is_none() {
        return Ok(kein_avatar());
    }

    let url = state.avatar.urls().einzel(k.user_id);
    Ok(Antwort::erfolg("Your OBS Browser Source URLs", "Use these URLs in OBS Studio:")
        .feld(
            "👤 Individual Viewer",
            format!("Shows only your avatar\n{}", codeblock(&url)),
            false,
        )
        .feld("📺 OBS Settings", OBS_EINSTELLUNGEN, false)
        .feld(
            "💡 Tip",
            "For group viewing with others in your voice channel, join a voice channel and use `/channel url`",
            false,
        ))
}

pub async fn delete(state: &BotState, k: &BefehlsKontext) -> BotResult<Antwort> {
    match state.avatar.avatar_loeschen(k.user_id, Quelle::Discord).await {
        Ok(true) => Ok(Antwort::erfolg(
            "Avatar Deleted",
            "Your avatar configuration has been permanently deleted.",
        )),
        Ok(false) | Err(AvatarError::KeinAvatar) => Ok(Antwort::fehler(
            "No Avatar Found",
            "You don't have any avatar data to delete.",
        )),
        Err(e) => Err(e.into()),
    }
}
