//! `/help` und `/status`

use crate::antwort::{haken, Antwort};
use crate::BotState;

pub const FARBE_HILFE: u32 = 0x8a2be2;
pub const FARBE_GESUND: u32 = 0x00ff88;
pub const FARBE_GESTOERT: u32 = 0xff4444;

pub fn help(state: &BotState) -> Antwort {
    Antwort::eigen(
        FARBE_HILFE,
        "🎮 EchoSprite - Discord Commands",
        "Reactive VTuber avatars for OBS, Twitch, and YouTube",
    )
    .feld(
        "📸 Avatar Commands",
        "`/avatar upload` - Upload your avatar images\n`/avatar view` - View your current avatar\n`/avatar url` - Get OBS browser source URL\n`/avatar delete` - Delete your avatar",
        false,
    )
    .feld(
        "👥 Channel Commands",
        "`/channel url` - Get group viewer URL\n`/channel preview` - Preview voice channel members\n`/channel members` - List members in voice",
        false,
    )
    .feld(
        "⚙️ Settings Commands",
        "`/settings view` - View your settings\n`/settings bounce` - Toggle bounce animation\n`/settings fade` - Toggle fade effect\n`/settings spacing` - Set avatar spacing\n`/settings show-names` - Toggle username display\n`/settings include-self` - Include yourself in group view\n`/settings dim-inactive` - Dim inactive avatars",
        false,
    )
    .feld(
        "🗂️ Profile Commands",
        "`/profile create` - Create a profile\n`/profile upload` - Upload images to a profile\n`/profile list` - List your profiles\n`/profile switch` - Change the active profile\n`/profile url` - Get a profile URL\n`/profile delete` - Delete a profile\n`/profile rename` - Rename a profile",
        false,
    )
    .feld(
        "🔧 Utility Commands",
        "`/help` - Show this help message\n`/status` - Check bot status",
        false,
    )
    .feld("🌐 Web Dashboard", state.avatar.urls().basis(), false)
    .feld(
        "📚 Documentation",
        "[GitHub](https://github.com/RattusKing/echosprite) • [Setup Guide](https://github.com/RattusKing/echosprite/blob/main/SETUP-DISCORD.md)",
        false,
    )
    .mit_fusszeile("EchoSprite - Made for VTubers")
}

/// Baut die Statusantwort aus dem Health-Zustand
pub async fn status(state: &BotState) -> Antwort {
    let db_ok = state.db.ist_erreichbar().await;
    state.health.db_status_setzen(db_ok);
    let h = state.health.antwort();

    let (farbe, gesamt) = if db_ok {
        (FARBE_GESUND, "✅ Healthy")
    } else {
        (FARBE_GESTOERT, "❌ Unhealthy")
    };

    Antwort::eigen(
        farbe,
        "🤖 EchoSprite Status",
        format!("**Overall Status:** {gesamt}"),
    )
    .feld(
        "🤖 Discord Bot",
        if h.discord.bot == "online" {
            "✅ Online"
        } else {
            "❌ Offline"
        },
        true,
    )
    .feld(
        "🔐 OAuth",
        if h.discord.oauth == "configured" {
            "✅ Configured"
        } else {
            "❌ Not Configured"
        },
        true,
    )
    .feld(
        "🗄️ Database",
        format!(
            "{} {}",
            haken(db_ok),
            if db_ok { "Connected" } else { "Disconnected" }
        ),
        true,
    )
    .feld(
        "🔌 WebSocket",
        format!("✅ Active\n{} connection(s)", h.websocket.connections),
        true,
    )
    .feld("📅 Version", h.version, true)
    .feld(
        "🕐 Timestamp",
        h.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        true,
    )
    .mit_fusszeile("EchoSprite Status Check")
}
