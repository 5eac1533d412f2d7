//! `/settings view` und die einzelnen Schalter

use echosprite_avatar::AvatarError;
use echosprite_core::EinstellungsAenderung;

use crate::antwort::{haken, Antwort};
use crate::error::BotResult;
use crate::kontext::BefehlsKontext;
use crate::BotState;

fn kein_avatar() -> Antwort {
    Antwort::fehler(
        "No Avatar Found",
        "You haven't uploaded an avatar yet. Upload one first with `/avatar upload`.",
    )
}

pub async fn view(state: &BotState, k: &BefehlsKontext) -> BotResult<Antwort> {
    let Some(avatar) = state.avatar.avatar_laden(k.user_id).await? else {
        return Ok(kein_avatar());
    };
    let e = &avatar.einstellungen;

    Ok(Antwort::info("Your Settings", "Current avatar settings:")
        .feld(
            "🎨 Animations",
            format!(
                "Bounce: {}\nFade: {}",
                haken(e.bounce.unwrap_or(false)),
                haken(e.fade.unwrap_or(false))
            ),
            true,
        )
        .feld(
            "👥 Group View",
            format!(
                "Show Names: {}\nInclude Self: {}\nDim Inactive: {}",
                haken(e.show_names_oder_standard()),
                haken(e.include_self_oder_standard()),
                haken(e.dim_inactive.unwrap_or(false))
            ),
            true,
        )
        .feld("📏 Spacing", format!("{}px", e.spacing_oder_standard()), true)
        .feld(
            "💡 Tip",
            "Use `/settings <option> <value>` to change settings!",
            false,
        ))
}

pub async fn setzen(
    state: &BotState,
    k: &BefehlsKontext,
    aenderung: EinstellungsAenderung,
) -> BotResult<Antwort> {
    match state.avatar.einstellung_aendern(k.user_id, aenderung).await {
        Ok(_) => Ok(Antwort::erfolg(
            "Settings Updated",
            format!(
                "**{}** has been set to **{}**",
                aenderung.schluessel(),
                aenderung.wert()
            ),
        )),
        Err(AvatarError::KeinAvatar) => Ok(kein_avatar()),
        Err(e) => Err(e.into()),
    }
}
