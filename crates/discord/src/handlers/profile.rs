//! `/profile create|upload|list|switch|url|delete|rename`

use echosprite_avatar::{AvatarError, ProfilWechsel, MAX_PROFILE};
use echosprite_db::models::ProfilRecord;

use crate::antwort::{codeblock, Antwort};
use crate::befehl::UploadAnhaenge;
use crate::error::BotResult;
use crate::handlers::{bilder_laden, hochgeladene_zustaende};
use crate::kontext::BefehlsKontext;
use crate::BotState;

fn nicht_gefunden(name: &str) -> Antwort {
    Antwort::fehler(
        "Profile Not Found",
        format!("Profile \"**{name}**\" doesn't exist.\n\nUse `/profile list` to see your profiles."),
    )
}

fn keine_profile() -> Antwort {
    Antwort::fehler(
        "No Profiles Found",
        "You haven't created any profiles yet.\n\nCreate your first profile with:\n`/profile create name:\"My First Profile\"`",
    )
}

fn status(p: &ProfilRecord) -> &'static str {
    if p.ist_aktiv {
        "✅ Active"
    } else {
        "⏸️ Inactive"
    }
}

pub async fn create(state: &BotState, k: &BefehlsKontext, name: &str) -> BotResult<Antwort> {
    let benutzer = state.avatar.benutzer_sicherstellen(k.benutzer_daten()).await?;
    let erstellt = match state.avatar.profil_erstellen(&benutzer, name).await {
        Ok(e) => e,
        Err(AvatarError::ProfilExistiert(vorhanden)) => {
            return Ok(Antwort::fehler(
                "Profile Already Exists",
                format!("You already have a profile named \"**{vorhanden}**\".\n\nUse `/profile list` to see all your profiles."),
            ))
        }
        Err(AvatarError::ProfilLimit(_)) => {
            return Ok(Antwort::fehler(
                "Profile Limit Reached",
                format!("You can have a maximum of **{MAX_PROFILE} profiles**.\n\nDelete an existing profile with `/profile delete` before creating a new one."),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let p = &erstellt.profil;
    let url = state.avatar.urls().profil(k.user_id, &p.slug);
    Ok(Antwort::erfolg(
        "Profile Created!",
        format!("Your profile \"**{}**\" has been created!", p.name),
    )
    .feld("🆔 Profile Slug", format!("`{}`", p.slug), true)
    .feld(
        "⭐ Status",
        if p.ist_aktiv {
            "✅ Active (First Profile)"
        } else {
            "⏸️ Inactive"
        },
        true,
    )
    .feld("📊 Total Profiles", erstellt.anzahl.to_string(), true)
    .feld(
        "📸 Next Step",
        format!("Upload images to this profile:\n`/profile upload profile:\"{}\"`", p.name),
        false,
    )
    .feld("🔗 Profile URL", codeblock(&url), false)
    .feld("💡 Tip", "Upload images to activate this profile!", false))
}

pub async fn upload(
    state: &BotState,
    k: &BefehlsKontext,
    name: &str,
    anhaenge: &UploadAnhaenge,
) -> BotResult<Antwort> {
    // Erst das Profil pruefen, dann herunterladen
    match state.avatar.profil_fuer_url(k.user_id, Some(name)).await {
        Ok(_) => {}
        Err(AvatarError::ProfilNichtGefunden(_)) => {
            return Ok(Antwort::fehler(
                "Profile Not Found",
                format!("Profile \"**{name}**\" doesn't exist.\n\nCreate it first with:\n`/profile create name:\"{name}\"`"),
            ))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(discord_id = %k.user_id, profil = name, "Lade Profilbilder herunter");
    let bilder = bilder_laden(state, anhaenge).await?;
    let zustaende = hochgeladene_zustaende(&bilder);

    let benutzer = state.avatar.benutzer_sicherstellen(k.benutzer_daten()).await?;
    let profil = state.avatar.profil_hochladen(&benutzer, name, bilder).await?;

    let url = state.avatar.urls().profil(k.user_id, &profil.slug);
    Ok(Antwort::erfolg(
        "Profile Uploaded!",
        format!("Images uploaded to profile \"**{}**\"!", profil.name),
    )
    .feld("📊 States Uploaded", zustaende, true)
    .feld("⭐ Status", status(&profil), true)
    .feld("🔗 Profile URL", codeblock(&url), false)
    .feld(
        "🎯 Make Active",
        if profil.ist_aktiv {
            "This profile is already active!".to_string()
        } else {
            format!("Switch to this profile:\n`/profile switch profile:\"{}\"`", profil.name)
        },
        false,
    ))
}

pub async fn list(state: &BotState, k: &BefehlsKontext) -> BotResult<Antwort> {
    let profile = state.avatar.profile_auflisten(k.user_id).await?;
    if profile.is_empty() {
        return Ok(keine_profile());
    }

    let liste = profile
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let status = if p.ist_aktiv {
                "⭐ **ACTIVE**"
            } else {
                "⏸️ Inactive"
            };
            let bilder = p.bilder.idle.is_some() && p.bilder.talking.is_some();
            format!(
                "{}. **{}** ({status}) {}",
                i + 1,
                p.name,
                crate::antwort::haken(bilder)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Antwort::info(
        "Your Avatar Profiles",
        format!("You have **{}** profile(s):", profile.len()),
    )
    .feld("📋 Profiles", liste, false)
    .feld(
        "💡 Tips",
        "✅ = Has images uploaded\n⭐ = Currently active profile\n⏸️ = Inactive profile",
        false,
    )
    .feld(
        "🔄 Switch Profiles",
        "Use `/profile switch` to change active profile",
        false,
    ))
}

pub async fn switch(state: &BotState, k: &BefehlsKontext, name: &str) -> BotResult<Antwort> {
    let profil = match state.avatar.profil_wechseln(k.user_id, name).await {
        Ok(ProfilWechsel::Gewechselt(p)) => p,
        Ok(ProfilWechsel::BereitsAktiv(p)) => {
            return Ok(Antwort::info(
                "Already Active",
                format!("Profile \"**{}**\" is already your active profile!", p.name),
            ))
        }
        Err(AvatarError::ProfilNichtGefunden(n)) => return Ok(nicht_gefunden(&n)),
        Err(e) => return Err(e.into()),
    };

    Ok(Antwort::erfolg(
        "Profile Switched!",
        format!("Now using profile \"**{}**\"", profil.name),
    )
    .feld("⭐ Active Profile", profil.name.clone(), true)
    .feld(
        "🔗 Default URL",
        "Your default viewer URL now shows this profile!",
        false,
    )
    .feld(
        "💡 Tip",
        "If you're already streaming, your OBS browser source will update automatically!",
        false,
    ))
}

pub async fn url(
    state: &BotState,
    k: &BefehlsKontext,
    name: Option<&str>,
) -> BotResult<Antwort> {
    let profil = match state.avatar.profil_fuer_url(k.user_id, name).await {
        Ok(p) => p,
        Err(AvatarError::ProfilNichtGefunden(n)) => return Ok(nicht_gefunden(&n)),
        Err(AvatarError::KeinAktivesProfil) => {
            return Ok(Antwort::fehler(
                "No Active Profile",
                "You don't have an active profile.\n\nCreate one with `/profile create`",
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let urls = state.avatar.urls();
    Ok(Antwort::erfolg(
        "Profile URL",
        format!("URL for profile \"**{}**\":", profil.name),
    )
    .feld(
        "🔗 Profile-Specific URL",
        format!(
            "{}\nThis URL always shows this specific profile",
            codeblock(&urls.profil(k.user_id, &profil.slug))
        ),
        false,
    )
    .feld(
        "🔗 Default URL",
        format!(
            "{}\nThis URL shows your active profile (changes when you switch)",
            codeblock(&urls.einzel(k.user_id))
        ),
        false,
    )
    .feld("⭐ Status", status(&profil), true)
    .feld("📺 OBS Setup", "**Width:** 1920\n**Height:** 1080\n**FPS:** 30", true))
}

pub async fn delete(state: &BotState, k: &BefehlsKontext, name: &str) -> BotResult<Antwort> {
    let geloescht = match state.avatar.profil_loeschen(k.user_id, name).await {
        Ok(g) => g,
        Err(AvatarError::ProfilNichtGefunden(n)) => return Ok(nicht_gefunden(&n)),
        Err(AvatarError::LetztesProfil) => {
            return Ok(Antwort::fehler(
                "Cannot Delete",
                "You cannot delete your only profile.\n\nCreate another profile first if you want to delete this one.",
            ))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Antwort::erfolg(
        "Profile Deleted",
        format!(
            "Profile \"**{}**\" has been permanently deleted.",
            geloescht.profil.name
        ),
    )
    .feld("📊 Remaining Profiles", geloescht.verbleibend.to_string(), true))
}

pub async fn rename(
    state: &BotState,
    k: &BefehlsKontext,
    alt: &str,
    neu: &str,
) -> BotResult<Antwort> {
    let profil = match state.avatar.profil_umbenennen(k.user_id, alt, neu).await {
        Ok(p) => p,
        Err(AvatarError::ProfilNichtGefunden(n)) => return Ok(nicht_gefunden(&n)),
        Err(AvatarError::ProfilExistiert(vorhanden)) => {
            return Ok(Antwort::fehler(
                "Name Conflict",
                format!("You already have a profile named \"**{vorhanden}**\".\n\nChoose a different name."),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let url = state.avatar.urls().profil(k.user_id, &profil.slug);
    Ok(Antwort::erfolg(
        "Profile Renamed",
        format!("Profile renamed from \"**{alt}**\" to \"**{}**\"!", profil.name),
    )
    .feld("🆔 New Slug", format!("`{}`", profil.slug), true)
    .feld("🔗 New URL", codeblock(&url), false)
    .feld(
        "⚠️ Important",
        "If you were using the profile-specific URL in OBS, you'll need to update it!",
        false,
    ))
}
