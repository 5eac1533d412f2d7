//! Handler fuer alle Slash-Commands
//!
//! Jeder Handler bekommt den gemeinsamen [`BotState`](crate::BotState) und
//! den Aufrufer und liefert eine [`Antwort`](crate::Antwort). Erwartete
//! Fehler (kein Avatar, unbekanntes Profil) werden direkt als Fehlerantwort
//! gebaut, alles andere geht an den Dispatcher zurueck.

pub mod avatar;
pub mod channel;
pub mod profile;
pub mod settings;
pub mod utility;

use echosprite_core::bild::anhang_pruefen;
use echosprite_core::AvatarBilder;

use crate::befehl::{AnhangInfo, UploadAnhaenge};
use crate::error::BotResult;
use crate::lader::{anhang_laden, BildLader};
use crate::BotState;

pub(crate) const OBS_EINSTELLUNGEN: &str = "**Width:** 1920\n**Height:** 1080\n**FPS:** 30\n✅ Shutdown source when not visible\n✅ Refresh browser when scene becomes active";

/// Prueft alle Anhaenge und laedt sie danach herunter
pub(crate) async fn bilder_laden(
    state: &BotState,
    anhaenge: &UploadAnhaenge,
) -> BotResult<AvatarBilder> {
    let optional = [anhaenge.muted.as_ref(), anhaenge.deafened.as_ref()];
    for a in [Some(&anhaenge.idle), Some(&anhaenge.talking)]
        .into_iter()
        .chain(optional)
        .flatten()
    {
        anhang_pruefen(a.content_type.as_deref(), a.groesse)?;
    }

    let lader = state.lader.as_ref();
    Ok(AvatarBilder {
        idle: Some(anhang_laden(lader, &anhaenge.idle).await?),
        talking: Some(anhang_laden(lader, &anhaenge.talking).await?),
        muted: optional_laden(lader, anhaenge.muted.as_ref()).await?,
        deafened: optional_laden(lader, anhaenge.deafened.as_ref()).await?,
    })
}

async fn optional_laden(
    lader: &dyn BildLader,
    anhang: Option<&AnhangInfo>,
) -> BotResult<Option<String>> {
    match anhang {
        Some(a) => anhang_laden(lader, a).await.map(Some),
        None => Ok(None),
    }
}

/// Upload-Uebersicht: idle und talking sind immer dabei
pub(crate) fn hochgeladene_zustaende(bilder: &AvatarBilder) -> String {
    format!(
        "Idle: ✅\nTalking: ✅\nMuted: {}\nDeafened: {}",
        crate::antwort::haken(bilder.muted.is_some()),
        crate::antwort::haken(bilder.deafened.is_some())
    )
}

#[cfg(test)]
pub(crate) mod testhilfe {
    use std::sync::Arc;

    use echosprite_avatar::{AvatarService, ViewerUrls};
    use echosprite_core::{DiscordUserId, VoiceChannelId};
    use echosprite_db::SqliteDb;
    use echosprite_observability::{EchoSpriteMetrics, HealthState};
    use echosprite_voice::VoiceTracker;

    use crate::befehl::{AnhangInfo, UploadAnhaenge};
    use crate::kontext::{BefehlsKontext, VoiceKanal};
    use crate::lader::tests::FesterLader;
    use crate::BotState;

    pub(crate) async fn state() -> BotState {
        let db = Arc::new(SqliteDb::in_memory().await.expect("DB"));
        BotState {
            avatar: Arc::new(AvatarService::neu(
                db.clone(),
                ViewerUrls::neu("https://frontend.test"),
            )),
            db,
            tracker: VoiceTracker::neu(),
            lader: Arc::new(FesterLader::default()),
            health: HealthState::neu(),
            metriken: EchoSpriteMetrics::neu().expect("Metriken"),
        }
    }

    pub(crate) fn kontext() -> BefehlsKontext {
        BefehlsKontext {
            user_id: DiscordUserId(1001),
            username: "alice".into(),
            discriminator: None,
            avatar_hash: Some("abc".into()),
            voice_kanal: None,
        }
    }

    pub(crate) fn kontext_im_kanal() -> BefehlsKontext {
        BefehlsKontext {
            voice_kanal: Some(VoiceKanal {
                id: VoiceChannelId(77),
                name: "Lounge".into(),
            }),
            ..kontext()
        }
    }

    fn png(name: &str) -> AnhangInfo {
        AnhangInfo {
            url: format!("https://cdn.discordapp.com/attachments/1/2/{name}.png"),
            content_type: Some("image/png".into()),
            groesse: 2048,
            dateiname: format!("{name}.png"),
        }
    }

    pub(crate) fn anhaenge(mit_muted: bool) -> UploadAnhaenge {
        UploadAnhaenge {
            idle: png("idle"),
            talking: png("talking"),
            muted: mit_muted.then(|| png("muted")),
            deafened: None,
        }
    }
}
