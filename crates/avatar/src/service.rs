//! AvatarService – Basis-Avatare, Einstellungen und Analytics
//!
//! Wird von der REST-API und vom Discord-Bot gemeinsam genutzt. Profile und
//! anonyme Konfigurationen liegen in eigenen `impl`-Bloecken
//! (`profile.rs`, `config.rs`).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use echosprite_core::{
    name_zu_slug, AvatarBilder, AvatarEinstellungen, BildFehler, DiscordUserId,
    EinstellungsAenderung,
};
use echosprite_db::models::{AvatarRecord, BenutzerDaten, BenutzerRecord, EreignisStatistik, ProfilRecord};
use echosprite_db::{
    AnalyticsRepository, AvatarConfigRepository, AvatarRepository, ProfilRepository,
    UserRepository,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AvatarError, AvatarResult};
use crate::urls::ViewerUrls;

/// Alle Repositories, die der AvatarService benoetigt
pub trait AvatarSpeicher:
    UserRepository + AvatarRepository + ProfilRepository + AnalyticsRepository + AvatarConfigRepository
{
}

impl<T> AvatarSpeicher for T where
    T: UserRepository
        + AvatarRepository
        + ProfilRepository
        + AnalyticsRepository
        + AvatarConfigRepository
{
}

/// Herkunft eines Uploads bzw. einer Loeschung (fuer Analytics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quelle {
    Web,
    Discord,
}

impl Quelle {
    fn suffix(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Discord => "discord",
        }
    }
}

/// Name und Slug des ausgelieferten Profils
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilInfo {
    pub name: String,
    pub slug: String,
}

/// Was ein Viewer fuer einen Benutzer anzeigt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerAvatar {
    pub avatar: AvatarBilder,
    pub settings: AvatarEinstellungen,
    /// `None` wenn der Basis-Avatar ausgeliefert wird
    pub profile: Option<ProfilInfo>,
    pub updated_at: DateTime<Utc>,
}

impl ViewerAvatar {
    fn aus_profil(p: ProfilRecord) -> Self {
        Self {
            avatar: p.bilder,
            settings: p.einstellungen,
            profile: Some(ProfilInfo {
                name: p.name,
                slug: p.slug,
            }),
            updated_at: p.updated_at,
        }
    }

    fn aus_avatar(a: AvatarRecord) -> Self {
        Self {
            avatar: a.bilder,
            settings: a.einstellungen,
            profile: None,
            updated_at: a.updated_at,
        }
    }
}

/// Welche Slots belegt sind, als JSON fuer Analytics
pub(crate) fn zustaende_json(bilder: &AvatarBilder) -> serde_json::Value {
    serde_json::json!({
        "idle": bilder.idle.is_some(),
        "talking": bilder.talking.is_some(),
        "muted": bilder.muted.is_some(),
        "deafened": bilder.deafened.is_some(),
    })
}

/// Prueft Bilder fuer einen Upload (Daten-URLs und mindestens ein Grundbild)
pub(crate) fn bilder_pruefen(bilder: &AvatarBilder) -> Result<(), BildFehler> {
    bilder.validieren()?;
    if !bilder.hat_grundbild() {
        return Err(BildFehler::KeinBild);
    }
    Ok(())
}

/// Geschaeftslogik rund um Avatare
pub struct AvatarService<R: AvatarSpeicher> {
    pub(crate) repo: Arc<R>,
    urls: ViewerUrls,
}

impl<R: AvatarSpeicher> AvatarService<R> {
    pub fn neu(repo: Arc<R>, urls: ViewerUrls) -> Self {
        Self { repo, urls }
    }

    pub fn urls(&self) -> &ViewerUrls {
        &self.urls
    }

    // -----------------------------------------------------------------------
    // Benutzer
    // -----------------------------------------------------------------------

    /// Legt den Discord-Benutzer an oder aktualisiert Name und Avatar-Hash
    pub async fn benutzer_sicherstellen(
        &self,
        daten: BenutzerDaten<'_>,
    ) -> AvatarResult<BenutzerRecord> {
        Ok(self.repo.upsert(daten).await?)
    }

    pub async fn benutzer_finden(
        &self,
        discord_id: DiscordUserId,
    ) -> AvatarResult<Option<BenutzerRecord>> {
        Ok(self.repo.get_by_discord_id(discord_id).await?)
    }

    pub async fn benutzer_laden(&self, user_id: Uuid) -> AvatarResult<BenutzerRecord> {
        self.repo
            .get_by_id(user_id)
            .await?
            .ok_or(AvatarError::BenutzerNichtGefunden)
    }

    /// Alle Benutzer, neueste zuerst (Admin)
    pub async fn benutzer_auflisten(&self) -> AvatarResult<Vec<BenutzerRecord>> {
        Ok(self.repo.list().await?)
    }

    pub(crate) async fn benutzer_fuer(
        &self,
        discord_id: DiscordUserId,
    ) -> AvatarResult<BenutzerRecord> {
        self.repo
            .get_by_discord_id(discord_id)
            .await?
            .ok_or(AvatarError::BenutzerNichtGefunden)
    }

    // -----------------------------------------------------------------------
    // Basis-Avatar
    // -----------------------------------------------------------------------

    /// Speichert den Basis-Avatar eines Benutzers
    pub async fn avatar_speichern(
        &self,
        user_id: Uuid,
        bilder: AvatarBilder,
        einstellungen: AvatarEinstellungen,
        quelle: Quelle,
    ) -> AvatarResult<AvatarRecord> {
        if let Err(e) = bilder_pruefen(&bilder) {
            tracing::warn!(%user_id, fehler = %e, "Avatar-Upload abgelehnt");
            return Err(e.into());
        }
        einstellungen.validieren()?;

        let record = self
            .repo
            .upsert_avatar(user_id, &bilder, &einstellungen)
            .await?;

        self.ereignis_protokollieren(
            &format!("avatar_upload_{}", quelle.suffix()),
            Some(user_id),
            serde_json::json!({ "states": zustaende_json(&bilder) }),
        )
        .await;

        tracing::info!(%user_id, quelle = quelle.suffix(), "Avatar gespeichert");
        Ok(record)
    }

    pub async fn avatar_laden(
        &self,
        discord_id: DiscordUserId,
    ) -> AvatarResult<Option<AvatarRecord>> {
        Ok(self.repo.get_avatar_by_discord_id(discord_id).await?)
    }

    /// Bestimmt den Avatar fuer die OBS-Quelle
    ///
    /// Reihenfolge: ausdruecklich angefragtes Profil, aktives Profil mit
    /// Bildern, Basis-Avatar.
    pub async fn avatar_fuer_viewer(
        &self,
        discord_id: DiscordUserId,
        profil: Option<&str>,
    ) -> AvatarResult<ViewerAvatar> {
        let benutzer = self
            .repo
            .get_by_discord_id(discord_id)
            .await?
            .ok_or(AvatarError::KeinAvatar)?;

        if let Some(name) = profil {
            let slug = name_zu_slug(name);
            return self
                .repo
                .get_by_user_and_slug(benutzer.id, &slug)
                .await?
                .map(ViewerAvatar::aus_profil)
                .ok_or_else(|| AvatarError::ProfilNichtGefunden(name.to_string()));
        }

        if let Some(aktiv) = self.repo.get_active(benutzer.id).await? {
            if aktiv.bilder.hat_grundbild() {
                return Ok(ViewerAvatar::aus_profil(aktiv));
            }
        }

        self.repo
            .get_by_user_id(benutzer.id)
            .await?
            .map(ViewerAvatar::aus_avatar)
            .ok_or(AvatarError::KeinAvatar)
    }

    /// Loescht den Basis-Avatar; `false` wenn keiner existierte
    pub async fn avatar_loeschen(
        &self,
        discord_id: DiscordUserId,
        quelle: Quelle,
    ) -> AvatarResult<bool> {
        let Some(benutzer) = self.repo.get_by_discord_id(discord_id).await? else {
            return Ok(false);
        };

        let geloescht = self.repo.delete_avatar(benutzer.id).await?;
        if geloescht {
            self.ereignis_protokollieren(
                &format!("avatar_delete_{}", quelle.suffix()),
                Some(benutzer.id),
                serde_json::json!({}),
            )
            .await;
            tracing::info!(discord_id = %discord_id, "Avatar geloescht");
        }
        Ok(geloescht)
    }

    // -----------------------------------------------------------------------
    // Einstellungen
    // -----------------------------------------------------------------------

    /// Aendert eine einzelne Einstellung des Basis-Avatars
    pub async fn einstellung_aendern(
        &self,
        discord_id: DiscordUserId,
        aenderung: EinstellungsAenderung,
    ) -> AvatarResult<AvatarEinstellungen> {
        let benutzer = self
            .repo
            .get_by_discord_id(discord_id)
            .await?
            .ok_or(AvatarError::KeinAvatar)?;
        let avatar = self
            .repo
            .get_by_user_id(benutzer.id)
            .await?
            .ok_or(AvatarError::KeinAvatar)?;

        let mut einstellungen = avatar.einstellungen;
        einstellungen.anwenden(aenderung)?;
        let record = self
            .repo
            .update_settings(benutzer.id, &einstellungen)
            .await?;

        self.ereignis_protokollieren(
            "settings_update_discord",
            Some(benutzer.id),
            serde_json::json!({ "setting": aenderung.schluessel(), "value": aenderung.wert() }),
        )
        .await;

        tracing::info!(
            discord_id = %discord_id,
            einstellung = aenderung.schluessel(),
            wert = %aenderung.wert(),
            "Einstellung geaendert"
        );
        Ok(record.einstellungen)
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    /// Protokolliert ein Nutzungsereignis
    ///
    /// Fehler werden nur geloggt, die eigentliche Aktion gilt als erfolgreich.
    pub async fn ereignis_protokollieren(
        &self,
        event_type: &str,
        user_id: Option<Uuid>,
        metadata: serde_json::Value,
    ) {
        if let Err(e) = self.repo.log_event(event_type, user_id, metadata).await {
            tracing::warn!(event_type, fehler = %e, "Analytics-Ereignis konnte nicht gespeichert werden");
        }
    }

    /// Protokolliert einen Slash-Command, sofern der Benutzer bekannt ist
    pub async fn befehl_protokollieren(&self, discord_id: DiscordUserId, befehl: &str) {
        match self.repo.get_by_discord_id(discord_id).await {
            Ok(Some(benutzer)) => {
                self.ereignis_protokollieren(
                    "slash_command",
                    Some(benutzer.id),
                    serde_json::json!({ "command": befehl }),
                )
                .await
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(fehler = %e, "Benutzer fuer Befehls-Analytics nicht ladbar"),
        }
    }

    /// Ereignisse pro Typ und Tag (Admin)
    pub async fn statistik(
        &self,
        start: DateTime<Utc>,
        ende: DateTime<Utc>,
    ) -> AvatarResult<Vec<EreignisStatistik>> {
        if start > ende {
            return Err(echosprite_core::EchoSpriteError::validierung(
                "start must be before end",
            )
            .into());
        }
        Ok(self.repo.stats(start, ende).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echosprite_db::SqliteDb;

    const PNG: &str = "data:image/png;base64,iVBORw==";

    async fn service() -> AvatarService<SqliteDb> {
        let db = SqliteDb::in_memory().await.expect("DB");
        AvatarService::neu(Arc::new(db), ViewerUrls::default())
    }

    async fn benutzer(s: &AvatarService<SqliteDb>, id: u64) -> BenutzerRecord {
        s.benutzer_sicherstellen(BenutzerDaten {
            discord_id: DiscordUserId(id),
            username: "alice",
            discriminator: None,
            avatar: None,
        })
        .await
        .unwrap()
    }

    fn bilder() -> AvatarBilder {
        AvatarBilder {
            idle: Some(PNG.into()),
            talking: Some(PNG.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn speichern_und_fuer_viewer_laden() {
        let s = service().await;
        let b = benutzer(&s, 1).await;
        s.avatar_speichern(b.id, bilder(), AvatarEinstellungen::default(), Quelle::Web)
            .await
            .unwrap();

        let v = s.avatar_fuer_viewer(DiscordUserId(1), None).await.unwrap();
        assert_eq!(v.avatar.idle.as_deref(), Some(PNG));
        assert!(v.profile.is_none());
    }

    #[tokio::test]
    async fn ohne_bilder_abgelehnt() {
        let s = service().await;
        let b = benutzer(&s, 1).await;
        let e = s
            .avatar_speichern(
                b.id,
                AvatarBilder::default(),
                AvatarEinstellungen::default(),
                Quelle::Discord,
            )
            .await
            .unwrap_err();
        assert!(e.ist_eingabefehler());
        assert_eq!(e.to_string(), "At least idle or talking image is required");
    }

    #[tokio::test]
    async fn unbekannter_benutzer_hat_keinen_avatar() {
        let s = service().await;
        let e = s.avatar_fuer_viewer(DiscordUserId(9), None).await.unwrap_err();
        assert!(matches!(e, AvatarError::KeinAvatar));
        assert!(!s.avatar_loeschen(DiscordUserId(9), Quelle::Web).await.unwrap());
    }

    #[tokio::test]
    async fn einstellung_aendern_braucht_avatar() {
        let s = service().await;
        benutzer(&s, 1).await;
        let e = s
            .einstellung_aendern(DiscordUserId(1), EinstellungsAenderung::Bounce(true))
            .await
            .unwrap_err();
        assert!(matches!(e, AvatarError::KeinAvatar));
    }

    #[tokio::test]
    async fn einstellung_aendern_behaelt_andere_werte() {
        let s = service().await;
        let b = benutzer(&s, 1).await;
        let start = AvatarEinstellungen {
            fade: Some(true),
            ..Default::default()
        };
        s.avatar_speichern(b.id, bilder(), start, Quelle::Web)
            .await
            .unwrap();

        let neu = s
            .einstellung_aendern(DiscordUserId(1), EinstellungsAenderung::Spacing(40))
            .await
            .unwrap();
        assert_eq!(neu.spacing, Some(40));
        assert_eq!(neu.fade, Some(true));

        let e = s
            .einstellung_aendern(DiscordUserId(1), EinstellungsAenderung::Spacing(101))
            .await
            .unwrap_err();
        assert!(e.ist_eingabefehler());
    }

    #[tokio::test]
    async fn loeschen_protokolliert() {
        let s = service().await;
        let b = benutzer(&s, 1).await;
        s.avatar_speichern(b.id, bilder(), AvatarEinstellungen::default(), Quelle::Discord)
            .await
            .unwrap();
        assert!(s.avatar_loeschen(DiscordUserId(1), Quelle::Discord).await.unwrap());

        let stats = s
            .statistik(Utc::now() - chrono::Duration::days(1), Utc::now() + chrono::Duration::days(1))
            .await
            .unwrap();
        let typen: Vec<&str> = stats.iter().map(|s| s.event_type.as_str()).collect();
        assert!(typen.contains(&"avatar_upload_discord"));
        assert!(typen.contains(&"avatar_delete_discord"));
    }

    #[tokio::test]
    async fn statistik_zeitraum_geprueft() {
        let s = service().await;
        let jetzt = Utc::now();
        assert!(s
            .statistik(jetzt, jetzt - chrono::Duration::hours(1))
            .await
            .is_err());
    }
}
