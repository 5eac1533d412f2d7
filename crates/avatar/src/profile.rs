//! Benannte Avatar-Profile
//!
//! Ein Benutzer kann bis zu [`MAX_PROFILE`] Profile anlegen. Genau eines ist
//! aktiv und wird von der Standard-Viewer-URL angezeigt, sobald es Bilder
//! hat. Profile werden ueber ihren Slug adressiert.

use echosprite_core::{
    name_zu_slug, AvatarBilder, DiscordUserId, EchoSpriteError,
};
use echosprite_db::models::{BenutzerRecord, NeuesProfil, ProfilRecord};
use echosprite_db::DbError;
use uuid::Uuid;

use crate::error::{AvatarError, AvatarResult};
use crate::service::{bilder_pruefen, zustaende_json, AvatarService, AvatarSpeicher};

/// Maximale Anzahl Profile pro Benutzer
pub const MAX_PROFILE: i64 = 20;

/// Maximale Laenge eines Profilnamens
const MAX_NAME_LAENGE: usize = 100;

/// Ergebnis von `profil_erstellen`
#[derive(Debug, Clone)]
pub struct ProfilErstellt {
    pub profil: ProfilRecord,
    /// Anzahl Profile nach dem Anlegen
    pub anzahl: i64,
}

/// Ergebnis von `profil_wechseln`
#[derive(Debug, Clone)]
pub enum ProfilWechsel {
    Gewechselt(ProfilRecord),
    BereitsAktiv(ProfilRecord),
}

/// Ergebnis von `profil_loeschen`
#[derive(Debug, Clone)]
pub struct ProfilGeloescht {
    pub profil: ProfilRecord,
    pub verbleibend: i64,
}

fn name_pruefen(name: &str) -> AvatarResult<(String, String)> {
    let name = name.trim();
    if name.chars().count() > MAX_NAME_LAENGE {
        return Err(EchoSpriteError::validierung("Profile name is too long (max 100 characters)").into());
    }
    let slug = name_zu_slug(name);
    if slug.is_empty() {
        return Err(
            EchoSpriteError::validierung("Profile name must contain letters or numbers").into(),
        );
    }
    Ok((name.to_string(), slug))
}

impl<R: AvatarSpeicher> AvatarService<R> {
    async fn profil_finden(&self, user_id: Uuid, name: &str) -> AvatarResult<ProfilRecord> {
        self.repo
            .get_by_user_and_slug(user_id, &name_zu_slug(name))
            .await?
            .ok_or_else(|| AvatarError::ProfilNichtGefunden(name.to_string()))
    }

    /// Benutzer fuer Profiloperationen; ohne Benutzer gibt es auch kein Profil
    async fn profil_benutzer(
        &self,
        discord_id: DiscordUserId,
        name: &str,
    ) -> AvatarResult<BenutzerRecord> {
        match self.benutzer_fuer(discord_id).await {
            Err(AvatarError::BenutzerNichtGefunden) => {
                Err(AvatarError::ProfilNichtGefunden(name.to_string()))
            }
            andere => andere,
        }
    }

    /// Legt ein neues Profil an; das erste Profil wird automatisch aktiv
    pub async fn profil_erstellen(
        &self,
        benutzer: &BenutzerRecord,
        name: &str,
    ) -> AvatarResult<ProfilErstellt> {
        let (name, slug) = name_pruefen(name)?;

        if let Some(vorhanden) = self.repo.get_by_user_and_slug(benutzer.id, &slug).await? {
            return Err(AvatarError::ProfilExistiert(vorhanden.name));
        }

        let anzahl = self.repo.count_profiles(benutzer.id).await?;
        if anzahl >= MAX_PROFILE {
            return Err(AvatarError::ProfilLimit(MAX_PROFILE));
        }

        let profil = self
            .repo
            .create_profile(NeuesProfil {
                user_id: benutzer.id,
                name: &name,
                slug: &slug,
                ist_aktiv: anzahl == 0,
            })
            .await
            .map_err(|e| match e {
                DbError::Eindeutigkeit(_) => AvatarError::ProfilExistiert(name.clone()),
                andere => andere.into(),
            })?;

        self.ereignis_protokollieren(
            "profile_create",
            Some(benutzer.id),
            serde_json::json!({ "profile_name": name }),
        )
        .await;
        tracing::info!(discord_id = %benutzer.discord_id, profil = %slug, "Profil angelegt");

        Ok(ProfilErstellt {
            profil,
            anzahl: anzahl + 1,
        })
    }

    /// Laedt neue Bilder in ein bestehendes Profil, Einstellungen bleiben erhalten
    pub async fn profil_hochladen(
        &self,
        benutzer: &BenutzerRecord,
        name: &str,
        bilder: AvatarBilder,
    ) -> AvatarResult<ProfilRecord> {
        let profil = self.profil_finden(benutzer.id, name).await?;
        bilder_pruefen(&bilder)?;

        let aktualisiert = self
            .repo
            .update_profile_images(profil.id, &bilder, &profil.einstellungen)
            .await?;

        self.ereignis_protokollieren(
            "profile_upload",
            Some(benutzer.id),
            serde_json::json!({ "profile_name": profil.name, "states": zustaende_json(&bilder) }),
        )
        .await;
        tracing::info!(discord_id = %benutzer.discord_id, profil = %profil.slug, "Profilbilder hochgeladen");

        Ok(aktualisiert)
    }

    /// Alle Profile, aelteste zuerst; leer wenn der Benutzer unbekannt ist
    pub async fn profile_auflisten(
        &self,
        discord_id: DiscordUserId,
    ) -> AvatarResult<Vec<ProfilRecord>> {
        match self.repo.get_by_discord_id(discord_id).await? {
            Some(benutzer) => Ok(self.repo.list_by_user(benutzer.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Setzt ein Profil aktiv
    pub async fn profil_wechseln(
        &self,
        discord_id: DiscordUserId,
        name: &str,
    ) -> AvatarResult<ProfilWechsel> {
        let benutzer = self.profil_benutzer(discord_id, name).await?;
        let profil = self.profil_finden(benutzer.id, name).await?;

        if profil.ist_aktiv {
            return Ok(ProfilWechsel::BereitsAktiv(profil));
        }

        self.repo.set_active(profil.id, benutzer.id).await?;
        self.ereignis_protokollieren(
            "profile_switch",
            Some(benutzer.id),
            serde_json::json!({ "profile_name": profil.name }),
        )
        .await;
        tracing::info!(discord_id = %discord_id, profil = %profil.slug, "Aktives Profil gewechselt");

        Ok(ProfilWechsel::Gewechselt(ProfilRecord {
            ist_aktiv: true,
            ..profil
        }))
    }

    /// Profil fuer eine URL: das genannte oder das aktive
    pub async fn profil_fuer_url(
        &self,
        discord_id: DiscordUserId,
        name: Option<&str>,
    ) -> AvatarResult<ProfilRecord> {
        match name {
            Some(name) => {
                let benutzer = self.profil_benutzer(discord_id, name).await?;
                self.profil_finden(benutzer.id, name).await
            }
            None => {
                let benutzer = self
                    .repo
                    .get_by_discord_id(discord_id)
                    .await?
                    .ok_or(AvatarError::KeinAktivesProfil)?;
                self.repo
                    .get_active(benutzer.id)
                    .await?
                    .ok_or(AvatarError::KeinAktivesProfil)
            }
        }
    }

    /// Loescht ein Profil
    ///
    /// Das einzige Profil kann nicht geloescht werden. Ist das Profil aktiv,
    /// wird vorher das aelteste verbleibende aktiviert.
    pub async fn profil_loeschen(
        &self,
        discord_id: DiscordUserId,
        name: &str,
    ) -> AvatarResult<ProfilGeloescht> {
        let benutzer = self.profil_benutzer(discord_id, name).await?;
        let profil = self.profil_finden(benutzer.id, name).await?;

        let anzahl = self.repo.count_profiles(benutzer.id).await?;
        if anzahl <= 1 {
            return Err(AvatarError::LetztesProfil);
        }

        if profil.ist_aktiv {
            let alle = self.repo.list_by_user(benutzer.id).await?;
            if let Some(naechstes) = alle.iter().find(|p| p.id != profil.id) {
                self.repo.set_active(naechstes.id, benutzer.id).await?;
            }
        }

        self.repo.delete_profile(profil.id, benutzer.id).await?;
        self.ereignis_protokollieren(
            "profile_delete",
            Some(benutzer.id),
            serde_json::json!({ "profile_name": profil.name }),
        )
        .await;
        tracing::info!(discord_id = %discord_id, profil = %profil.slug, "Profil geloescht");

        Ok(ProfilGeloescht {
            profil,
            verbleibend: anzahl - 1,
        })
    }

    /// Benennt ein Profil um (neuer Slug)
    pub async fn profil_umbenennen(
        &self,
        discord_id: DiscordUserId,
        alt: &str,
        neu: &str,
    ) -> AvatarResult<ProfilRecord> {
        let benutzer = self.profil_benutzer(discord_id, alt).await?;
        let profil = self.profil_finden(benutzer.id, alt).await?;
        let (neuer_name, neuer_slug) = name_pruefen(neu)?;

        if let Some(vorhanden) = self
            .repo
            .get_by_user_and_slug(benutzer.id, &neuer_slug)
            .await?
        {
            if vorhanden.id != profil.id {
                return Err(AvatarError::ProfilExistiert(vorhanden.name));
            }
        }

        let umbenannt = self
            .repo
            .rename_profile(profil.id, benutzer.id, &neuer_name, &neuer_slug)
            .await
            .map_err(|e| match e {
                DbError::Eindeutigkeit(_) => AvatarError::ProfilExistiert(neuer_name.clone()),
                andere => andere.into(),
            })?;

        self.ereignis_protokollieren(
            "profile_rename",
            Some(benutzer.id),
            serde_json::json!({ "old_name": profil.name, "new_name": neuer_name }),
        )
        .await;
        tracing::info!(
            discord_id = %discord_id,
            alt = %profil.slug,
            neu = %neuer_slug,
            "Profil umbenannt"
        );

        Ok(umbenannt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::ViewerUrls;
    use echosprite_db::models::BenutzerDaten;
    use echosprite_db::SqliteDb;
    use std::sync::Arc;

    const PNG: &str = "data:image/png;base64,iVBORw==";

    async fn aufbau() -> (AvatarService<SqliteDb>, BenutzerRecord) {
        let db = SqliteDb::in_memory().await.expect("DB");
        let s = AvatarService::neu(Arc::new(db), ViewerUrls::default());
        let b = s
            .benutzer_sicherstellen(BenutzerDaten {
                discord_id: DiscordUserId(7),
                username: "bob",
                discriminator: None,
                avatar: None,
            })
            .await
            .unwrap();
        (s, b)
    }

    fn bilder() -> AvatarBilder {
        AvatarBilder {
            idle: Some(PNG.into()),
            talking: Some(PNG.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn erstes_profil_ist_aktiv() {
        let (s, b) = aufbau().await;
        let erstes = s.profil_erstellen(&b, "Gaming Setup").await.unwrap();
        assert!(erstes.profil.ist_aktiv);
        assert_eq!(erstes.profil.slug, "gaming-setup");
        assert_eq!(erstes.anzahl, 1);

        let zweites = s.profil_erstellen(&b, "Chill").await.unwrap();
        assert!(!zweites.profil.ist_aktiv);
        assert_eq!(zweites.anzahl, 2);
    }

    #[tokio::test]
    async fn doppelter_slug_abgelehnt() {
        let (s, b) = aufbau().await;
        s.profil_erstellen(&b, "Gaming").await.unwrap();
        let e = s.profil_erstellen(&b, "GAMING!").await.unwrap_err();
        assert!(matches!(e, AvatarError::ProfilExistiert(ref n) if n == "Gaming"));
    }

    #[tokio::test]
    async fn leerer_name_abgelehnt() {
        let (s, b) = aufbau().await;
        let e = s.profil_erstellen(&b, "!!!").await.unwrap_err();
        assert!(e.ist_eingabefehler());
    }

    #[tokio::test]
    async fn limit_greift() {
        let (s, b) = aufbau().await;
        for i in 0..MAX_PROFILE {
            s.profil_erstellen(&b, &format!("p{i}")).await.unwrap();
        }
        let e = s.profil_erstellen(&b, "zu viel").await.unwrap_err();
        assert!(matches!(e, AvatarError::ProfilLimit(20)));
    }

    #[tokio::test]
    async fn aktives_profil_mit_bildern_gewinnt() {
        let (s, b) = aufbau().await;
        s.avatar_speichern(b.id, bilder(), Default::default(), crate::Quelle::Web)
            .await
            .unwrap();
        s.profil_erstellen(&b, "Stream").await.unwrap();

        // Aktiv, aber ohne Bilder: Basis-Avatar
        let v = s.avatar_fuer_viewer(b.discord_id, None).await.unwrap();
        assert!(v.profile.is_none());

        s.profil_hochladen(&b, "stream", bilder()).await.unwrap();
        let v = s.avatar_fuer_viewer(b.discord_id, None).await.unwrap();
        assert_eq!(v.profile.map(|p| p.slug).as_deref(), Some("stream"));

        let e = s
            .avatar_fuer_viewer(b.discord_id, Some("fehlt"))
            .await
            .unwrap_err();
        assert!(e.ist_nicht_gefunden());
    }

    #[tokio::test]
    async fn wechseln() {
        let (s, b) = aufbau().await;
        s.profil_erstellen(&b, "Eins").await.unwrap();
        s.profil_erstellen(&b, "Zwei").await.unwrap();

        assert!(matches!(
            s.profil_wechseln(b.discord_id, "eins").await.unwrap(),
            ProfilWechsel::BereitsAktiv(_)
        ));
        match s.profil_wechseln(b.discord_id, "Zwei").await.unwrap() {
            ProfilWechsel::Gewechselt(p) => assert!(p.ist_aktiv),
            andere => panic!("unerwartet: {andere:?}"),
        }
        let aktiv = s.profil_fuer_url(b.discord_id, None).await.unwrap();
        assert_eq!(aktiv.slug, "zwei");
    }

    #[tokio::test]
    async fn loeschen_aktiviert_anderes() {
        let (s, b) = aufbau().await;
        s.profil_erstellen(&b, "Eins").await.unwrap();

        let e = s.profil_loeschen(b.discord_id, "Eins").await.unwrap_err();
        assert!(matches!(e, AvatarError::LetztesProfil));

        s.profil_erstellen(&b, "Zwei").await.unwrap();
        let geloescht = s.profil_loeschen(b.discord_id, "Eins").await.unwrap();
        assert_eq!(geloescht.verbleibend, 1);

        let aktiv = s.profil_fuer_url(b.discord_id, None).await.unwrap();
        assert_eq!(aktiv.slug, "zwei");
    }

    #[tokio::test]
    async fn umbenennen_mit_konflikt() {
        let (s, b) = aufbau().await;
        s.profil_erstellen(&b, "Eins").await.unwrap();
        s.profil_erstellen(&b, "Zwei").await.unwrap();

        let e = s
            .profil_umbenennen(b.discord_id, "Eins", "zwei")
            .await
            .unwrap_err();
        assert!(matches!(e, AvatarError::ProfilExistiert(_)));

        // Gleicher Slug, andere Schreibweise ist erlaubt
        let p = s
            .profil_umbenennen(b.discord_id, "Eins", "EINS")
            .await
            .unwrap();
        assert_eq!(p.name, "EINS");

        let p = s
            .profil_umbenennen(b.discord_id, "eins", "Drei Vier")
            .await
            .unwrap();
        assert_eq!(p.slug, "drei-vier");
    }

    #[tokio::test]
    async fn unbekannter_benutzer() {
        let (s, _) = aufbau().await;
        assert!(s.profile_auflisten(DiscordUserId(99)).await.unwrap().is_empty());
        let e = s.profil_wechseln(DiscordUserId(99), "x").await.unwrap_err();
        assert!(matches!(e, AvatarError::ProfilNichtGefunden(_)));
        let e = s.profil_fuer_url(DiscordUserId(99), None).await.unwrap_err();
        assert!(matches!(e, AvatarError::KeinAktivesProfil));
    }
}
