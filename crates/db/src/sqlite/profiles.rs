//! SQLite-Implementierung des ProfilRepository

use echosprite_core::{AvatarBilder, AvatarEinstellungen};
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NeuesProfil, ProfilRecord};
use crate::repository::{DbResult, ProfilRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::{jetzt, parse_bilder, parse_einstellungen, parse_uuid, parse_zeit};

const SPALTEN: &str = "id, user_id, profile_name, profile_slug, is_active, idle_image,
                       talking_image, muted_image, deafened_image, settings_json,
                       created_at, updated_at";

impl ProfilRepository for SqliteDb {
    async fn create_profile(&self, daten: NeuesProfil<'_>) -> DbResult<ProfilRecord> {
        let id = Uuid::new_v4();
        let (now, now_str) = jetzt();

        sqlx::query(
            "INSERT INTO profiles
               (id, user_id, profile_name, profile_slug, is_active, settings_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, '{}', ?, ?)",
        )
        .bind(id.to_string())
        .bind(daten.user_id.to_string())
        .bind(daten.name)
        .bind(daten.slug)
        .bind(daten.ist_aktiv as i64)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, || format!("Profil '{}' existiert bereits", daten.slug)))?;

        Ok(ProfilRecord {
            id,
            user_id: daten.user_id,
            name: daten.name.to_string(),
            slug: daten.slug.to_string(),
            ist_aktiv: daten.ist_aktiv,
            bilder: AvatarBilder::default(),
            einstellungen: AvatarEinstellungen::default(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_user_and_slug(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> DbResult<Option<ProfilRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM profiles WHERE user_id = ? AND profile_slug = ?");
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_profil(&r)).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> DbResult<Vec<ProfilRecord>> {
        let sql = format!(
            "SELECT {SPALTEN} FROM profiles WHERE user_id = ? ORDER BY created_at ASC, rowid ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_profil).collect()
    }

    async fn count_profiles(&self, user_id: Uuid) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS anzahl FROM profiles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("anzahl")?)
    }

    async fn update_profile_images(
        &self,
        id: Uuid,
        bilder: &AvatarBilder,
        einstellungen: &AvatarEinstellungen,
    ) -> DbResult<ProfilRecord> {
        let (_, now_str) = jetzt();
        let settings = serde_json::to_string(einstellungen)?;

        let affected = sqlx::query(
            "UPDATE profiles
             SET idle_image = ?, talking_image = ?, muted_image = ?, deafened_image = ?,
                 settings_json = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&bilder.idle)
        .bind(&bilder.talking)
        .bind(&bilder.muted)
        .bind(&bilder.deafened)
        .bind(&settings)
        .bind(&now_str)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Profil {id}")));
        }

        self.profil_laden(id)
            .await?
            .ok_or_else(|| DbError::intern("Profil nach Update nicht gefunden"))
    }

    async fn set_active(&self, id: Uuid, user_id: Uuid) -> DbResult<()> {
        let (_, now_str) = jetzt();
        let user_str = user_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE profiles SET is_active = 0 WHERE user_id = ?")
            .bind(&user_str)
            .execute(&mut *tx)
            .await?;

        let affected = sqlx::query(
            "UPDATE profiles SET is_active = 1, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&now_str)
        .bind(id.to_string())
        .bind(&user_str)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            // Rollback durch Drop der Transaktion
            return Err(DbError::nicht_gefunden(format!("Profil {id}")));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_active(&self, user_id: Uuid) -> DbResult<Option<ProfilRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM profiles WHERE user_id = ? AND is_active = 1");
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_profil(&r)).transpose()
    }

    async fn delete_profile(&self, id: Uuid, user_id: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM profiles WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn rename_profile(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: &str,
        slug: &str,
    ) -> DbResult<ProfilRecord> {
        let (_, now_str) = jetzt();

        let affected = sqlx::query(
            "UPDATE profiles SET profile_name = ?, profile_slug = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(name)
        .bind(slug)
        .bind(&now_str)
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::aus_sqlx(e, || format!("Profil '{slug}' existiert bereits")))?
        .rows_affected();

        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Profil {id}")));
        }

        self.profil_laden(id)
            .await?
            .ok_or_else(|| DbError::intern("Profil nach Umbenennung nicht gefunden"))
    }
}

impl SqliteDb {
    async fn profil_laden(&self, id: Uuid) -> DbResult<Option<ProfilRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM profiles WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_profil(&r)).transpose()
    }
}

fn row_to_profil(row: &sqlx::sqlite::SqliteRow) -> DbResult<ProfilRecord> {
    let is_active: i64 = row.try_get("is_active")?;

    Ok(ProfilRecord {
        id: parse_uuid(row, "id")?,
        user_id: parse_uuid(row, "user_id")?,
        name: row.try_get("profile_name")?,
        slug: row.try_get("profile_slug")?,
        ist_aktiv: is_active != 0,
        bilder: parse_bilder(row)?,
        einstellungen: parse_einstellungen(row)?,
        created_at: parse_zeit(row, "created_at")?,
        updated_at: parse_zeit(row, "updated_at")?,
    })
}
