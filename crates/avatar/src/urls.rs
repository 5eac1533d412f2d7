//! OBS-Browserquellen-URLs

use echosprite_core::{DiscordUserId, VoiceChannelId};

/// Standard-Frontend (GitHub Pages)
pub const STANDARD_FRONTEND_URL: &str = "https://rattusking.github.io/echosprite";

/// Erzeugt die Viewer-URLs relativ zur Frontend-Basis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerUrls {
    basis: String,
}

impl ViewerUrls {
    pub fn neu(frontend_url: impl Into<String>) -> Self {
        let basis: String = frontend_url.into();
        Self {
            basis: basis.trim_end_matches('/').to_string(),
        }
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// Einzelansicht, zeigt das aktive Profil bzw. den Basis-Avatar
    pub fn einzel(&self, user: DiscordUserId) -> String {
        format!("{}/viewer.html?userId={user}&mode=discord", self.basis)
    }

    /// Einzelansicht mit festem Profil
    pub fn profil(&self, user: DiscordUserId, slug: &str) -> String {
        format!("{}&profile={slug}", self.einzel(user))
    }

    /// Gruppenansicht eines Voice-Kanals
    pub fn gruppe(&self, kanal: VoiceChannelId) -> String {
        format!("{}/viewer-group.html?channelId={kanal}", self.basis)
    }
}

impl Default for ViewerUrls {
    fn default() -> Self {
        Self::neu(STANDARD_FRONTEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        let urls = ViewerUrls::neu("https://example.org/app/");
        assert_eq!(
            urls.einzel(DiscordUserId(42)),
            "https://example.org/app/viewer.html?userId=42&mode=discord"
        );
        assert_eq!(
            urls.profil(DiscordUserId(42), "gaming"),
            "https://example.org/app/viewer.html?userId=42&mode=discord&profile=gaming"
        );
        assert_eq!(
            urls.gruppe(VoiceChannelId(7)),
            "https://example.org/app/viewer-group.html?channelId=7"
        );
    }

    #[test]
    fn standard_basis() {
        assert_eq!(ViewerUrls::default().basis(), STANDARD_FRONTEND_URL);
    }
}
