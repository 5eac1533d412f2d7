//! echosprite-auth – Sessions und Discord-Login
//!
//! Dieses Crate implementiert:
//! - Session-Management (in-memory mit TTL, Token im Cookie)
//! - Discord-OAuth2 (Autorisierungs-URL, State-Pruefung, Code-Austausch)

pub mod error;
pub mod oauth;
pub mod session;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use oauth::{DiscordOAuth, DiscordProfil, OAuthConfig};
pub use session::{Session, SessionStore, SESSION_COOKIE};
