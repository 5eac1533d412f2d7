//! echosprite-chat – Lumimon- und Monster-Chat
//!
//! Zwei kleine, zustandslose Chat-Begleiter fuer die Webseite. Der Zustand
//! (Lumimon-Werte) liegt beim Browser und wird mit jeder Nachricht
//! mitgeschickt.

pub mod error;
pub mod lumimon;
pub mod monster;

pub use error::{ChatError, ChatResult};
pub use lumimon::{LumimonAntwort, LumimonWerte};
pub use monster::{monster_antwort, MONSTER_BEGRUESSUNG};

/// Maximale Nachrichtenlaenge in Zeichen
pub const MAX_NACHRICHT_LAENGE: usize = 2000;

/// Prueft eine Chat-Eingabe und gibt sie getrimmt zurueck
pub(crate) fn eingabe_pruefen(text: &str) -> ChatResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChatError::LeereNachricht);
    }
    let laenge = text.chars().count();
    if laenge > MAX_NACHRICHT_LAENGE {
        return Err(ChatError::ZuLang(laenge));
    }
    Ok(text)
}
