//! Lumimon – ein Begleiter, der sich merkt wie man ihn behandelt
//!
//! Schluesselwoerter werden in fester Reihenfolge geprueft, die erste
//! passende Regel gewinnt. Die Werte bleiben immer im Bereich `[0, 1]` und
//! werden auf drei Nachkommastellen gerundet.

use serde::{Deserialize, Serialize};

use crate::error::ChatResult;

/// Startwert aller Lumimon-Werte
pub const STARTWERT: f64 = 0.1;

/// Die vier Werte des Lumimon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumimonWerte {
    pub trust: f64,
    pub curiosity: f64,
    pub mood: f64,
    pub energy: f64,
}

impl Default for LumimonWerte {
    fn default() -> Self {
        Self {
            trust: STARTWERT,
            curiosity: STARTWERT,
            mood: STARTWERT,
            energy: STARTWERT,
        }
    }
}

fn begrenzen(wert: f64) -> f64 {
    if !wert.is_finite() {
        return 0.0;
    }
    ((wert * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
}

impl LumimonWerte {
    /// Rundet und begrenzt alle Werte
    pub fn normalisiert(self) -> Self {
        Self {
            trust: begrenzen(self.trust),
            curiosity: begrenzen(self.curiosity),
            mood: begrenzen(self.mood),
            energy: begrenzen(self.energy),
        }
    }
}

/// Antwort und neue Werte
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LumimonAntwort {
    pub reply: String,
    pub stats: LumimonWerte,
}

/// Verarbeitet eine Nachricht an Lumimon
pub fn antworten(nachricht: &str, werte: LumimonWerte) -> ChatResult<LumimonAntwort> {
    let text = crate::eingabe_pruefen(nachricht)?.to_lowercase();
    let mut neu = werte.normalisiert();

    let reply = if text.contains("hello") || text.contains("hi") {
        neu.trust += 0.1;
        "Lumimon chirps: 'Hi! I’m glad you’re here.'"
    } else if text.contains("i love you") {
        neu.trust += 0.2;
        neu.mood += 0.1;
        "Lumimon sparkles: 'That means a lot... I feel warmer now.'"
    } else if text.contains("train") || text.contains("learn") {
        neu.curiosity += 0.2;
        "Lumimon’s eyes light up: 'Yes! Teach me!'"
    } else if text.contains("bad") || text.contains("hate") {
        neu.trust -= 0.2;
        neu.mood -= 0.2;
        "Lumimon dims slightly: 'That... hurt. Did I do something wrong?'"
    } else {
        "Lumimon tilts its head: 'Hmm... I'm not sure what that means yet.'"
    };

    let stats = neu.normalisiert();
    tracing::debug!(trust = stats.trust, mood = stats.mood, "Lumimon geantwortet");
    Ok(LumimonAntwort {
        reply: reply.to_string(),
        stats,
    })
}
