//! Monster – einfacher Schluesselwort-Chat

/// Erste Nachricht beim Oeffnen des Chats
pub const MONSTER_BEGRUESSUNG: &str = "Hello, I'm your AI Monster. Talk to me!";

const UNBEKANNT: &str = "I don't understand that yet...";

/// Antwort des Monsters; leere Eingaben bekommen die Begruessung
pub fn monster_antwort(nachricht: &str) -> &'static str {
    let text = nachricht.trim().to_lowercase();
    if text.is_empty() {
        MONSTER_BEGRUESSUNG
    } else if text.contains("hello") {
        "Hi there!"
    } else if text.contains("how are you") {
        "I’m lurking in the shadows."
    } else if text.contains("monster") {
        "That’s me! What do you want to know?"
    } else {
        UNBEKANNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antworten() {
        assert_eq!(monster_antwort("Hello Monster"), "Hi there!");
        assert_eq!(monster_antwort("how are you?"), "I’m lurking in the shadows.");
        assert_eq!(
            monster_antwort("are you a MONSTER"),
            "That’s me! What do you want to know?"
        );
        assert_eq!(monster_antwort("foo"), UNBEKANNT);
        assert_eq!(monster_antwort(""), MONSTER_BEGRUESSUNG);
    }
}
