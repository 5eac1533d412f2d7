//! URL-sichere Profilnamen

/// Maximale Slug-Laenge
pub const MAX_SLUG_LAENGE: usize = 100;

/// Wandelt einen Profilnamen in einen URL-sicheren Slug um
///
/// Kleinbuchstaben, jede Folge anderer Zeichen als `[a-z0-9]` wird zu einem
/// einzelnen `-`, Bindestriche am Rand entfallen.
pub fn name_zu_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut trenner_offen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if trenner_offen && !slug.is_empty() {
                slug.push('-');
            }
            trenner_offen = false;
            slug.push(c);
        } else {
            trenner_offen = true;
        }
    }

    slug.truncate(MAX_SLUG_LAENGE);
    // Nach dem Kuerzen kann ein Bindestrich am Ende stehen
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
