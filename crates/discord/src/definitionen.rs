//! Definition der Slash-Commands fuer die Registrierung bei Discord

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

fn unterbefehl(name: &str, beschreibung: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, beschreibung)
}

fn bild(name: &str, beschreibung: &str, pflicht: bool) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Attachment, name, beschreibung).required(pflicht)
}

fn text(name: &str, beschreibung: &str, pflicht: bool) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, name, beschreibung)
        .required(pflicht)
        .max_length(100)
}

fn schalter(name: &str, befehl_beschreibung: &str, option_beschreibung: &str) -> CreateCommandOption {
    unterbefehl(name, befehl_beschreibung).add_sub_option(
        CreateCommandOption::new(CommandOptionType::Boolean, "enabled", option_beschreibung)
            .required(true),
    )
}

/// Bilder eines Uploads (idle/talking Pflicht)
fn mit_bildern(befehl: CreateCommandOption) -> CreateCommandOption {
    befehl
        .add_sub_option(bild("idle", "Idle state image (required)", true))
        .add_sub_option(bild("talking", "Talking state image (required)", true))
        .add_sub_option(bild("muted", "Muted state image (optional)", false))
        .add_sub_option(bild("deafened", "Deafened state image (optional)", false))
}

fn avatar() -> CreateCommand {
    CreateCommand::new("avatar")
        .description("Manage your EchoSprite avatar")
        .add_option(mit_bildern(unterbefehl("upload", "Upload your avatar images")))
        .add_option(unterbefehl("view", "View your current avatar configuration"))
        .add_option(unterbefehl("url", "Get your OBS browser source URLs"))
        .add_option(unterbefehl("delete", "Delete your avatar configuration"))
}

fn channel() -> CreateCommand {
    CreateCommand::new("channel")
        .description("Manage voice channel group viewing")
        .add_option(unterbefehl(
            "url",
            "Get group viewer URL for your current voice channel",
        ))
        .add_option(unterbefehl(
            "preview",
            "Preview all avatars in your current voice channel",
        ))
        .add_option(unterbefehl(
            "members",
            "List all members in your current voice channel",
        ))
}

fn settings() -> CreateCommand {
    CreateCommand::new("settings")
        .description("Configure your avatar settings")
        .add_option(unterbefehl("view", "View your current settings"))
        .add_option(schalter("bounce", "Toggle bounce animation", "Enable or disable bounce"))
        .add_option(schalter("fade", "Toggle fade effect", "Enable or disable fade"))
        .add_option(
            unterbefehl("spacing", "Set avatar spacing in group view").add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "value", "Spacing value (0-100)")
                    .required(true)
                    .min_int_value(0)
                    .max_int_value(100),
            ),
        )
        .add_option(schalter("show-names", "Toggle username display", "Show or hide usernames"))
        .add_option(schalter(
            "include-self",
            "Include yourself in group view",
            "Include or exclude yourself",
        ))
        .add_option(schalter("dim-inactive", "Dim inactive avatars", "Enable or disable dimming"))
}

fn profile() -> CreateCommand {
    CreateCommand::new("profile")
        .description("Manage multiple avatar profiles")
        .add_option(
            unterbefehl("create", "Create a new avatar profile")
                .add_sub_option(text("name", "Profile name", true)),
        )
        .add_option(mit_bildern(
            unterbefehl("upload", "Upload images to a profile")
                .add_sub_option(text("profile", "Profile name", true)),
        ))
        .add_option(unterbefehl("list", "List all your profiles"))
        .add_option(
            unterbefehl("switch", "Switch your active profile")
                .add_sub_option(text("profile", "Profile name", true)),
        )
        .add_option(
            unterbefehl("url", "Get the viewer URL of a profile").add_sub_option(text(
                "profile",
                "Profile name (default: active profile)",
                false,
            )),
        )
        .add_option(
            unterbefehl("delete", "Delete a profile")
                .add_sub_option(text("profile", "Profile name", true)),
        )
        .add_option(
            unterbefehl("rename", "Rename a profile")
                .add_sub_option(text("old", "Current profile name", true))
                .add_sub_option(text("new", "New profile name", true)),
        )
}

/// Alle Slash-Commands des Bots
pub fn befehle_definieren() -> Vec<CreateCommand> {
    vec![
        avatar(),
        channel(),
        settings(),
        profile(),
        CreateCommand::new("help").description("Get help with EchoSprite commands"),
        CreateCommand::new("status").description("Check EchoSprite bot and service status"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn als_json() -> Vec<Value> {
        befehle_definieren()
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .collect()
    }

    fn unter<'a>(befehl: &'a Value, name: &str) -> &'a Value {
        befehl["options"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["name"] == name)
            .unwrap()
    }

    #[test]
    fn alle_befehle_vorhanden() {
        let namen: Vec<String> = als_json()
            .iter()
            .map(|b| b["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(namen, ["avatar", "channel", "settings", "profile", "help", "status"]);
    }

    #[test]
    fn upload_optionen() {
        let json = als_json();
        let upload = unter(&json[0], "upload");
        let optionen = upload["options"].as_array().unwrap();
        assert_eq!(optionen.len(), 4);
        assert_eq!(optionen[0]["name"], "idle");
        assert_eq!(optionen[0]["required"], true);
        assert_ne!(optionen[2]["required"], true);
    }

    #[test]
    fn spacing_grenzen() {
        let json = als_json();
        let spacing = unter(&json[2], "spacing");
        let wert = &spacing["options"][0];
        assert_eq!(wert["min_value"], 0);
        assert_eq!(wert["max_value"], 100);
    }

    #[test]
    fn profil_unterbefehle() {
        let json = als_json();
        let namen: Vec<&str> = json[3]["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            namen,
            ["create", "upload", "list", "switch", "url", "delete", "rename"]
        );
        let upload = unter(&json[3], "upload");
        assert_eq!(upload["options"].as_array().unwrap().len(), 5);
    }
}
