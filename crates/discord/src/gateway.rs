//! serenity-EventHandler: Befehlsregistrierung, Voice-States, Interaktionen

use async_trait::async_trait;
use echosprite_core::{DiscordUserId, GuildId, VoiceChannelId};
use echosprite_voice::VoiceUpdate;
use serenity::all::{
    Client, Command, CommandInteraction, Context, EditInteractionResponse, EventHandler,
    GatewayIntents, Guild, Interaction, Member, Ready, VoiceState,
};

use crate::antwort::Antwort;
use crate::befehl::{optionen_lesen, BotBefehl};
use crate::definitionen::befehle_definieren;
use crate::dispatcher::ausfuehren;
use crate::error::BotResult;
use crate::kontext::BefehlsKontext;
use crate::{BotConfig, BotState};

/// Baut ein Tracker-Update aus einem Discord-Voice-State
pub(crate) fn voice_update(
    vs: &VoiceState,
    member: Option<&Member>,
    ersatz_name: Option<String>,
) -> VoiceUpdate {
    let username = member
        .map(|m| m.display_name().to_string())
        .or(ersatz_name)
        .unwrap_or_else(|| "Unknown".to_string());
    VoiceUpdate {
        user_id: DiscordUserId(vs.user_id.get()),
        guild_id: vs.guild_id.map(|g| GuildId(g.get())),
        channel_id: vs.channel_id.map(|c| VoiceChannelId(c.get())),
        username,
        avatar_hash: member.and_then(|m| m.user.avatar.map(|h| h.to_string())),
        self_mute: vs.self_mute,
        self_deaf: vs.self_deaf,
        server_mute: vs.mute,
        server_deaf: vs.deaf,
        streaming: vs.self_stream.unwrap_or(false),
    }
}

pub struct Handler {
    state: BotState,
    dev_guild: Option<GuildId>,
}

impl Handler {
    pub fn neu(state: BotState, dev_guild: Option<GuildId>) -> Self {
        Self {
            state,
            dev_guild: dev_guild.filter(|g| g.get() != 0),
        }
    }

    fn voice_metriken_aktualisieren(&self, ereignisse: usize) {
        let m = &self.state.metriken;
        m.voice_events_total.inc_by(ereignisse as u64);
        m.voice_members.set(self.state.tracker.anzahl() as i64);
    }

    async fn befehle_registrieren(&self, ctx: &Context) {
        let befehle = befehle_definieren();
        let ergebnis = match self.dev_guild {
            Some(g) => serenity::all::GuildId::new(g.get())
                .set_commands(&ctx.http, befehle)
                .await
                .map(|c| c.len()),
            None => Command::set_global_commands(&ctx.http, befehle)
                .await
                .map(|c| c.len()),
        };
        match ergebnis {
            Ok(anzahl) => tracing::info!(
                anzahl,
                dev_guild = ?self.dev_guild,
                "Slash-Commands registriert"
            ),
            Err(e) => tracing::error!(fehler = %e, "Slash-Commands konnten nicht registriert werden"),
        }
    }

    async fn befehl_bearbeiten(&self, ctx: &Context, cmd: &CommandInteraction) -> BotResult<()> {
        cmd.defer_ephemeral(&ctx.http).await?;

        let kontext = BefehlsKontext::aus_interaktion(ctx, cmd);
        let (unterbefehl, optionen) = optionen_lesen(cmd);
        let name = cmd.data.name.as_str();
        tracing::debug!(befehl = name, unterbefehl = ?unterbefehl, discord_id = %kontext.user_id, "Slash-Command empfangen");

        let antwort = match BotBefehl::parsen(name, unterbefehl.as_deref(), &optionen) {
            Ok(befehl) => ausfuehren(&self.state, &kontext, &befehl).await,
            Err(e) => {
                tracing::warn!(befehl = name, fehler = %e, "Slash-Command nicht verstanden");
                Antwort::befehl_fehlgeschlagen(e)
            }
        };

        self.state.avatar.befehl_protokollieren(kontext.user_id, name).await;
        self.state.metriken.befehl_zaehlen(name);

        cmd.edit_response(
            &ctx.http,
            EditInteractionResponse::new().embed(antwort.als_embed()),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(bot = %ready.user.name, guilds = ready.guilds.len(), "Discord-Bot verbunden");
        self.befehle_registrieren(&ctx).await;
        self.state.health.bot_status_setzen(true);
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        let updates: Vec<VoiceUpdate> = guild
            .voice_states
            .values()
            .map(|vs| {
                let mut vs = vs.clone();
                // Im Snapshot fehlt die Guild-ID an den einzelnen States
                vs.guild_id.get_or_insert(guild.id);
                voice_update(&vs, guild.members.get(&vs.user_id), None)
            })
            .collect();

        let anzahl = self
            .state
            .tracker
            .gilde_initialisieren(GuildId(guild.id.get()), updates);
        tracing::debug!(guild = %guild.name, mitglieder = anzahl, "Guild verfuegbar");
        self.voice_metriken_aktualisieren(0);
    }

    async fn voice_state_update(&self, ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
        let ersatz_name = ctx.cache.user(new.user_id).map(|u| u.name.clone());
        let update = voice_update(&new, new.member.as_ref(), ersatz_name);
        let ereignisse = self.state.tracker.aktualisieren(update);
        self.voice_metriken_aktualisieren(ereignisse.len());
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(cmd) = interaction else {
            return;
        };
        if let Err(e) = self.befehl_bearbeiten(&ctx, &cmd).await {
            tracing::error!(befehl = %cmd.data.name, fehler = %e, "Antwort auf Slash-Command fehlgeschlagen");
        }
    }
}

/// Verbindet den Bot mit dem Gateway und laeuft bis zum Verbindungsende
pub async fn bot_starten(config: BotConfig, state: BotState) -> BotResult<()> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;
    let health = state.health.clone();
    let handler = Handler::neu(state, config.dev_guild_id);

    let mut client = Client::builder(&config.token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Discord-Bot startet");
    let ergebnis = client.start().await;
    health.bot_status_setzen(false);
    ergebnis?;
    Ok(())
}
