//! Routes slash, prefix and autocomplete events to commands.

use serenity::all::{
    CommandInteraction, Context, CreateAutocompleteResponse, CreateInteractionResponse, GuildId,
    Member, Message, Permissions, User,
};

use crate::server::{
    bot::command::{
        args::{parse_prefix_input, parse_slash_input, split_command},
        context::{Caller, CommandContext, CommandSource, Reply},
        gate::{self, GateScope},
        registry::RegisteredCommand,
        CommandCategory, CommandInput, MAX_AUTOCOMPLETE_CHOICES,
    },
    discord::embed::command_error_embed,
    error::{command::CommandError, AppError},
    model::guild_settings::GuildSettings,
    service::guild_settings::GuildSettingsService,
    state::AppState,
};

/// Handles an application command interaction.
pub async fn handle_slash(state: &AppState, ctx: &Context, interaction: &CommandInteraction) {
    let guild_id = interaction.guild_id.map(|id| id.get());
    let channel_id = interaction.channel_id.get();
    let caller = interaction_caller(state, &interaction.user, interaction.member.as_deref());

    let settings = match load_settings(state, guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(guild_id, "Failed to load guild settings: {}", e);
            None
        }
    };
    let prefix = settings
        .as_ref()
        .map(|s| s.prefix.clone())
        .unwrap_or_else(|| state.config.default_prefix.clone());

    let command_ctx = CommandContext::new(
        state,
        ctx,
        CommandSource::Slash(interaction),
        guild_id,
        channel_id,
        caller,
        prefix,
    );

    let Some(registered) = state.registry.get(&interaction.data.name) else {
        let err = CommandError::UnknownCommand(interaction.data.name.clone()).into();
        report_error(&command_ctx, &interaction.data.name, err).await;
        return;
    };

    let input = parse_slash_input(&registered.spec, &interaction.data.options);
    execute(&command_ctx, registered, settings.as_ref(), input).await;
}

/// Handles a message that may be a prefix command.
///
/// The caller has already skipped bots and disabled channels.
pub async fn handle_prefix(
    state: &AppState,
    ctx: &Context,
    message: &Message,
    settings: Option<&GuildSettings>,
) {
    let prefix = settings
        .map(|s| s.prefix.clone())
        .unwrap_or_else(|| state.config.default_prefix.clone());
    let bot_id = ctx.cache.current_user().id.get();

    let Some((name, rest)) = split_command(&message.content, &prefix, bot_id) else {
        return;
    };
    let Some(registered) = state.registry.get(&name) else {
        tracing::trace!(name, "Ignoring unknown prefix command");
        return;
    };

    let guild_id = message.guild_id.map(|id| id.get());
    let caller = prefix_caller(state, ctx, message).await;

    let command_ctx = CommandContext::new(
        state,
        ctx,
        CommandSource::Prefix(message),
        guild_id,
        message.channel_id.get(),
        caller,
        prefix,
    );

    let input = parse_prefix_input(&registered.spec, rest);
    execute(&command_ctx, registered, settings, input).await;
}

/// Answers an autocomplete request with at most 25 suggestions.
pub async fn handle_autocomplete(state: &AppState, ctx: &Context, interaction: &CommandInteraction) {
    let Some(registered) = state.registry.get(&interaction.data.name) else {
        return;
    };
    let Some(focused) = interaction.data.autocomplete() else {
        return;
    };

    let choices = match registered
        .command
        .autocomplete(
            state,
            interaction.guild_id.map(|id| id.get()),
            focused.name,
            focused.value,
        )
        .await
    {
        Ok(choices) => choices,
        Err(e) => {
            tracing::warn!(command = registered.spec.name, "Autocomplete failed: {}", e);
            Vec::new()
        }
    };

    let mut response = CreateAutocompleteResponse::new();
    for choice in choices.into_iter().take(MAX_AUTOCOMPLETE_CHOICES) {
        response = response.add_string_choice(choice.name, choice.value);
    }

    if let Err(e) = interaction
        .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
        .await
    {
        tracing::warn!("Failed to answer autocomplete: {}", e);
    }
}

async fn execute(
    ctx: &CommandContext<'_>,
    registered: &RegisteredCommand,
    settings: Option<&GuildSettings>,
    input: Result<CommandInput, CommandError>,
) {
    let spec = &registered.spec;

    let result: Result<(), AppError> = async {
        if let Some(settings) = settings {
            if spec.category != CommandCategory::Config
                && settings.is_channel_disabled(ctx.channel_id)
            {
                return Err(CommandError::ChannelDisabled.into());
            }
        }

        let scope = GateScope {
            in_guild: ctx.guild_id.is_some(),
            mod_role_ids: settings.map(|s| s.mod_role_ids.as_slice()).unwrap_or(&[]),
        };
        gate::check(spec, &ctx.caller, scope)?;
        let input = input?;

        ctx.state.stats.record_command();
        tracing::debug!(
            command = spec.name,
            subcommand = input.subcommand.as_deref(),
            user_id = ctx.caller.user_id,
            guild_id = ctx.guild_id,
            "Running command"
        );

        registered.command.run(ctx, input).await
    }
    .await;

    if let Err(err) = result {
        report_error(ctx, spec.name, err).await;
    }
}

/// Logs a failed command and answers with the error embed.
async fn report_error(ctx: &CommandContext<'_>, command: &str, err: AppError) {
    match &err {
        AppError::CommandErr(e) => {
            tracing::info!(command, user_id = ctx.caller.user_id, "Command rejected: {}", e)
        }
        e => tracing::error!(
            command,
            user_id = ctx.caller.user_id,
            guild_id = ctx.guild_id,
            "Command failed: {}",
            e
        ),
    }

    let reply = Reply::embed_only(command_error_embed(&err.user_message())).ephemeral();
    if let Err(e) = ctx.reply(reply).await {
        tracing::warn!(command, "Failed to send command error: {}", e);
    }
}

async fn load_settings(
    state: &AppState,
    guild_id: Option<u64>,
) -> Result<Option<GuildSettings>, AppError> {
    let Some(guild_id) = guild_id else {
        return Ok(None);
    };
    let service = GuildSettingsService::new(&state.db, &state.config.default_prefix);

    Ok(Some(service.get_or_create(guild_id).await?))
}

/// Builds the caller of any interaction from its user and guild member.
pub fn interaction_caller(state: &AppState, user: &User, member: Option<&Member>) -> Caller {
    Caller {
        user_id: user.id.get(),
        name: member
            .map(|m| m.display_name().to_string())
            .unwrap_or_else(|| user.name.clone()),
        role_ids: member
            .map(|m| m.roles.iter().map(|r| r.get()).collect())
            .unwrap_or_default(),
        permissions: member
            .and_then(|m| m.permissions)
            .unwrap_or_else(Permissions::empty),
        is_owner: state.config.owner_id == Some(user.id.get()),
    }
}

async fn prefix_caller(state: &AppState, ctx: &Context, message: &Message) -> Caller {
    let user_id = message.author.id.get();
    let mut caller = Caller {
        user_id,
        name: message.author.name.clone(),
        role_ids: Vec::new(),
        permissions: Permissions::empty(),
        is_owner: state.config.owner_id == Some(user_id),
    };

    let Some(guild_id) = message.guild_id else {
        return caller;
    };

    match guild_id.member(ctx, message.author.id).await {
        Ok(member) => {
            caller.name = member.display_name().to_string();
            caller.role_ids = member.roles.iter().map(|r| r.get()).collect();
            caller.permissions = guild_permissions(ctx, guild_id, &member);
        }
        Err(e) => tracing::warn!(user_id, "Failed to resolve command author: {}", e),
    }

    caller
}

fn guild_permissions(ctx: &Context, guild_id: GuildId, member: &Member) -> Permissions {
    ctx.cache
        .guild(guild_id)
        .map(|guild| guild.member_permissions(member))
        .unwrap_or_else(Permissions::empty)
}
