//! `poll`: quick polls with reaction or button voting.

use async_trait::async_trait;

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, Command, CommandCategory, CommandInput, CommandSpec, SubcommandSpec,
    },
    discord::embed::success_embed,
    error::{command::CommandError, AppError},
    model::poll::{CreatePollParam, MAX_DURATION_MINUTES},
    util::parse::parse_snowflake,
};

pub struct PollCommand;

#[async_trait]
impl Command for PollCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("poll", "Create and end polls", CommandCategory::Polls)
            .subcommand(
                SubcommandSpec::new("create", "Start a poll")
                    .arg(ArgSpec::required("question", "What to ask", ArgKind::String))
                    .arg(ArgSpec::required(
                        "options",
                        "2 to 6 options separated by |",
                        ArgKind::String,
                    ))
                    .arg(
                        ArgSpec::optional("duration", "End automatically after N minutes", ArgKind::Integer)
                            .range(1, MAX_DURATION_MINUTES),
                    )
                    .arg(ArgSpec::optional(
                        "buttons",
                        "Vote with buttons instead of reactions",
                        ArgKind::Boolean,
                    )),
            )
            .subcommand(
                SubcommandSpec::new("end", "End a poll and show the results").arg(
                    ArgSpec::required("message", "Poll message id or link", ArgKind::String),
                ),
            )
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let args = &input.args;
        let service = ctx.state.poll_service();

        match input.subcommand.as_deref().unwrap_or_default() {
            "create" => {
                let param = CreatePollParam::parse(
                    args.require_string("question")?,
                    args.require_string("options")?,
                    args.integer("duration"),
                    args.boolean("buttons").unwrap_or(false),
                )?;

                let poll = service.create(ctx.channel_id, ctx.poll_actor(), param).await?;

                let mut text = format!("Poll created (id `{}`).", poll.id);
                if let Some(ends_at) = poll.ends_at {
                    text.push_str(&format!(" It ends <t:{}:R>.", ends_at.timestamp()));
                }
                ctx.reply(Reply::embed_only(success_embed().description(text)).ephemeral())
                    .await
            }
            "end" => {
                let raw = args.require_string("message")?;
                let poll_id = parse_message_ref(raw).ok_or_else(|| CommandError::InvalidArgument {
                    name: "message".to_string(),
                    reason: format!("`{}` is not a message id or link", raw),
                })?;

                let results = service.end(poll_id, ctx.poll_actor()).await?;
                ctx.reply(
                    Reply::text(format!(
                        "Poll ended with {} vote(s).",
                        results.total
                    ))
                    .ephemeral(),
                )
                .await
            }
            other => Err(CommandError::UnknownSubcommand {
                given: other.to_string(),
                available: self.spec().subcommand_names(),
            }
            .into()),
        }
    }
}

/// Accepts a raw message id or a `https://discord.com/channels/<g>/<c>/<m>` link.
fn parse_message_ref(input: &str) -> Option<u64> {
    let input = input.trim();
    if let Ok(link) = url::Url::parse(input) {
        return link
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(parse_snowflake);
    }
    parse_snowflake(input)
}
