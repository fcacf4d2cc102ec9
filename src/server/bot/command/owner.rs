use async_trait::async_trait;

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, Command, CommandCategory, CommandInput, CommandSpec,
    },
    discord::embed::{success_embed, warning_embed},
    error::AppError,
    scheduler::status_rotation,
};

pub struct SetStatus;

#[async_trait]
impl Command for SetStatus {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("setstatus", "Pin the bot's status text", CommandCategory::Owner)
            .arg(ArgSpec::optional("text", "Status text; omit to resume rotation", ArgKind::Text))
            .owner_only()
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let text = input.args.string("text").map(str::to_string);
        ctx.state.presence.pin(text).await?;

        status_rotation::refresh(ctx.state).await;

        match ctx.state.presence.pinned().await {
            Some(text) => {
                ctx.reply(Reply::embed_only(
                    success_embed().description(format!("Status pinned to `{}`.", text)),
                ))
                .await
            }
            None => {
                ctx.reply(Reply::embed_only(
                    success_embed().description("Status unpinned, rotation resumes."),
                ))
                .await
            }
        }
    }
}

pub struct Shutdown;

#[async_trait]
impl Command for Shutdown {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("shutdown", "Stop the bot", CommandCategory::Owner).owner_only()
    }

    async fn run(&self, ctx: &CommandContext<'_>, _input: CommandInput) -> Result<(), AppError> {
        tracing::warn!(user_id = ctx.caller.user_id, "Shutdown requested by owner");
        ctx.reply(Reply::embed_only(warning_embed().description("Shutting down.")))
            .await?;

        ctx.state.shutdown.notify_waiters();
        Ok(())
    }
}
