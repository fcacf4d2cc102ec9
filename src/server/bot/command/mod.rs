//! Command definitions and the machinery that runs them.
//!
//! Every command implements [`Command`] and describes itself with a
//! [`CommandSpec`]. The same spec drives slash registration, prefix parsing,
//! permission gating and the help/dashboard listings, so a command is written
//! once and reachable both as `/name` and as `<prefix>name`.

pub mod args;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod gate;
pub mod general;
pub mod moderation;
pub mod owner;
pub mod poll;
pub mod registry;
pub mod ticket;
pub mod ticket_config;

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::server::{
    error::{command::CommandError, AppError},
    state::AppState,
};

use self::context::CommandContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandCategory {
    General,
    Moderation,
    Config,
    Tickets,
    Polls,
    Owner,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 6] = [
        Self::General,
        Self::Moderation,
        Self::Config,
        Self::Tickets,
        Self::Polls,
        Self::Owner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Moderation => "Moderation",
            Self::Config => "Config",
            Self::Tickets => "Tickets",
            Self::Polls => "Polls",
            Self::Owner => "Owner",
        }
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A single word, or a quoted phrase.
    String,
    /// Everything left on the line. Only valid as the last argument.
    Text,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    pub autocomplete: bool,
    /// Allowed values; empty means any.
    pub choices: &'static [&'static str],
    /// Inclusive bounds for integer arguments.
    pub range: Option<(i64, i64)>,
}

impl ArgSpec {
    pub const fn required(name: &'static str, description: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: true,
            autocomplete: false,
            choices: &[],
            range: None,
        }
    }

    pub const fn optional(name: &'static str, description: &'static str, kind: ArgKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, kind)
        }
    }

    pub const fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }

    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    pub const fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    fn usage(&self) -> String {
        let label = if self.choices.is_empty() {
            self.name.to_string()
        } else {
            self.choices.join("|")
        };
        if self.required {
            format!("<{}>", label)
        } else {
            format!("[{}]", label)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub args: Vec<ArgSpec>,
}

impl SubcommandSpec {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }
}

/// Static description of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub args: Vec<ArgSpec>,
    /// One level of subcommands. A command has either args or subcommands.
    pub subcommands: Vec<SubcommandSpec>,
    pub owner_only: bool,
    pub guild_only: bool,
    /// Permissions the caller must hold. Empty means none.
    pub permissions: Permissions,
}

impl CommandSpec {
    pub fn new(name: &'static str, description: &'static str, category: CommandCategory) -> Self {
        Self {
            name,
            description,
            category,
            args: Vec::new(),
            subcommands: Vec::new(),
            owner_only: false,
            guild_only: false,
            permissions: Permissions::empty(),
        }
    }

    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn subcommand(mut self, subcommand: SubcommandSpec) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self.guild_only = true;
        self
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&SubcommandSpec> {
        self.subcommands
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn subcommand_names(&self) -> Vec<String> {
        self.subcommands.iter().map(|s| s.name.to_string()).collect()
    }

    /// Usage line without a prefix, e.g. `ban <user> [reason]` or `config <show|prefix|...>`.
    pub fn usage(&self) -> String {
        if !self.subcommands.is_empty() {
            return format!("{} <{}>", self.name, self.subcommand_names().join("|"));
        }
        let mut parts = vec![self.name.to_string()];
        parts.extend(self.args.iter().map(ArgSpec::usage));
        parts.join(" ")
    }

    /// Usage lines for every subcommand.
    pub fn subcommand_usages(&self) -> Vec<String> {
        self.subcommands
            .iter()
            .map(|sub| {
                let mut parts = vec![self.name.to_string(), sub.name.to_string()];
                parts.extend(sub.args.iter().map(ArgSpec::usage));
                parts.join(" ")
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(u64),
    Channel(u64),
    Role(u64),
}

/// Parsed argument values by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    values: HashMap<String, ArgValue>,
}

impl CommandArgs {
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ArgValue::User(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn channel(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ArgValue::Channel(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn role(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ArgValue::Role(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn require_string(&self, name: &str) -> Result<&str, CommandError> {
        self.string(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    pub fn require_integer(&self, name: &str) -> Result<i64, CommandError> {
        self.integer(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    pub fn require_boolean(&self, name: &str) -> Result<bool, CommandError> {
        self.boolean(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    pub fn require_user(&self, name: &str) -> Result<u64, CommandError> {
        self.user(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    pub fn require_channel(&self, name: &str) -> Result<u64, CommandError> {
        self.channel(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    pub fn require_role(&self, name: &str) -> Result<u64, CommandError> {
        self.role(name)
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }
}

/// A resolved invocation: the chosen subcommand, if any, and its arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandInput {
    pub subcommand: Option<String>,
    pub args: CommandArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

/// Discord accepts at most this many autocomplete suggestions.
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

#[async_trait]
pub trait Command: Send + Sync {
    fn spec(&self) -> CommandSpec;

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError>;

    /// Suggestions for the focused `option` given what the user typed so far.
    async fn autocomplete(
        &self,
        _state: &AppState,
        _guild_id: Option<u64>,
        _option: &str,
        _partial: &str,
    ) -> Result<Vec<AutocompleteChoice>, AppError> {
        Ok(Vec::new())
    }
}

/// Every command the bot ships with.
pub fn builtin_commands() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(general::Ping),
        Arc::new(general::Help),
        Arc::new(general::About),
        Arc::new(general::ServerInfo),
        Arc::new(general::UserInfo),
        Arc::new(moderation::Ban),
        Arc::new(moderation::Kick),
        Arc::new(moderation::Timeout),
        Arc::new(moderation::Untimeout),
        Arc::new(moderation::Warn),
        Arc::new(moderation::Warnings),
        Arc::new(moderation::ClearWarnings),
        Arc::new(moderation::Purge),
        Arc::new(config::ConfigCommand),
        Arc::new(ticket::TicketCommand),
        Arc::new(ticket_config::TicketConfigCommand),
        Arc::new(poll::PollCommand),
        Arc::new(owner::SetStatus),
        Arc::new(owner::Shutdown),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect usage lines to mark required and optional arguments
    #[test]
    fn usage_marks_optional_arguments() {
        let spec = CommandSpec::new("ban", "Ban a member", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member", ArgKind::User))
            .arg(ArgSpec::optional("reason", "Why", ArgKind::Text));

        assert_eq!(spec.usage(), "ban <user> [reason]");
    }

    /// Expect subcommand usage to list each subcommand with its arguments
    #[test]
    fn usage_lists_subcommands() {
        let spec = CommandSpec::new("poll", "Polls", CommandCategory::Polls)
            .subcommand(
                SubcommandSpec::new("end", "End a poll")
                    .arg(ArgSpec::required("message", "Poll message id", ArgKind::String)),
            )
            .subcommand(SubcommandSpec::new("list", "List polls"));

        assert_eq!(spec.usage(), "poll <end|list>");
        assert_eq!(
            spec.subcommand_usages(),
            vec!["poll end <message>".to_string(), "poll list".to_string()]
        );
    }

    /// Expect typed getters to return nothing for a value of another kind
    #[test]
    fn typed_getters_check_kind() {
        let mut args = CommandArgs::default();
        args.insert("amount", ArgValue::Integer(5));

        assert_eq!(args.integer("amount"), Some(5));
        assert_eq!(args.string("amount"), None);
        assert_eq!(
            args.require_user("user"),
            Err(CommandError::MissingArgument("user".to_string()))
        );
    }
}
