use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use serenity::all::{
    Command as SlashCommand, CommandOptionType, CreateCommand, CreateCommandOption, GuildId, Http,
};
use thiserror::Error;

use crate::{
    model::command::CommandDto,
    server::{
        bot::command::{ArgKind, ArgSpec, Command, CommandCategory, CommandSpec},
        error::AppError,
    },
};

const MAX_NAME_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_OPTIONS: usize = 25;

/// A command definition that cannot be registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("`{0}` is not a valid name; use 1-32 lowercase letters, digits, `-` or `_`")]
    InvalidName(String),

    #[error("`{0}` needs a description of 1-100 characters")]
    InvalidDescription(String),

    #[error("command `{0}` is defined more than once")]
    DuplicateName(String),

    #[error("`{command}` declares `{argument}` more than once")]
    DuplicateArgument { command: String, argument: String },

    #[error("`{command}`: required argument `{argument}` follows an optional one")]
    RequiredAfterOptional { command: String, argument: String },

    #[error("`{command}`: text argument `{argument}` must be the last argument")]
    TextNotLast { command: String, argument: String },

    #[error("`{0}` declares both arguments and subcommands")]
    ArgsWithSubcommands(String),

    #[error("`{0}` declares more than 25 options")]
    TooManyOptions(String),
}

/// A command together with its validated spec.
#[derive(Clone)]
pub struct RegisteredCommand {
    pub spec: CommandSpec,
    pub command: Arc<dyn Command>,
}

/// All commands, indexed by name and category.
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    by_name: HashMap<&'static str, usize>,
    by_category: BTreeMap<CommandCategory, Vec<usize>>,
}

impl CommandRegistry {
    /// Validates every command spec and builds the indexes.
    ///
    /// # Returns
    /// - `Ok(CommandRegistry)` - Every spec is valid and names are unique
    /// - `Err(RegistryError)` - The first invalid spec found
    pub fn new(commands: Vec<Arc<dyn Command>>) -> Result<Self, RegistryError> {
        let mut registry = Self {
            commands: Vec::with_capacity(commands.len()),
            by_name: HashMap::new(),
            by_category: BTreeMap::new(),
        };

        for command in commands {
            let spec = command.spec();
            validate_spec(&spec)?;

            if registry.by_name.contains_key(spec.name) {
                return Err(RegistryError::DuplicateName(spec.name.to_string()));
            }

            let index = registry.commands.len();
            registry.by_name.insert(spec.name, index);
            registry
                .by_category
                .entry(spec.category)
                .or_default()
                .push(index);
            registry.commands.push(RegisteredCommand { spec, command });
        }

        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        let name = name.to_lowercase();
        self.by_name
            .get(name.as_str())
            .map(|index| &self.commands[*index])
    }

    pub fn commands_in(&self, category: CommandCategory) -> Vec<&RegisteredCommand> {
        self.by_category
            .get(&category)
            .map(|indexes| indexes.iter().map(|i| &self.commands[*i]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Slash command schemas for every registered command.
    pub fn to_create_commands(&self) -> Vec<CreateCommand> {
        self.commands
            .iter()
            .map(|registered| create_command(&registered.spec))
            .collect()
    }

    /// Pushes the slash command schemas to Discord.
    ///
    /// With `dev_guild_id` the commands are registered to that guild only, where
    /// they update instantly; otherwise they are registered globally.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of commands Discord accepted
    /// - `Err(AppError)` - Discord rejected the request
    pub async fn register(&self, http: &Http, dev_guild_id: Option<u64>) -> Result<usize, AppError> {
        let commands = self.to_create_commands();

        let registered = match dev_guild_id {
            Some(guild_id) => GuildId::new(guild_id).set_commands(http, commands).await?,
            None => SlashCommand::set_global_commands(http, commands).await?,
        };

        Ok(registered.len())
    }

    /// Command listing for the dashboard, in category order.
    pub fn command_dtos(&self) -> Vec<CommandDto> {
        CommandCategory::ALL
            .iter()
            .flat_map(|category| self.commands_in(*category))
            .map(|registered| {
                let spec = &registered.spec;
                CommandDto {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    category: spec.category.name().to_string(),
                    usage: spec.usage(),
                    owner_only: spec.owner_only,
                    guild_only: spec.guild_only,
                    subcommands: spec.subcommand_names(),
                }
            })
            .collect()
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn valid_description(description: &str) -> bool {
    let len = description.chars().count();
    (1..=MAX_DESCRIPTION_LEN).contains(&len)
}

pub fn validate_spec(spec: &CommandSpec) -> Result<(), RegistryError> {
    if !valid_name(spec.name) {
        return Err(RegistryError::InvalidName(spec.name.to_string()));
    }
    if !valid_description(spec.description) {
        return Err(RegistryError::InvalidDescription(spec.name.to_string()));
    }
    if !spec.args.is_empty() && !spec.subcommands.is_empty() {
        return Err(RegistryError::ArgsWithSubcommands(spec.name.to_string()));
    }
    if spec.subcommands.len() > MAX_OPTIONS {
        return Err(RegistryError::TooManyOptions(spec.name.to_string()));
    }

    validate_args(spec.name, &spec.args)?;

    let mut seen = HashSet::new();
    for sub in &spec.subcommands {
        let qualified = format!("{} {}", spec.name, sub.name);
        if !valid_name(sub.name) {
            return Err(RegistryError::InvalidName(qualified));
        }
        if !valid_description(sub.description) {
            return Err(RegistryError::InvalidDescription(qualified));
        }
        if !seen.insert(sub.name) {
            return Err(RegistryError::DuplicateArgument {
                command: spec.name.to_string(),
                argument: sub.name.to_string(),
            });
        }
        validate_args(&qualified, &sub.args)?;
    }

    Ok(())
}

fn validate_args(command: &str, args: &[ArgSpec]) -> Result<(), RegistryError> {
    if args.len() > MAX_OPTIONS {
        return Err(RegistryError::TooManyOptions(command.to_string()));
    }

    let mut seen = HashSet::new();
    let mut optional_seen = false;

    for (index, arg) in args.iter().enumerate() {
        let qualified = format!("{} {}", command, arg.name);
        if !valid_name(arg.name) {
            return Err(RegistryError::InvalidName(qualified));
        }
        if !valid_description(arg.description) {
            return Err(RegistryError::InvalidDescription(qualified));
        }
        if !seen.insert(arg.name) {
            return Err(RegistryError::DuplicateArgument {
                command: command.to_string(),
                argument: arg.name.to_string(),
            });
        }
        if arg.required && optional_seen {
            return Err(RegistryError::RequiredAfterOptional {
                command: command.to_string(),
                argument: arg.name.to_string(),
            });
        }
        if arg.kind == ArgKind::Text && index + 1 != args.len() {
            return Err(RegistryError::TextNotLast {
                command: command.to_string(),
                argument: arg.name.to_string(),
            });
        }
        optional_seen |= !arg.required;
    }

    Ok(())
}

fn create_command(spec: &CommandSpec) -> CreateCommand {
    let mut command = CreateCommand::new(spec.name).description(spec.description);

    for arg in &spec.args {
        command = command.add_option(create_option(arg));
    }
    for sub in &spec.subcommands {
        let mut option =
            CreateCommandOption::new(CommandOptionType::SubCommand, sub.name, sub.description);
        for arg in &sub.args {
            option = option.add_sub_option(create_option(arg));
        }
        command = command.add_option(option);
    }

    if !spec.permissions.is_empty() {
        command = command.default_member_permissions(spec.permissions);
    }
    if spec.guild_only {
        command = command.dm_permission(false);
    }

    command
}

fn create_option(arg: &ArgSpec) -> CreateCommandOption {
    let kind = match arg.kind {
        ArgKind::String | ArgKind::Text => CommandOptionType::String,
        ArgKind::Integer => CommandOptionType::Integer,
        ArgKind::Boolean => CommandOptionType::Boolean,
        ArgKind::User => CommandOptionType::User,
        ArgKind::Channel => CommandOptionType::Channel,
        ArgKind::Role => CommandOptionType::Role,
    };

    let mut option = CreateCommandOption::new(kind, arg.name, arg.description)
        .required(arg.required)
        .set_autocomplete(arg.autocomplete);
    for choice in arg.choices {
        option = option.add_string_choice(*choice, *choice);
    }
    if let Some((min, max)) = arg.range {
        option = option
            .min_number_value(min as f64)
            .max_number_value(max as f64);
    }
    option
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::server::bot::command::{
        builtin_commands, context::CommandContext, CommandInput, SubcommandSpec,
    };

    struct Stub(CommandSpec);

    #[async_trait]
    impl Command for Stub {
        fn spec(&self) -> CommandSpec {
            self.0.clone()
        }

        async fn run(&self, _ctx: &CommandContext<'_>, _input: CommandInput) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn stub(spec: CommandSpec) -> Arc<dyn Command> {
        Arc::new(Stub(spec))
    }

    fn spec(name: &'static str) -> CommandSpec {
        CommandSpec::new(name, "Does a thing", CommandCategory::General)
    }

    /// Expect the shipped command set to pass validation
    #[test]
    fn builtin_commands_are_valid() {
        let registry = CommandRegistry::new(builtin_commands()).unwrap();

        assert!(registry.get("ping").is_some());
        assert!(registry.get("TICKET").is_some());
        assert_eq!(registry.to_create_commands().len(), registry.len());
        assert!(!registry.commands_in(CommandCategory::Moderation).is_empty());
    }

    /// Expect names outside `[a-z0-9_-]{1,32}` to be rejected
    #[test]
    fn rejects_invalid_names() {
        for name in ["", "Ping", "has space", "this-name-is-far-too-long-for-discord"] {
            let result = CommandRegistry::new(vec![stub(spec(name))]);
            assert!(matches!(result, Err(RegistryError::InvalidName(_))), "{name}");
        }
    }

    /// Expect an empty description to be rejected
    #[test]
    fn rejects_empty_description() {
        let result = CommandRegistry::new(vec![stub(CommandSpec::new(
            "ping",
            "",
            CommandCategory::General,
        ))]);

        assert_eq!(
            result.err(),
            Some(RegistryError::InvalidDescription("ping".to_string()))
        );
    }

    /// Expect duplicate command names to be rejected
    #[test]
    fn rejects_duplicates() {
        let result = CommandRegistry::new(vec![stub(spec("ping")), stub(spec("ping"))]);

        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicateName("ping".to_string()))
        );
    }

    /// Expect required arguments after optional ones to be rejected
    #[test]
    fn rejects_required_after_optional() {
        let bad = spec("warn")
            .arg(ArgSpec::optional("reason", "Why", ArgKind::String))
            .arg(ArgSpec::required("user", "Who", ArgKind::User));

        assert!(matches!(
            CommandRegistry::new(vec![stub(bad)]),
            Err(RegistryError::RequiredAfterOptional { .. })
        ));
    }

    /// Expect a text argument anywhere but last to be rejected
    #[test]
    fn rejects_text_before_other_arguments() {
        let bad = spec("say")
            .arg(ArgSpec::required("message", "What", ArgKind::Text))
            .arg(ArgSpec::required("channel", "Where", ArgKind::Channel));

        assert!(matches!(
            CommandRegistry::new(vec![stub(bad)]),
            Err(RegistryError::TextNotLast { .. })
        ));
    }

    /// Expect subcommand arguments to be validated too
    #[test]
    fn validates_subcommand_arguments() {
        let bad = spec("config").subcommand(
            SubcommandSpec::new("prefix", "Set the prefix")
                .arg(ArgSpec::optional("value", "Prefix", ArgKind::String))
                .arg(ArgSpec::required("extra", "Extra", ArgKind::String)),
        );

        assert!(matches!(
            CommandRegistry::new(vec![stub(bad)]),
            Err(RegistryError::RequiredAfterOptional { .. })
        ));
    }

    /// Expect commands grouped by category in the dashboard listing
    #[test]
    fn lists_commands_by_category() {
        let registry = CommandRegistry::new(vec![
            stub(CommandSpec::new("kick", "Kick", CommandCategory::Moderation)),
            stub(spec("ping")),
        ])
        .unwrap();

        let names: Vec<String> = registry.command_dtos().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["ping", "kick"]);
    }
}
