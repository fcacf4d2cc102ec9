//! Turning raw prefix text and slash options into a [`CommandInput`].

use serenity::all::{CommandDataOption, CommandDataOptionValue};

use crate::server::{
    bot::command::{ArgKind, ArgSpec, ArgValue, CommandArgs, CommandInput, CommandSpec},
    error::command::CommandError,
    util::parse::parse_snowflake,
};

/// A word from a prefix command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    /// Byte offset just past the token, closing quote included.
    pub end: usize,
}

/// Splits a command line on whitespace, keeping `"quoted phrases"` together.
///
/// Inside quotes `\"` is a literal quote. An unterminated quote is an error.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CommandError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut value = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' if chars.peek().map(|(_, n)| *n) == Some('"') => {
                        value.push('"');
                        chars.next();
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    c => value.push(c),
                }
            }
            if !closed {
                return Err(CommandError::InvalidArgument {
                    name: "input".to_string(),
                    reason: "unterminated quote".to_string(),
                });
            }
        } else {
            while let Some(&(_, c)) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }

        let end = chars.peek().map(|(i, _)| *i).unwrap_or(input.len());
        tokens.push(Token { value, end });
    }

    Ok(tokens)
}

/// Strips the guild prefix or a leading bot mention from a message.
///
/// # Returns
/// - `Some((name, rest))` - Lowercased command name and the unparsed remainder
/// - `None` - The message is not addressed to the bot
pub fn split_command<'a>(content: &'a str, prefix: &str, bot_id: u64) -> Option<(String, &'a str)> {
    let content = content.trim_start();
    let mention = format!("<@{}>", bot_id);
    let nick_mention = format!("<@!{}>", bot_id);

    let body = if !prefix.is_empty() && content.starts_with(prefix) {
        &content[prefix.len()..]
    } else if let Some(rest) = content.strip_prefix(&mention) {
        rest.trim_start()
    } else if let Some(rest) = content.strip_prefix(&nick_mention) {
        rest.trim_start()
    } else {
        return None;
    };

    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return None;
    }

    Some((name.to_lowercase(), &body[name_end..]))
}

/// Parses the text after a prefix command name against its `CommandSpec`.
pub fn parse_prefix_input(spec: &CommandSpec, rest: &str) -> Result<CommandInput, CommandError> {
    let tokens = tokenize(rest)?;

    if spec.subcommands.is_empty() {
        let args = parse_args(&spec.args, rest, &tokens)?;
        return Ok(CommandInput {
            subcommand: None,
            args,
        });
    }

    let Some((first, remaining)) = tokens.split_first() else {
        return Err(CommandError::MissingSubcommand {
            available: spec.subcommand_names(),
        });
    };
    let sub = spec
        .find_subcommand(&first.value)
        .ok_or_else(|| CommandError::UnknownSubcommand {
            given: first.value.clone(),
            available: spec.subcommand_names(),
        })?;

    let args = parse_args(&sub.args, rest, remaining)?;

    Ok(CommandInput {
        subcommand: Some(sub.name.to_string()),
        args,
    })
}

fn parse_args(specs: &[ArgSpec], raw: &str, tokens: &[Token]) -> Result<CommandArgs, CommandError> {
    let mut args = CommandArgs::default();
    let mut remaining = tokens;

    for spec in specs {
        let Some((token, rest)) = remaining.split_first() else {
            if spec.required {
                return Err(CommandError::MissingArgument(spec.name.to_string()));
            }
            continue;
        };

        // Quotes around the first word of a text argument are syntax; the rest
        // of the line is kept as typed.
        let text = if spec.kind == ArgKind::Text {
            format!("{}{}", token.value, raw[token.end..].trim_end())
        } else {
            token.value.clone()
        };
        args.insert(spec.name, parse_value(spec, &text)?);

        remaining = if spec.kind == ArgKind::Text { &[] } else { rest };
    }

    Ok(args)
}

/// Converts one textual value to the argument's kind, enforcing choices and range.
pub fn parse_value(spec: &ArgSpec, text: &str) -> Result<ArgValue, CommandError> {
    let invalid = |reason: String| CommandError::InvalidArgument {
        name: spec.name.to_string(),
        reason,
    };

    let value = match spec.kind {
        ArgKind::String | ArgKind::Text => {
            if spec.choices.is_empty() {
                ArgValue::String(text.to_string())
            } else {
                let choice = spec
                    .choices
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(text))
                    .ok_or_else(|| invalid(format!("choose one of {}", spec.choices.join(", "))))?;
                ArgValue::String(choice.to_string())
            }
        }
        ArgKind::Integer => {
            let value: i64 = text
                .parse()
                .map_err(|_| invalid(format!("`{}` is not a whole number", text)))?;
            ArgValue::Integer(value)
        }
        ArgKind::Boolean => match text.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "enable" | "enabled" | "1" => ArgValue::Boolean(true),
            "off" | "false" | "no" | "disable" | "disabled" | "0" => ArgValue::Boolean(false),
            _ => return Err(invalid("use on or off".to_string())),
        },
        ArgKind::User => ArgValue::User(
            parse_snowflake(text).ok_or_else(|| invalid("mention a user or give their id".to_string()))?,
        ),
        ArgKind::Channel => ArgValue::Channel(
            parse_snowflake(text)
                .ok_or_else(|| invalid("mention a channel or give its id".to_string()))?,
        ),
        ArgKind::Role => ArgValue::Role(
            parse_snowflake(text).ok_or_else(|| invalid("mention a role or give its id".to_string()))?,
        ),
    };

    check_range(spec, &value)?;

    Ok(value)
}

fn check_range(spec: &ArgSpec, value: &ArgValue) -> Result<(), CommandError> {
    if let (Some((min, max)), ArgValue::Integer(v)) = (spec.range, value) {
        if !(min..=max).contains(v) {
            return Err(CommandError::InvalidArgument {
                name: spec.name.to_string(),
                reason: format!("must be between {} and {}", min, max),
            });
        }
    }
    Ok(())
}

/// Converts slash command options into a [`CommandInput`].
///
/// Discord already enforces types and required options, but values are checked
/// against the `CommandSpec` again so both entry points behave the same.
pub fn parse_slash_input(
    spec: &CommandSpec,
    options: &[CommandDataOption],
) -> Result<CommandInput, CommandError> {
    if spec.subcommands.is_empty() {
        return Ok(CommandInput {
            subcommand: None,
            args: slash_args(&spec.args, options)?,
        });
    }

    let Some(first) = options.first() else {
        return Err(CommandError::MissingSubcommand {
            available: spec.subcommand_names(),
        });
    };
    let sub = spec
        .find_subcommand(&first.name)
        .ok_or_else(|| CommandError::UnknownSubcommand {
            given: first.name.clone(),
            available: spec.subcommand_names(),
        })?;
    let nested: &[CommandDataOption] = match &first.value {
        CommandDataOptionValue::SubCommand(nested) => nested,
        _ => &[],
    };

    Ok(CommandInput {
        subcommand: Some(sub.name.to_string()),
        args: slash_args(&sub.args, nested)?,
    })
}

fn slash_args(specs: &[ArgSpec], options: &[CommandDataOption]) -> Result<CommandArgs, CommandError> {
    let mut args = CommandArgs::default();

    for spec in specs {
        let value = options
            .iter()
            .find(|o| o.name == spec.name)
            .and_then(|o| slash_value(&o.value));

        match value {
            Some(ArgValue::String(text)) => {
                args.insert(spec.name, parse_value(spec, &text)?);
            }
            Some(value) => {
                check_range(spec, &value)?;
                args.insert(spec.name, value);
            }
            None if spec.required => {
                return Err(CommandError::MissingArgument(spec.name.to_string()));
            }
            None => {}
        }
    }

    Ok(args)
}

fn slash_value(value: &CommandDataOptionValue) -> Option<ArgValue> {
    Some(match value {
        CommandDataOptionValue::String(s) => ArgValue::String(s.clone()),
        CommandDataOptionValue::Integer(i) => ArgValue::Integer(*i),
        CommandDataOptionValue::Boolean(b) => ArgValue::Boolean(*b),
        CommandDataOptionValue::User(id) => ArgValue::User(id.get()),
        CommandDataOptionValue::Channel(id) => ArgValue::Channel(id.get()),
        CommandDataOptionValue::Role(id) => ArgValue::Role(id.get()),
        CommandDataOptionValue::Autocomplete { value, .. } => ArgValue::String(value.clone()),
        _ => return None,
    })
}
