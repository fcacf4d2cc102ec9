use thiserror::Error;

/// Validation failures raised while resolving or running a command.
///
/// Every message here is written for the person who ran the command and is
/// shown to them as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`.")]
    UnknownCommand(String),

    #[error("Please choose one of: {}.", .available.join(", "))]
    MissingSubcommand { available: Vec<String> },

    #[error("Unknown subcommand `{given}`. Available: {}.", .available.join(", "))]
    UnknownSubcommand {
        given: String,
        available: Vec<String>,
    },

    #[error("Missing required argument `{0}`.")]
    MissingArgument(String),

    #[error("Invalid value for `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error("This command is restricted to the bot owner.")]
    OwnerOnly,

    #[error("You need the following permissions: {0}.")]
    MissingPermissions(String),

    #[error("You cannot use that on yourself.")]
    SelfTarget,

    #[error("Commands are disabled in this channel.")]
    ChannelDisabled,

    #[error("You already have {max} open ticket(s). Close one before opening another.")]
    TicketLimitReached { max: u32 },

    #[error("Unknown ticket category `{0}`.")]
    UnknownTicketCategory(String),

    #[error("This channel is not a ticket.")]
    NotATicketChannel,

    #[error("No ticket #{0} exists in this server.")]
    TicketNotFound(i32),

    #[error("Only support staff can do that.")]
    NotTicketStaff,

    #[error("A ticket cannot move from `{from}` to `{to}`.")]
    InvalidStatusTransition { from: String, to: String },

    #[error("{0}")]
    InvalidPoll(String),

    #[error("That poll does not exist or has already ended.")]
    PollNotFound,

    #[error("Only the poll author or a moderator can end this poll.")]
    NotPollOwner,
}
