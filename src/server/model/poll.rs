use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::server::error::command::CommandError;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;
pub const MAX_QUESTION_LEN: usize = 256;
pub const MAX_OPTION_LEN: usize = 80;
/// Longest auto-end delay accepted, one week.
pub const MAX_DURATION_MINUTES: i64 = 10_080;

/// Number emojis used to label poll options, in option order.
pub const OPTION_EMOJIS: [&str; MAX_OPTIONS] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Votes are reactions with the option emojis.
    Reactions,
    /// Votes are button clicks tracked in [`Poll::votes`].
    Buttons,
}

/// A running poll, kept in memory until it ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
    /// Id of the poll message, which is also the poll's key.
    pub id: u64,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub author_id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub mode: PollMode,
    /// Button votes: user id → option index.
    pub votes: HashMap<u64, usize>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// What happened to a button vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    Moved { from: usize },
    Unchanged,
}

impl Poll {
    /// Records `user_id`'s button vote for `option`, replacing any earlier vote.
    pub fn record_vote(&mut self, user_id: u64, option: usize) -> Result<VoteOutcome, CommandError> {
        if option >= self.options.len() {
            return Err(CommandError::InvalidPoll(
                "That option is not part of this poll.".to_string(),
            ));
        }

        Ok(match self.votes.insert(user_id, option) {
            None => VoteOutcome::Recorded,
            Some(previous) if previous == option => VoteOutcome::Unchanged,
            Some(previous) => VoteOutcome::Moved { from: previous },
        })
    }
}

/// Validated input for a new poll.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePollParam {
    pub question: String,
    pub options: Vec<String>,
    pub mode: PollMode,
    pub duration: Option<chrono::Duration>,
}

impl CreatePollParam {
    /// Builds a poll request from raw command input.
    ///
    /// `options` is split on `|`. Blank entries are rejected rather than
    /// dropped so the numbering the author sees matches what they typed.
    pub fn parse(
        question: &str,
        options: &str,
        duration_minutes: Option<i64>,
        buttons: bool,
    ) -> Result<Self, CommandError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CommandError::InvalidPoll(
                "The poll question cannot be empty.".to_string(),
            ));
        }
        if question.chars().count() > MAX_QUESTION_LEN {
            return Err(CommandError::InvalidPoll(format!(
                "The poll question must be at most {} characters.",
                MAX_QUESTION_LEN
            )));
        }

        let options: Vec<String> = options.split('|').map(|o| o.trim().to_string()).collect();
        if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
            return Err(CommandError::InvalidPoll(format!(
                "A poll needs between {} and {} options separated by `|`.",
                MIN_OPTIONS, MAX_OPTIONS
            )));
        }
        if options.iter().any(|o| o.is_empty()) {
            return Err(CommandError::InvalidPoll(
                "Poll options cannot be empty.".to_string(),
            ));
        }
        if options.iter().any(|o| o.chars().count() > MAX_OPTION_LEN) {
            return Err(CommandError::InvalidPoll(format!(
                "Poll options must be at most {} characters.",
                MAX_OPTION_LEN
            )));
        }

        let duration = match duration_minutes {
            None => None,
            Some(m) if (1..=MAX_DURATION_MINUTES).contains(&m) => {
                Some(chrono::Duration::minutes(m))
            }
            Some(_) => {
                return Err(CommandError::InvalidPoll(format!(
                    "Duration must be between 1 and {} minutes.",
                    MAX_DURATION_MINUTES
                )))
            }
        };

        Ok(Self {
            question: question.to_string(),
            options,
            mode: if buttons {
                PollMode::Buttons
            } else {
                PollMode::Reactions
            },
            duration,
        })
    }
}

/// Vote count for one option in a finished tally.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionResult {
    pub option: String,
    pub votes: u64,
    /// Share of the total, 0 to 100. Zero when nobody voted.
    pub percent: f64,
}

/// Final tally of a poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResults {
    pub question: String,
    pub options: Vec<OptionResult>,
    pub total: u64,
    /// Indexes of the options with the most votes. Empty when nobody voted.
    pub winners: Vec<usize>,
}
