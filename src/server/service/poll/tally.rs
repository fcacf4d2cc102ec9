//! Vote counting for finished polls.

use crate::server::{
    discord::connector::ReactionCount,
    model::poll::{OptionResult, Poll, PollResults, OPTION_EMOJIS},
};

/// Counts reaction votes. The bot's own seed reaction on each option is not a vote.
pub fn tally_reactions(poll: &Poll, reactions: &[ReactionCount]) -> PollResults {
    let counts = poll
        .options
        .iter()
        .enumerate()
        .map(|(index, _)| {
            reactions
                .iter()
                .find(|r| r.emoji == OPTION_EMOJIS[index])
                .map(|r| r.count.saturating_sub(u64::from(r.me)))
                .unwrap_or(0)
        })
        .collect();

    summarize(poll, counts)
}

/// Counts button votes, one per user.
pub fn tally_buttons(poll: &Poll) -> PollResults {
    let mut counts = vec![0u64; poll.options.len()];
    for option in poll.votes.values() {
        if let Some(count) = counts.get_mut(*option) {
            *count += 1;
        }
    }

    summarize(poll, counts)
}

fn summarize(poll: &Poll, counts: Vec<u64>) -> PollResults {
    let total: u64 = counts.iter().sum();
    let max = counts.iter().copied().max().unwrap_or(0);

    let winners = if max == 0 {
        Vec::new()
    } else {
        counts
            .iter()
            .enumerate()
            .filter(|(_, votes)| **votes == max)
            .map(|(index, _)| index)
            .collect()
    };

    let options = poll
        .options
        .iter()
        .zip(counts)
        .map(|(option, votes)| OptionResult {
            option: option.clone(),
            votes,
            percent: if total == 0 {
                0.0
            } else {
                votes as f64 * 100.0 / total as f64
            },
        })
        .collect();

    PollResults {
        question: poll.question.clone(),
        options,
        total,
        winners,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::server::model::poll::PollMode;

    fn poll(options: &[&str], mode: PollMode) -> Poll {
        Poll {
            id: 1,
            guild_id: Some(2),
            channel_id: 3,
            author_id: 4,
            question: "Color?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            mode,
            votes: HashMap::new(),
            ends_at: None,
        }
    }

    fn reaction(index: usize, count: u64, me: bool) -> ReactionCount {
        ReactionCount {
            emoji: OPTION_EMOJIS[index].to_string(),
            count,
            me,
        }
    }

    /// Expect the bot's own reaction to be excluded from each option
    #[test]
    fn excludes_bot_reaction() {
        let poll = poll(&["Red", "Blue"], PollMode::Reactions);

        let results = tally_reactions(&poll, &[reaction(0, 4, true), reaction(1, 2, true)]);

        assert_eq!(results.options[0].votes, 3);
        assert_eq!(results.options[1].votes, 1);
        assert_eq!(results.total, 4);
        assert_eq!(results.options[0].percent, 75.0);
        assert_eq!(results.options[1].percent, 25.0);
        assert_eq!(results.winners, vec![0]);
    }

    /// Expect counts untouched when the bot's reaction was removed
    #[test]
    fn keeps_count_without_bot_reaction() {
        let poll = poll(&["Red", "Blue"], PollMode::Reactions);

        let results = tally_reactions(&poll, &[reaction(0, 2, false)]);

        assert_eq!(results.options[0].votes, 2);
        assert_eq!(results.options[1].votes, 0);
    }

    /// Expect every tied option reported as a winner
    #[test]
    fn reports_all_tied_options() {
        let poll = poll(&["A", "B", "C"], PollMode::Reactions);

        let results = tally_reactions(
            &poll,
            &[reaction(0, 3, true), reaction(1, 3, true), reaction(2, 2, true)],
        );

        assert_eq!(results.winners, vec![0, 1]);
    }

    /// Expect no winner and zero percentages when nobody voted
    #[test]
    fn no_votes_means_no_winner() {
        let poll = poll(&["A", "B"], PollMode::Reactions);

        let results = tally_reactions(&poll, &[reaction(0, 1, true), reaction(1, 1, true)]);

        assert_eq!(results.total, 0);
        assert!(results.winners.is_empty());
        assert!(results.options.iter().all(|o| o.percent == 0.0));
    }

    /// Expect one vote per user in button mode
    #[test]
    fn counts_button_votes() {
        let mut poll = poll(&["Red", "Blue"], PollMode::Buttons);
        poll.votes.insert(10, 0);
        poll.votes.insert(11, 0);
        poll.votes.insert(12, 1);

        let results = tally_buttons(&poll);

        assert_eq!(results.options[0].votes, 2);
        assert_eq!(results.options[1].votes, 1);
        assert_eq!(results.winners, vec![0]);
    }
}
