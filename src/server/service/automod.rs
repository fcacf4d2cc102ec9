//! Auto-moderation checks for incoming guild messages.

use crate::server::model::guild_settings::AutomodConfig;

/// A rule an incoming message broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    BannedWord(String),
    Invite,
    Link,
    MassMention { count: usize, max: u32 },
}

impl Violation {
    /// Reason shown to the author and written to the log channel.
    pub fn reason(&self) -> String {
        match self {
            Self::BannedWord(_) => "Your message contained a banned word.".to_string(),
            Self::Invite => "Server invites are not allowed here.".to_string(),
            Self::Link => "Links are not allowed here.".to_string(),
            Self::MassMention { count, max } => {
                format!("Too many mentions ({} of at most {}).", count, max)
            }
        }
    }
}

/// What the check needs to know about a message.
pub struct MessageFacts<'a> {
    pub content: &'a str,
    /// User and role mentions combined.
    pub mention_count: usize,
    pub author_role_ids: &'a [u64],
    /// Author holds MANAGE_MESSAGES or a configured moderator role.
    pub author_is_moderator: bool,
}

const INVITE_MARKERS: [&str; 4] = [
    "discord.gg/",
    "discord.com/invite/",
    "discordapp.com/invite/",
    "dsc.gg/",
];

/// Returns the first rule `message` breaks, checking banned words, invites,
/// links then mentions.
///
/// Nothing is flagged while auto-moderation is disabled, for moderators, or
/// for members holding an exempt role.
pub fn check_message(config: &AutomodConfig, message: &MessageFacts<'_>) -> Option<Violation> {
    if !config.enabled || message.author_is_moderator {
        return None;
    }
    if message
        .author_role_ids
        .iter()
        .any(|id| config.exempt_role_ids.contains(id))
    {
        return None;
    }

    let lowered = message.content.to_lowercase();

    if let Some(word) = find_banned_word(&lowered, &config.banned_words) {
        return Some(Violation::BannedWord(word));
    }
    if config.anti_invite && INVITE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Some(Violation::Invite);
    }
    if config.anti_link && contains_link(&lowered) {
        return Some(Violation::Link);
    }
    if config.max_mentions > 0 && message.mention_count > config.max_mentions as usize {
        return Some(Violation::MassMention {
            count: message.mention_count,
            max: config.max_mentions,
        });
    }

    None
}

/// Matches whole words so "class" does not trip a ban on "ass".
///
/// Entries may hold spaces or punctuation (`free nitro`, `a$$`). Only an
/// entry edge that is alphanumeric needs a word boundary next to it.
fn find_banned_word(lowered: &str, banned: &[String]) -> Option<String> {
    banned.iter().find_map(|banned| {
        let banned = banned.trim().to_lowercase();
        if banned.is_empty() {
            return None;
        }
        contains_word(lowered, &banned).then_some(banned)
    })
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    let starts_alnum = needle.chars().next().is_some_and(char::is_alphanumeric);
    let ends_alnum = needle.chars().next_back().is_some_and(char::is_alphanumeric);

    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        (!starts_alnum || !before.is_some_and(char::is_alphanumeric))
            && (!ends_alnum || !after.is_some_and(char::is_alphanumeric))
    })
}

fn contains_link(lowered: &str) -> bool {
    lowered.split_whitespace().any(|token| {
        let token = token.trim_matches(|c: char| c == '<' || c == '>' || c == '(' || c == ')');
        (token.starts_with("http://") || token.starts_with("https://"))
            && url::Url::parse(token).map(|u| u.host().is_some()).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AutomodConfig {
        AutomodConfig {
            enabled: true,
            anti_invite: true,
            anti_link: true,
            max_mentions: 3,
            banned_words: vec!["badword".to_string(), "free nitro".to_string()],
            exempt_role_ids: vec![99],
        }
    }

    fn facts(content: &str) -> MessageFacts<'_> {
        MessageFacts {
            content,
            mention_count: 0,
            author_role_ids: &[],
            author_is_moderator: false,
        }
    }

    #[test]
    fn flags_banned_words_as_whole_words() {
        assert_eq!(
            check_message(&config(), &facts("this is a BadWord!")),
            Some(Violation::BannedWord("badword".to_string()))
        );
        assert_eq!(check_message(&config(), &facts("badwords are fine")), None);
        assert_eq!(
            check_message(&config(), &facts("get FREE NITRO now")),
            Some(Violation::BannedWord("free nitro".to_string()))
        );
    }

    #[test]
    fn flags_banned_words_with_punctuation() {
        let mut config = config();
        config.banned_words = vec!["f-ck".to_string(), "a$$".to_string()];

        assert_eq!(
            check_message(&config, &facts("what the F-CK")),
            Some(Violation::BannedWord("f-ck".to_string()))
        );
        assert_eq!(
            check_message(&config, &facts("you a$$!")),
            Some(Violation::BannedWord("a$$".to_string()))
        );
        assert_eq!(check_message(&config, &facts("graf-ckt and ka$$")), None);
    }

    #[test]
    fn flags_invites_before_generic_links() {
        assert_eq!(
            check_message(&config(), &facts("join https://discord.gg/abc")),
            Some(Violation::Invite)
        );
        assert_eq!(
            check_message(&config(), &facts("see https://example.com/page")),
            Some(Violation::Link)
        );
        assert_eq!(check_message(&config(), &facts("example.com without scheme")), None);
    }

    #[test]
    fn flags_mass_mentions_over_limit() {
        let message = MessageFacts {
            mention_count: 4,
            ..facts("hi all")
        };

        assert_eq!(
            check_message(&config(), &message),
            Some(Violation::MassMention { count: 4, max: 3 })
        );

        let at_limit = MessageFacts {
            mention_count: 3,
            ..facts("hi all")
        };
        assert_eq!(check_message(&config(), &at_limit), None);
    }

    #[test]
    fn skips_disabled_moderators_and_exempt_roles() {
        let mut disabled = config();
        disabled.enabled = false;
        assert_eq!(check_message(&disabled, &facts("badword")), None);

        let moderator = MessageFacts {
            author_is_moderator: true,
            ..facts("badword")
        };
        assert_eq!(check_message(&config(), &moderator), None);

        let exempt = MessageFacts {
            author_role_ids: &[5, 99],
            ..facts("badword")
        };
        assert_eq!(check_message(&config(), &exempt), None);
    }

    #[test]
    fn zero_max_mentions_disables_the_check() {
        let mut no_limit = config();
        no_limit.max_mentions = 0;
        let message = MessageFacts {
            mention_count: 50,
            ..facts("hello")
        };

        assert_eq!(check_message(&no_limit, &message), None);
    }
}
