use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp};

/// Embed colors used across the bot.
pub struct Colors;

impl Colors {
    pub const PRIMARY: u32 = 0x5865F2;
    pub const SUCCESS: u32 = 0x57F287;
    pub const WARNING: u32 = 0xFEE75C;
    pub const ERROR: u32 = 0xED4245;
    pub const MODERATION: u32 = 0xEB459E;
    pub const NEUTRAL: u32 = 0x99AAB5;
}

/// Standard embed in the given color with the bot footer and a timestamp.
pub fn base_embed(color: u32) -> CreateEmbed {
    CreateEmbed::default()
        .color(color)
        .footer(CreateEmbedFooter::new("Warden"))
        .timestamp(Timestamp::now())
}

pub fn primary_embed() -> CreateEmbed {
    base_embed(Colors::PRIMARY)
}

pub fn success_embed() -> CreateEmbed {
    base_embed(Colors::SUCCESS)
}

pub fn warning_embed() -> CreateEmbed {
    base_embed(Colors::WARNING)
}

pub fn error_embed() -> CreateEmbed {
    base_embed(Colors::ERROR)
}

pub fn moderation_embed() -> CreateEmbed {
    base_embed(Colors::MODERATION)
}

pub fn neutral_embed() -> CreateEmbed {
    base_embed(Colors::NEUTRAL)
}

/// The embed every failed command answers with.
pub fn command_error_embed(message: &str) -> CreateEmbed {
    error_embed().title("Command Error").description(message)
}

/// Cuts `text` to at most `max` characters, marking the cut with an ellipsis.
///
/// Discord rejects embeds whose fields exceed their limits, so user-supplied
/// text is passed through this first.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_text_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("ééééé", 3).chars().count(), 3);
    }

    #[test]
    fn error_embed_uses_command_error_title() {
        let json = serde_json::to_value(command_error_embed("nope")).unwrap();

        assert_eq!(json["title"], "Command Error");
        assert_eq!(json["description"], "nope");
        assert_eq!(json["color"], Colors::ERROR);
    }
}
