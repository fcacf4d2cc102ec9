use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse id from String
    ///
    /// Ids are stored as text; a row holding something else means the data
    /// was written outside the bot.
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A JSON column did not have the expected shape.
    #[error("Malformed JSON in column '{column}': {reason}")]
    MalformedJson {
        /// Column that held the document
        column: &'static str,
        /// Deserializer message
        reason: String,
    },
}

/// Lets entity conversions use `?` on id parsing inside `Result<_, DbErr>`.
impl From<InternalError> for sea_orm::DbErr {
    fn from(err: InternalError) -> Self {
        sea_orm::DbErr::Custom(err.to_string())
    }
}
