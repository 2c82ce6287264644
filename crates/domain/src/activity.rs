use crate::weekday::Weekday;

/// A time-anchored activity found in raw diet text. Transient output of
/// the extractor, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawActivity {
    /// 0-23, already resolved from any 12-hour form
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// Cleaned description, e.g. "take vitamins"
    pub text: String,
    /// The line the time token was found on, unmodified
    pub source_line: String,
    /// Set when the surrounding paragraph carried a day header
    pub day_hint: Option<Weekday>,
}
