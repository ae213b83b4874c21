//! Extract the trailing time total from a table row's text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `H:MM` through `HHH:MM`, word-bounded so substrings of longer numbers
/// don't match.
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,3}):(\d{2})\b").unwrap());

/// Scan a row's full text for time tokens and return the last one as a
/// minute count.
///
/// Report rows render their running total last, so only the last match is
/// inspected. A last token whose minute component is >= 60 is a
/// false positive (a ratio or an identifier, not a time) and discards the
/// whole row: the function returns 0 rather than backing off to an earlier
/// token. No match also yields 0.
pub fn row_minutes(row_text: &str) -> i64 {
    let Some(token) = TIME_TOKEN.captures_iter(row_text).last() else {
        return 0;
    };
    let hours: i64 = token[1].parse().unwrap_or(0);
    let minutes: i64 = token[2].parse().unwrap_or(0);
    if minutes >= 60 {
        debug!(token = &token[0], "discarding malformed time token");
        return 0;
    }
    hours * 60 + minutes
}
