//! Display formatting for signed minute balances.

/// Format a signed minute count for display.
///
/// Zero renders as `"00:00"`; balances under one hour render in minutes
/// (`"+45min"`, `"-12min"`); anything else renders as signed zero-padded
/// `HH:MM` with no upper bound on the hour field.
pub fn format_minutes(minutes: i64) -> String {
    if minutes == 0 {
        return "00:00".to_string();
    }
    let sign = if minutes < 0 { '-' } else { '+' };
    let magnitude = minutes.abs();
    if magnitude < 60 {
        format!("{sign}{magnitude}min")
    } else {
        format!("{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
    }
}
