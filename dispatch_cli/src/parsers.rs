use jiff::SpanRelativeTo;

/// Accepts `"PT3M"`, `"3m"`, `"90s"` or a bare number of minutes.
pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(minutes) = input.parse::<i64>() {
        jiff::SignedDuration::from_mins(minutes)
    } else {
        return Err(String::from("Invalid duration"));
    };

    if duration.is_negative() {
        return Err(String::from("Duration must not be negative"));
    }

    Ok(duration)
}
