use std::time::Duration;

/// Parses `250ms`, `10s`, `5m`, `1h` or a bare number of seconds.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Duration must not be empty.".to_owned());
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(format!("Invalid duration '{}'.", value));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| format!("Invalid duration '{}': {}", value, err))?;

    let multiplier_secs: u64 = match unit_part.trim() {
        "ms" => return non_zero(Duration::from_millis(number)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        unit => return Err(format!("Invalid duration unit '{}'.", unit)),
    };
    let secs = number
        .checked_mul(multiplier_secs)
        .ok_or_else(|| "Duration overflow.".to_owned())?;
    non_zero(Duration::from_secs(secs))
}

fn non_zero(duration: Duration) -> Result<Duration, String> {
    if duration.is_zero() {
        Err("Duration must be > 0.".to_owned())
    } else {
        Ok(duration)
    }
}
