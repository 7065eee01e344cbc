use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};

use crate::error::{Error, Result};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Tries kitchen time, bare seconds, then a duration literal; first match wins.
pub fn parse_duration(input: &str, now: NaiveTime) -> Result<TimeDelta> {
    // 1. Kitchen time -> until that time today, or tomorrow if already past
    if let Some(d) = until_kitchen_time(input, now) {
        return Ok(d);
    }

    // 2. Plain integer -> N seconds
    if let Ok(secs) = input.parse::<u64>()
        && let Some(d) = i64::try_from(secs).ok().and_then(TimeDelta::try_seconds)
    {
        return Ok(d);
    }

    // 3. Duration literal with h/m/s (and sub-second) units
    parse_literal(input).ok_or_else(|| Error::InvalidDuration(input.to_string()))
}

// `H:MMAM` or `HH:MMPM`: two-digit minutes, uppercase suffix
fn is_kitchen_shape(input: &str) -> bool {
    let Some((hour, rest)) = input.split_once(':') else {
        return false;
    };
    let Some(minute) = rest.strip_suffix("AM").or_else(|| rest.strip_suffix("PM")) else {
        return false;
    };
    (1..=2).contains(&hour.len())
        && hour.bytes().all(|b| b.is_ascii_digit())
        && minute.len() == 2
        && minute.bytes().all(|b| b.is_ascii_digit())
}

fn until_kitchen_time(input: &str, now: NaiveTime) -> Option<TimeDelta> {
    if !is_kitchen_shape(input) {
        return None;
    }
    let target = NaiveTime::parse_from_str(input, "%I:%M%p").ok()?;

    // Only time of day matters, so both sides share a fixed date.
    let anchor = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    let origin = anchor.and_time(NaiveTime::from_hms_opt(
        now.hour(),
        now.minute(),
        now.second(),
    )?);
    let mut target = anchor.and_time(target);
    if target < origin {
        target += TimeDelta::days(1);
    }
    Some(target - origin)
}

fn unit_nanos(unit: &str) -> Option<i64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3600 * NANOS_PER_SECOND),
        _ => None,
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_literal(input: &str) -> Option<TimeDelta> {
    let mut s = input.strip_prefix('+').unwrap_or(input);
    if s == "0" {
        return Some(TimeDelta::zero());
    }
    if s.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    while !s.is_empty() {
        let (whole, rest) = split_digits(s);
        let (fraction, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", rest),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_end);
        let scale = unit_nanos(unit)?;

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut nanos = whole.checked_mul(scale)?;
        if !fraction.is_empty() {
            // digits past 18 cannot change the result at nanosecond precision
            let digits = &fraction[..fraction.len().min(18)];
            let value: i64 = digits.parse().ok()?;
            let divisor = 10f64.powi(digits.len() as i32);
            nanos = nanos.checked_add((value as f64 * (scale as f64 / divisor)) as i64)?;
        }

        total = total.checked_add(nanos)?;
        s = rest;
    }

    Some(TimeDelta::nanoseconds(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_fixed() -> NaiveTime {
        // Fixed reference: 10:00:00 local time of day
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    fn secs(input: &str) -> i64 {
        parse_duration(input, now_fixed()).unwrap().num_seconds()
    }

    #[test]
    fn test_bare_integer_is_seconds() {
        for n in [0u64, 1, 5, 59, 60, 3599, 3600, 86_400, 1_000_000] {
            let d = parse_duration(&n.to_string(), now_fixed()).unwrap();
            assert_eq!(d, TimeDelta::seconds(n as i64));
        }
    }

    #[test]
    fn test_minutes_seconds() {
        assert_eq!(secs("1m50s"), 110);
    }

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(secs("3h40m50s"), 13_250);
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(secs("1.5h"), 5400);
        assert_eq!(secs(".5m"), 30);
    }

    #[test]
    fn test_sub_second_units() {
        let d = parse_duration("1s300ms", now_fixed()).unwrap();
        assert_eq!(d, TimeDelta::milliseconds(1300));
        let d = parse_duration("250us", now_fixed()).unwrap();
        assert_eq!(d, TimeDelta::microseconds(250));
    }

    #[test]
    fn test_explicit_plus_sign() {
        assert_eq!(secs("+2m"), 120);
    }

    #[test]
    fn test_kitchen_time_later_today() {
        // now = 10:00:00, target = 15:04 -> same day
        assert_eq!(secs("3:04PM"), 5 * 3600 + 4 * 60);
    }

    #[test]
    fn test_kitchen_time_already_passed_rolls_to_tomorrow() {
        // now = 10:00:00, target = 09:00 -> next day
        assert_eq!(secs("9:00AM"), 23 * 3600);
        assert_eq!(secs("09:59AM"), 24 * 3600 - 60);
    }

    #[test]
    fn test_kitchen_time_midnight() {
        assert_eq!(secs("12:00AM"), 14 * 3600);
    }

    #[test]
    fn test_kitchen_time_equal_to_now_is_zero() {
        assert_eq!(secs("10:00AM"), 0);
    }

    #[test]
    fn test_kitchen_time_ignores_sub_second_now() {
        let now = NaiveTime::from_hms_milli_opt(10, 0, 0, 900).unwrap();
        let d = parse_duration("10:01AM", now).unwrap();
        assert_eq!(d, TimeDelta::seconds(60));
    }

    #[test]
    fn test_kitchen_time_passed_is_always_positive() {
        let now = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        for input in ["12:00AM", "1:30AM", "11:58PM", "6:15PM"] {
            let d = parse_duration(input, now).unwrap();
            assert!(d > TimeDelta::zero(), "{input} gave {d}");
            assert!(d < TimeDelta::days(1), "{input} gave {d}");
        }
    }

    #[test]
    fn test_kitchen_time_two_digit_hour() {
        assert_eq!(secs("03:04PM"), 5 * 3600 + 4 * 60);
    }

    #[test]
    fn test_kitchen_time_requires_exact_form() {
        for input in ["3:04pm", "3:04Pm", "3:4PM", "3:004PM", "003:04PM", "3:04 PM", ":04PM"] {
            assert!(
                parse_duration(input, now_fixed()).is_err(),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_invalid_input_carries_original_string() {
        match parse_duration("abcxyz", now_fixed()) {
            Err(Error::InvalidDuration(s)) => assert_eq!(s, "abcxyz"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_inputs() {
        for input in ["", "-5", "-1m", "5x", "1m5", "m", ".s", "12:30", "13:00PM", "1h 30m"] {
            assert!(
                parse_duration(input, now_fixed()).is_err(),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(parse_duration("9999999999999h", now_fixed()).is_err());
    }
}
