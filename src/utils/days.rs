use anyhow::Result;
use std::collections::BTreeSet;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses user input like "mon,wed,fri" or "0,2,4" into weekday numbers
/// (0=Monday .. 6=Sunday). An empty input is valid and means "no days".
pub fn parse_days(input: &str) -> Result<BTreeSet<u32>> {
    let mut days = BTreeSet::new();

    for token in input.split(',') {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }

        let day = match token.as_str() {
            "mon" | "monday" => 0,
            "tue" | "tues" | "tuesday" => 1,
            "wed" | "wednesday" => 2,
            "thu" | "thurs" | "thursday" => 3,
            "fri" | "friday" => 4,
            "sat" | "saturday" => 5,
            "sun" | "sunday" => 6,
            other => match other.parse::<u32>() {
                Ok(n) if n <= 6 => n,
                _ => {
                    return Err(anyhow::anyhow!(
                        "'{}' is not a weekday. Use names like 'mon' or numbers 0-6 (0=Monday)",
                        token
                    ))
                }
            },
        };
        days.insert(day);
    }

    Ok(days)
}

/// Storage form: comma-joined weekday numbers, e.g. "0,2,4".
pub fn to_storage(days: &BTreeSet<u32>) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Display form: full day names, e.g. "Monday, Wednesday, Friday".
pub fn format_days(days: &BTreeSet<u32>) -> String {
    if days.is_empty() {
        return "no days".to_string();
    }

    days.iter()
        .filter_map(|d| DAY_NAMES.get(*d as usize))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_names_and_numbers() {
        assert_eq!(parse_days("mon,wed,fri").unwrap(), BTreeSet::from([0, 2, 4]));
        assert_eq!(parse_days("0, 2 ,4").unwrap(), BTreeSet::from([0, 2, 4]));
        assert_eq!(parse_days("Saturday,SUN").unwrap(), BTreeSet::from([5, 6]));
    }

    #[test]
    fn empty_input_means_no_days() {
        assert!(parse_days("").unwrap().is_empty());
        assert!(parse_days(" , ").unwrap().is_empty());
    }

    #[test]
    fn rejects_junk_tokens() {
        assert!(parse_days("mon,someday").is_err());
        assert!(parse_days("7").is_err());
    }

    #[test]
    fn storage_and_display_forms() {
        let days = parse_days("fri,mon").unwrap();
        assert_eq!(to_storage(&days), "0,4");
        assert_eq!(format_days(&days), "Monday, Friday");
        assert_eq!(format_days(&BTreeSet::new()), "no days");
    }
}
