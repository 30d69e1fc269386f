use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Formats tried when a literal does not match the configured one.
const FALLBACK_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A gantt `dateFormat` pattern (`YYYY-MM-DD` style) and its chrono equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat {
    pattern: String,
    chrono_format: String,
    display_format: String,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: "YYYY-MM-DD".to_string(),
            chrono_format: "%Y-%m-%d".to_string(),
            display_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl DateFormat {
    /// Converts a pattern made of `YYYY YY MM M DD D` tokens and separators.
    pub fn from_pattern(pattern: &str) -> Result<Self, String> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err("empty date format".to_string());
        }

        let mut chrono_format = String::new();
        let mut display_format = String::new();
        let (mut has_year, mut has_month, mut has_day) = (false, false, false);
        let chars: Vec<char> = pattern.chars().collect();
        let mut idx = 0;

        while idx < chars.len() {
            let c = chars[idx];
            let run = chars[idx..].iter().take_while(|&&other| other == c).count();
            match (c, run) {
                ('Y', 4) => {
                    chrono_format.push_str("%Y");
                    display_format.push_str("%Y");
                    has_year = true;
                }
                ('Y', 2) => {
                    chrono_format.push_str("%y");
                    display_format.push_str("%y");
                    has_year = true;
                }
                ('M', 1 | 2) => {
                    chrono_format.push_str("%m");
                    display_format.push_str(if run == 2 { "%m" } else { "%-m" });
                    has_month = true;
                }
                ('D', 1 | 2) => {
                    chrono_format.push_str("%d");
                    display_format.push_str(if run == 2 { "%d" } else { "%-d" });
                    has_day = true;
                }
                ('-' | '/' | '.' | ' ' | '_', _) => {
                    for _ in 0..run {
                        chrono_format.push(c);
                        display_format.push(c);
                    }
                }
                _ => {
                    let token: String = chars[idx..idx + run].iter().collect();
                    return Err(format!("unsupported token '{token}' in date format '{pattern}'"));
                }
            }
            idx += run;
        }

        if !(has_year && has_month && has_day) {
            return Err(format!(
                "date format '{pattern}' must contain a year, a month and a day"
            ));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            chrono_format,
            display_format,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }

    pub fn parse(&self, input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, &self.chrono_format)
            .ok()
            .or_else(|| {
                FALLBACK_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
            })
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.display_format).to_string()
    }
}

impl TryFrom<String> for DateFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_pattern(&value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_is_iso() {
        let fmt = DateFormat::default();
        assert_eq!(fmt.parse("2024-01-31"), Some(d(2024, 1, 31)));
        assert_eq!(fmt.format(d(2024, 1, 5)), "2024-01-05");
    }

    #[test]
    fn day_first_pattern() {
        let fmt = DateFormat::from_pattern("DD/MM/YYYY").unwrap();
        assert_eq!(fmt.chrono_format(), "%d/%m/%Y");
        assert_eq!(fmt.parse("05/03/2024"), Some(d(2024, 3, 5)));
        assert_eq!(fmt.format(d(2024, 3, 5)), "05/03/2024");
    }

    #[test]
    fn iso_literals_still_parse_under_custom_format() {
        let fmt = DateFormat::from_pattern("DD.MM.YYYY").unwrap();
        assert_eq!(fmt.parse("2024-03-05"), Some(d(2024, 3, 5)));
    }

    #[test]
    fn rejects_time_tokens_and_partial_dates() {
        assert!(DateFormat::from_pattern("YYYY-MM-DD HH:mm").is_err());
        assert!(DateFormat::from_pattern("YYYY-MM").is_err());
        assert!(DateFormat::from_pattern("").is_err());
    }

    #[test]
    fn invalid_calendar_date_does_not_parse() {
        assert_eq!(DateFormat::default().parse("2024-02-30"), None);
    }
}
