//! Date helper functions

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Locale, TimeZone};
use chrono_tz::Tz;
use std::fmt::Display;

use crate::config::SiteConfig;

/// Resolve a language tag such as `pt-BR` to a chrono locale
///
/// A bare `pt` means Brazilian Portuguese; unknown tags fall back to en-US.
pub fn locale_for(tag: &str) -> Locale {
    let tag = tag.replace('-', "_");
    let normalized = match tag.split_once('_') {
        Some((base, region)) => format!("{}_{}", base.to_lowercase(), region.to_uppercase()),
        None if tag.eq_ignore_ascii_case("pt") => "pt_BR".to_string(),
        None => tag.to_lowercase(),
    };
    Locale::try_from(normalized.as_str()).unwrap_or(Locale::en_US)
}

/// Parse an API timestamp
///
/// Accepts RFC 3339 as well as Prismic's `2021-03-15T19:25:28+0000`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Format a date using date-fns style tokens
///
/// # Examples
/// ```ignore
/// format_date(&date, "d MMM yyyy", Locale::pt_BR) // -> "15 mar 2021"
/// ```
pub fn format_date<Tz2: TimeZone>(date: &DateTime<Tz2>, pattern: &str, locale: Locale) -> String
where
    Tz2::Offset: Display,
{
    let chrono_format = date_fns_to_chrono_format(pattern);
    date.format_localized(&chrono_format, locale).to_string()
}

/// Convert a date-fns format string to a chrono one
fn date_fns_to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Quoted literal, '' is an escaped quote
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        let mut run = 1;
        while c.is_ascii_alphabetic() && i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let specifier = match (c, run) {
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
                i += run;
                continue;
            }
        };
        out.push_str(specifier);
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Formats publication timestamps for display
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
    locale: Locale,
    timezone: Tz,
}

impl DateFormatter {
    pub fn new(pattern: &str, locale: Locale, timezone: Tz) -> Self {
        Self {
            pattern: pattern.to_string(),
            locale,
            timezone,
        }
    }

    /// Build from the site's `date_format`, `language` and `timezone`
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let name = if config.timezone.is_empty() {
            "UTC"
        } else {
            config.timezone.as_str()
        };
        let timezone: Tz = name
            .parse()
            .map_err(|_| anyhow!("Unknown timezone: {}", name))?;

        Ok(Self::new(
            &config.date_format,
            locale_for(&config.language),
            timezone,
        ))
    }

    /// Display string for a raw timestamp; empty when absent or invalid
    pub fn format(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        match parse_timestamp(raw) {
            Some(date) => format_date(
                &date.with_timezone(&self.timezone),
                &self.pattern,
                self.locale,
            ),
            None => {
                tracing::warn!("Unparseable publication date: {}", raw);
                String::new()
            }
        }
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new("d MMM yyyy", Locale::pt_BR, Tz::UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date_pt_br() {
        let date = Utc.with_ymd_and_hms(2021, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "d MMM yyyy", Locale::pt_BR), "15 mar 2021");
        assert_eq!(
            format_date(&date, "d 'de' MMMM 'de' yyyy", Locale::pt_BR),
            "15 de março de 2021"
        );
        assert_eq!(format_date(&date, "dd/MM/yy", Locale::pt_BR), "15/03/21");
    }

    #[test]
    fn test_format_date_single_digit_day() {
        let date = Utc.with_ymd_and_hms(2021, 2, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "d MMM yyyy", Locale::pt_BR), "5 fev 2021");
        assert_eq!(format_date(&date, "d MMM yyyy", Locale::en_US), "5 Feb 2021");
    }

    #[test]
    fn test_all_short_months() {
        let expected = [
            "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
        ];
        for (i, name) in expected.iter().enumerate() {
            let date = Utc.with_ymd_and_hms(2020, i as u32 + 1, 1, 12, 0, 0).unwrap();
            assert_eq!(format_date(&date, "MMM", Locale::pt_BR), *name);
        }
    }

    #[test]
    fn test_time_tokens() {
        let date = Utc.with_ymd_and_hms(2021, 3, 15, 9, 5, 7).unwrap();
        assert_eq!(format_date(&date, "HH:mm:ss", Locale::en_US), "09:05:07");
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2021-03-15T00:00:00Z").is_some());
        assert!(parse_timestamp("2021-03-15T19:25:28+0000").is_some());
        assert!(parse_timestamp("2021-03-15T19:25:28.123+00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_formatter_is_deterministic() {
        let formatter = DateFormatter::default();
        assert_eq!(formatter.format(Some("2021-03-15T00:00:00Z")), "15 mar 2021");
        assert_eq!(formatter.format(Some("2021-03-15T00:00:00Z")), "15 mar 2021");
        assert_eq!(formatter.format(Some("2021-03-15T19:25:28+0000")), "15 mar 2021");
        assert_eq!(formatter.format(None), "");
        assert_eq!(formatter.format(Some("garbage")), "");
    }

    #[test]
    fn test_formatter_timezone() {
        let mut config = SiteConfig::default();
        config.timezone = "America/Sao_Paulo".to_string();
        let formatter = DateFormatter::from_config(&config).unwrap();
        // 01:00 UTC is still the previous day in São Paulo
        assert_eq!(formatter.format(Some("2021-03-15T01:00:00Z")), "14 mar 2021");

        config.timezone = "Mars/Olympus".to_string();
        assert!(DateFormatter::from_config(&config).is_err());
    }

    #[test]
    fn test_locale_for() {
        assert!(locale_for("pt-BR") == Locale::pt_BR);
        assert!(locale_for("pt_br") == Locale::pt_BR);
        assert!(locale_for("pt") == Locale::pt_BR);
        assert!(locale_for("fr-FR") == Locale::fr_FR);
        assert!(locale_for("en") == Locale::en_US);
    }

    #[test]
    fn test_chrono_format_translation() {
        assert_eq!(date_fns_to_chrono_format("d MMM yyyy"), "%-d %b %Y");
        assert_eq!(date_fns_to_chrono_format("dd/MM/yy HH:mm"), "%d/%m/%y %H:%M");
        assert_eq!(date_fns_to_chrono_format("d 'de' MMMM"), "%-d de %B");
        assert_eq!(date_fns_to_chrono_format("'100%' yyyy"), "100%% %Y");
    }
}
