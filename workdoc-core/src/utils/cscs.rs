//! CSCS card checks
//!
//! Pure helpers behind [`CardVerificationService`](crate::services::CardVerificationService):
//! card number format, model output parsing and status determination.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

use crate::types::{CardAnalysis, CardStatus, VisualAuthenticity, NOT_VISIBLE};

/// First `{` through last `}`, across lines.
static JSON_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

const CARD_NUMBER_DIGITS: std::ops::RangeInclusive<usize> = 8..=10;

/// Whether `number` looks like a CSCS card number: 8 to 10 digits once
/// spaces and hyphens are removed.
#[must_use]
pub fn validate_card_number(number: &str) -> bool {
    let digits: String = number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    CARD_NUMBER_DIGITS.contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse the model's card extraction response.
///
/// The first JSON object in `text` is read; fields that are missing, empty
/// or not strings/numbers become [`NOT_VISIBLE`]. Text without a parseable
/// object yields the all-placeholder analysis.
#[must_use]
pub fn parse_card_analysis(text: &str) -> CardAnalysis {
    let Some(block) = JSON_BLOCK.as_ref().and_then(|re| re.find(text)) else {
        log::warn!("Card analysis response contains no JSON object");
        return CardAnalysis::default();
    };

    let object = match serde_json::from_str::<Value>(block.as_str()) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return CardAnalysis::default(),
        Err(e) => {
            log::warn!("Card analysis JSON is malformed: {e}");
            return CardAnalysis::default();
        }
    };

    CardAnalysis {
        card_number: text_field(&object, &["cardNumber", "card_number"]),
        holder_name: text_field(&object, &["holderName", "holder_name", "name"]),
        card_type: text_field(&object, &["cardType", "card_type"]),
        expiry_date: text_field(&object, &["expiryDate", "expiry_date"]),
        visual_authenticity: VisualAuthenticity::from_model_output(&text_field(
            &object,
            &["visualAuthenticity", "visual_authenticity"],
        )),
        notes: text_field(&object, &["notes"]),
    }
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match object.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| NOT_VISIBLE.to_string())
}

/// Parse a printed expiry date.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and `MM/YYYY`; the last means the
/// final day of that month.
#[must_use]
pub fn parse_expiry_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Some(date);
    }

    let (month, year) = value.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    if year < 1000 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Card status from an analysis, as of `today`.
///
/// A suspicious card is invalid whatever its dates; otherwise a readable
/// expiry before `today` means expired; anything else is valid.
#[must_use]
pub fn determine_card_status(analysis: &CardAnalysis, today: NaiveDate) -> CardStatus {
    if analysis.visual_authenticity == VisualAuthenticity::Suspicious {
        return CardStatus::Invalid;
    }
    match parse_expiry_date(&analysis.expiry_date) {
        Some(expiry) if expiry < today => CardStatus::Expired,
        _ => CardStatus::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn analysis(expiry: &str, authenticity: VisualAuthenticity) -> CardAnalysis {
        CardAnalysis {
            expiry_date: expiry.to_string(),
            visual_authenticity: authenticity,
            ..CardAnalysis::default()
        }
    }

    #[test]
    fn card_number_format() {
        assert!(validate_card_number("12345678"));
        assert!(validate_card_number("1234 5678 90"));
        assert!(validate_card_number("1234-5678-9"));
        assert!(!validate_card_number("1234567"));
        assert!(!validate_card_number("12345678901"));
        assert!(!validate_card_number("1234ABCD"));
        assert!(!validate_card_number(NOT_VISIBLE));
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let text = r#"Here is what I can read:
{
  "cardNumber": "12345678",
  "holderName": "J. Smith",
  "cardType": "Green Labourer",
  "expiryDate": "2027-05-31",
  "visualAuthenticity": "genuine",
  "notes": "Hologram visible"
}
Let me know if you need anything else."#;
        let parsed = parse_card_analysis(text);
        assert_eq!(parsed.card_number, "12345678");
        assert_eq!(parsed.holder_name, "J. Smith");
        assert_eq!(parsed.card_type, "Green Labourer");
        assert_eq!(parsed.visual_authenticity, VisualAuthenticity::Genuine);
    }

    #[test]
    fn missing_and_empty_fields_use_placeholder() {
        let parsed = parse_card_analysis(r#"{"cardNumber": 87654321, "holderName": "  "}"#);
        assert_eq!(parsed.card_number, "87654321");
        assert_eq!(parsed.holder_name, NOT_VISIBLE);
        assert_eq!(parsed.expiry_date, NOT_VISIBLE);
        assert_eq!(parsed.visual_authenticity, VisualAuthenticity::Unclear);
    }

    #[test]
    fn unparseable_response_yields_placeholders() {
        assert_eq!(parse_card_analysis("I cannot read this card."), CardAnalysis::default());
        assert_eq!(parse_card_analysis("{not json}"), CardAnalysis::default());
    }

    #[test]
    fn expiry_formats() {
        assert_eq!(parse_expiry_date("2026-03-31"), Some(date(2026, 3, 31)));
        assert_eq!(parse_expiry_date("31/03/2026"), Some(date(2026, 3, 31)));
        assert_eq!(parse_expiry_date("02/2028"), Some(date(2028, 2, 29)));
        assert_eq!(parse_expiry_date("12/2026"), Some(date(2026, 12, 31)));
        assert_eq!(parse_expiry_date(NOT_VISIBLE), None);
        assert_eq!(parse_expiry_date("13/2026"), None);
    }

    #[test]
    fn past_expiry_genuine_is_expired() {
        let status = determine_card_status(
            &analysis("2020-01-31", VisualAuthenticity::Genuine),
            date(2026, 10, 17),
        );
        assert_eq!(status, CardStatus::Expired);
    }

    #[test]
    fn suspicious_is_invalid_regardless_of_dates() {
        let today = date(2026, 10, 17);
        for expiry in ["2020-01-31", "2030-01-31", NOT_VISIBLE] {
            let status =
                determine_card_status(&analysis(expiry, VisualAuthenticity::Suspicious), today);
            assert_eq!(status, CardStatus::Invalid, "{expiry}");
        }
    }

    #[test]
    fn no_negative_signals_is_valid() {
        let today = date(2026, 10, 17);
        assert_eq!(
            determine_card_status(&analysis("2030-01-31", VisualAuthenticity::Genuine), today),
            CardStatus::Valid
        );
        assert_eq!(determine_card_status(&CardAnalysis::default(), today), CardStatus::Valid);
        // expires today: still valid
        assert_eq!(
            determine_card_status(&analysis("17/10/2026", VisualAuthenticity::Unclear), today),
            CardStatus::Valid
        );
    }
}
