use crate::config::{DisplayConfig, ScannerConfig};
use crate::core::validity::is_valid;
use crate::domain::model::{ScanResult, Student};
use crate::domain::ports::Clock;
use crate::utils::error::{PassError, Result};
use crate::utils::validation::parse_timestamp;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const INVALID_NAME: &str = "Invalid QR Code";
const PLACEHOLDER: &str = "N/A";

/// Contents of a pass QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    pub student_id: String,
    pub name: String,
    pub school: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_till: Option<String>,
    /// Generation time in epoch milliseconds.
    pub timestamp: i64,
}

impl PassPayload {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        school: impl Into<String>,
        valid_till: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            school: school.into(),
            valid_till: valid_till.map(iso_timestamp),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn for_student(student: &Student, now: DateTime<Utc>) -> Self {
        Self::new(
            student.id.as_str(),
            student.name.as_str(),
            student.school.as_str(),
            student.valid_till,
            now,
        )
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// All fields optional; `decode` reports which one is missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScannedPayload {
    student_id: Option<String>,
    name: Option<String>,
    school: Option<String>,
    valid_till: Option<String>,
}

struct ScannedPass {
    student_id: String,
    name: String,
    school: String,
    valid_till: DateTime<Utc>,
}

fn decode(text: &str) -> Result<ScannedPass> {
    let raw: ScannedPayload = serde_json::from_str(text)?;
    let missing = |field: &str| PassError::MissingField {
        field: field.to_string(),
    };
    let valid_till = raw.valid_till.ok_or_else(|| missing("validTill"))?;
    Ok(ScannedPass {
        student_id: raw.student_id.ok_or_else(|| missing("studentId"))?,
        name: raw.name.ok_or_else(|| missing("name"))?,
        school: raw.school.ok_or_else(|| missing("school"))?,
        valid_till: parse_timestamp(&valid_till)?,
    })
}

fn invalid_result(scan_time: String) -> ScanResult {
    ScanResult {
        valid: false,
        student_name: INVALID_NAME.to_string(),
        student_id: PLACEHOLDER.to_string(),
        school: PLACEHOLDER.to_string(),
        valid_till: PLACEHOLDER.to_string(),
        scan_time,
    }
}

/// Turns scanned text into a verdict. Never fails: anything that is not a
/// complete pass payload becomes an invalid result with placeholder fields.
pub fn parse_scan_payload(text: &str, now: DateTime<Utc>, display: &DisplayConfig) -> ScanResult {
    let scan_time = display.format_time(now);
    match decode(text) {
        Ok(pass) => ScanResult {
            valid: is_valid(Some(pass.valid_till), now),
            student_name: pass.name,
            student_id: pass.student_id,
            school: pass.school,
            valid_till: display.format_date(pass.valid_till),
            scan_time,
        },
        Err(e) => {
            tracing::debug!("Rejecting scanned payload: {}", e);
            invalid_result(scan_time)
        }
    }
}

/// Payload the demo "camera" always reads: a pass valid for 15 more days.
pub fn camera_fixture(now: DateTime<Utc>) -> PassPayload {
    PassPayload::new(
        "STU2024001",
        "John Doe",
        "Delhi Public School",
        Some(now + Duration::days(15)),
        now,
    )
}

/// Conductor-side scanner keeping a bounded, newest-first scan history.
pub struct Scanner<C: Clock> {
    clock: C,
    display: DisplayConfig,
    history_limit: usize,
    history: VecDeque<ScanResult>,
}

impl<C: Clock> Scanner<C> {
    pub fn new(clock: C, display: DisplayConfig, config: &ScannerConfig) -> Self {
        let history_limit = config.history_limit.max(1);
        Self {
            clock,
            display,
            history_limit,
            history: VecDeque::with_capacity(history_limit),
        }
    }

    /// Validates text typed or pasted by the conductor.
    pub fn scan_manual(&mut self, code: &str) -> Result<ScanResult> {
        if code.trim().is_empty() {
            return Err(PassError::validation("Please enter a QR code"));
        }
        let result = parse_scan_payload(code, self.clock.now(), &self.display);
        Ok(self.record(result))
    }

    pub fn scan_camera(&mut self) -> Result<ScanResult> {
        let now = self.clock.now();
        let payload = camera_fixture(now).encode()?;
        let result = parse_scan_payload(&payload, now, &self.display);
        Ok(self.record(result))
    }

    fn record(&mut self, result: ScanResult) -> ScanResult {
        if result.valid {
            tracing::info!("✅ Valid pass - {}", result.student_name);
        } else {
            tracing::warn!("❌ Invalid pass - {}", result.student_name);
        }
        self.history.push_front(result.clone());
        self.history.truncate(self.history_limit);
        result
    }

    pub fn last_result(&self) -> Option<&ScanResult> {
        self.history.front()
    }

    /// Most recent scan first.
    pub fn history(&self) -> impl Iterator<Item = &ScanResult> {
        self.history.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixedClock;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap()
    }

    fn utc_display() -> DisplayConfig {
        DisplayConfig {
            utc_offset_minutes: 0,
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M:%S".to_string(),
        }
    }

    fn payload_with_expiry(valid_till: DateTime<Utc>) -> String {
        format!(
            r#"{{"studentId":"STU1","name":"A","school":"S","validTill":"{}"}}"#,
            iso_timestamp(valid_till)
        )
    }

    #[test]
    fn test_not_json_is_invalid_placeholder() {
        let result = parse_scan_payload("not json", now(), &utc_display());

        assert_eq!(result, invalid_result("06:00:00".to_string()));
        assert_eq!(result.student_name, "Invalid QR Code");
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let text = payload_with_expiry(now() + Duration::days(15));
        let result = parse_scan_payload(&text, now(), &utc_display());

        assert!(result.valid);
        assert_eq!(result.student_name, "A");
        assert_eq!(result.student_id, "STU1");
        assert_eq!(result.school, "S");
        assert_eq!(result.valid_till, "2026-11-02");
        assert_eq!(result.scan_time, "06:00:00");
    }

    #[test]
    fn test_past_expiry_is_invalid_but_keeps_details() {
        let text = payload_with_expiry(now() - Duration::days(5));
        let result = parse_scan_payload(&text, now(), &utc_display());

        assert!(!result.valid);
        assert_eq!(result.student_name, "A");
        assert_eq!(result.valid_till, "2026-10-13");
    }

    #[test]
    fn test_offsetless_iso_expiry_keeps_details() {
        for valid_till in [
            "2030-01-01",
            "2030-01-01T00:00:00",
            "2030-01-01T00:00Z",
        ] {
            let text = format!(
                r#"{{"studentId":"STU1","name":"A","school":"S","validTill":"{}"}}"#,
                valid_till
            );
            let result = parse_scan_payload(&text, now(), &utc_display());

            assert!(result.valid, "{}", valid_till);
            assert_eq!(result.student_name, "A", "{}", valid_till);
            assert_eq!(result.valid_till, "2030-01-01", "{}", valid_till);
        }

        let lapsed = r#"{"studentId":"STU1","name":"A","school":"S","validTill":"2026-10-13"}"#;
        let result = parse_scan_payload(lapsed, now(), &utc_display());
        assert!(!result.valid);
        assert_eq!(result.student_id, "STU1");
    }

    #[test]
    fn test_bad_display_format_still_yields_verdict() {
        let display = DisplayConfig {
            utc_offset_minutes: 0,
            date_format: "%Q".to_string(),
            time_format: "%Q".to_string(),
        };

        let garbage = parse_scan_payload("not json", now(), &display);
        assert!(!garbage.valid);
        assert_eq!(garbage.scan_time, "6:00:00 am");

        let text = payload_with_expiry(now() + Duration::days(15));
        let result = parse_scan_payload(&text, now(), &display);
        assert!(result.valid);
        assert_eq!(result.valid_till, "02/11/2026");
    }

    #[test]
    fn test_missing_or_bad_fields_are_invalid_placeholder() {
        let cases = [
            r#"{"studentId":"STU1","name":"A","school":"S"}"#,
            r#"{"name":"A","school":"S","validTill":"2030-01-01T00:00:00Z"}"#,
            r#"{"studentId":"STU1","name":null,"school":"S","validTill":"2030-01-01T00:00:00Z"}"#,
            r#"{"studentId":"STU1","name":"A","school":"S","validTill":"someday"}"#,
            r#"{"studentId":42,"name":"A","school":"S","validTill":"2030-01-01T00:00:00Z"}"#,
            "[]",
            "",
        ];
        for text in cases {
            let result = parse_scan_payload(text, now(), &utc_display());
            assert!(!result.valid, "{}", text);
            assert_eq!(result.student_name, "Invalid QR Code", "{}", text);
            assert_eq!(result.valid_till, "N/A", "{}", text);
        }
    }

    #[test]
    fn test_payload_encoding_is_scannable() {
        let payload = PassPayload::new("STU9", "B", "T", Some(now() + Duration::days(30)), now());
        let text = payload.encode().unwrap();

        assert!(text.contains(r#""validTill":"2026-11-17T06:00:00.000Z""#));
        assert!(text.contains(&format!(r#""timestamp":{}"#, now().timestamp_millis())));
        assert!(parse_scan_payload(&text, now(), &utc_display()).valid);
    }

    #[test]
    fn test_payload_without_pass_omits_expiry() {
        let text = PassPayload::new("STU9", "B", "T", None, now()).encode().unwrap();

        assert!(!text.contains("validTill"));
        assert!(!parse_scan_payload(&text, now(), &utc_display()).valid);
    }

    #[test]
    fn test_camera_scan_uses_fixture() {
        let mut scanner = Scanner::new(FixedClock(now()), utc_display(), &ScannerConfig::default());
        let result = scanner.scan_camera().unwrap();

        assert!(result.valid);
        assert_eq!(result.student_id, "STU2024001");
        assert_eq!(result.student_name, "John Doe");
        assert_eq!(result.school, "Delhi Public School");
        assert_eq!(scanner.last_result(), Some(&result));
    }

    #[test]
    fn test_blank_manual_code_is_rejected() {
        let mut scanner = Scanner::new(FixedClock(now()), utc_display(), &ScannerConfig::default());

        assert!(matches!(
            scanner.scan_manual("   "),
            Err(PassError::ValidationError { .. })
        ));
        assert_eq!(scanner.history().count(), 0);
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let config = ScannerConfig { history_limit: 3 };
        let mut scanner = Scanner::new(FixedClock(now()), utc_display(), &config);

        for i in 0..5 {
            let text = format!(
                r#"{{"studentId":"STU{}","name":"N{}","school":"S","validTill":"2030-01-01T00:00:00Z"}}"#,
                i, i
            );
            scanner.scan_manual(&text).unwrap();
        }

        let ids: Vec<&str> = scanner.history().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["STU4", "STU3", "STU2"]);
    }
}
