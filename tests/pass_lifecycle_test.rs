use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use student_buspass::{
    compute_expiry, days_remaining, is_valid, parse_scan_payload, DisplayConfig, FixedClock,
    PassPayload, PassStatus, PlanId, RegistrationForm, Session,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 4, 15, 0).unwrap()
}

/// Register, buy a plan, and have the resulting pass accepted by a conductor.
#[test]
fn test_registered_student_buys_and_boards() -> Result<()> {
    let mut session = Session::new(FixedClock(now()));
    session.register(RegistrationForm {
        name: "Ravi Kumar".to_string(),
        student_id: "STU2024042".to_string(),
        email: "ravi@example.com".to_string(),
        school: "Kendriya Vidyalaya".to_string(),
        class_year: "Grade 10".to_string(),
        mobile: "+91 9123456789".to_string(),
        password: "bus-pass".to_string(),
        confirm_password: "bus-pass".to_string(),
    })?;

    let display = DisplayConfig::default();
    let before = session.dashboard(&display)?;
    assert_eq!(before.status, PassStatus::Inactive);
    assert!(!parse_scan_payload(&before.payload, now(), &display).valid);

    session.show_plans()?;
    session.purchase("quarterly")?;

    let after = session.dashboard(&display)?;
    assert_eq!(after.status, PassStatus::Active);
    assert_eq!(after.days_left, 90);
    assert_eq!(after.plan, "Quarterly");

    let verdict = parse_scan_payload(&after.payload, now() + Duration::days(89), &display);
    assert!(verdict.valid);
    assert_eq!(verdict.student_name, "Ravi Kumar");
    assert_eq!(verdict.student_id, "STU2024042");
    assert_eq!(verdict.school, "Kendriya Vidyalaya");

    let lapsed = parse_scan_payload(&after.payload, now() + Duration::days(90), &display);
    assert!(!lapsed.valid);
    assert_eq!(lapsed.student_name, "Ravi Kumar");

    Ok(())
}

#[test]
fn test_expiry_is_exact_for_every_plan() {
    for plan in PlanId::ALL {
        let expiry = compute_expiry(plan.as_str(), now());
        assert_eq!(expiry - now(), Duration::days(plan.plan().duration_days));
        assert!(is_valid(Some(expiry), now()));
        assert_eq!(
            days_remaining(Some(expiry), now()),
            plan.plan().duration_days
        );
    }
}

#[test]
fn test_payload_verdicts() -> Result<()> {
    let display = DisplayConfig::default();

    let future = PassPayload::new("STU1", "A", "S", Some(now() + Duration::days(15)), now());
    let result = parse_scan_payload(&future.encode()?, now(), &display);
    assert!(result.valid);
    assert_eq!(result.student_name, "A");

    let past = format!(
        r#"{{"studentId":"STU1","name":"A","school":"S","validTill":"{}"}}"#,
        (now() - Duration::days(5)).to_rfc3339()
    );
    assert!(!parse_scan_payload(&past, now(), &display).valid);

    let garbage = parse_scan_payload("not json", now(), &display);
    assert!(!garbage.valid);
    assert_eq!(garbage.student_name, "Invalid QR Code");
    assert_eq!(garbage.student_id, "N/A");
    assert_eq!(garbage.school, "N/A");

    Ok(())
}
