use super::*;

#[test]
fn accepts_up_to_limit_and_counts_chars_not_bytes() {
    let m = Message::new("é".repeat(25)).unwrap();
    assert_eq!(m.len_chars(), 25);
    assert_eq!(m.remaining(), 0);
    assert!(Message::new("x".repeat(26)).is_err());
}

#[test]
fn overlong_message_reports_limit() {
    let err = Message::new("x".repeat(30)).unwrap_err();
    assert_eq!(err.user_message(), "Message cannot exceed 25 characters.");
}

#[test]
fn alert_bands() {
    assert_eq!(LengthAlert::for_length(18, 25), None);
    assert_eq!(
        LengthAlert::for_length(19, 25),
        Some(LengthAlert::Warning { remaining: 6 })
    );
    assert_eq!(
        LengthAlert::for_length(22, 25),
        Some(LengthAlert::Warning { remaining: 3 })
    );
    assert_eq!(
        LengthAlert::for_length(23, 25),
        Some(LengthAlert::Critical { remaining: 2 })
    );
    assert_eq!(
        LengthAlert::for_length(24, 25),
        Some(LengthAlert::Critical { remaining: 1 })
    );
    assert_eq!(LengthAlert::for_length(25, 25), Some(LengthAlert::LimitReached));
}

#[test]
fn empty_message_has_no_alert() {
    let m = Message::default();
    assert!(m.is_empty());
    assert_eq!(m.alert(), None);
}
