use super::*;

#[test]
fn lookup_falls_back_to_english() {
    assert_eq!(catalog("fr").locale, Locale::Fr);
    assert_eq!(catalog("fr-CA").locale, Locale::Fr);
    assert_eq!(catalog("de").locale, Locale::En);
    assert_eq!(catalog("").locale, Locale::En);
}

#[test]
fn busy_messages_are_localized() {
    assert_eq!(catalog("en").busy.transforming, "Transforming image...");
    assert_eq!(catalog("en").busy.generating, "Generating PDF...");
    assert_ne!(catalog("fr").busy.generating, catalog("en").busy.generating);
}

#[test]
fn error_toast_prefixes_message() {
    assert_eq!(EN.error_toast("Test error"), "Error: Test error");
    assert!(FR.error_toast("Test error").contains("Test error"));
}

#[test]
fn selection_rejections_map_to_warnings() {
    assert_eq!(
        EN.selection_message(&SelectionRejected::MultipleFiles(2)),
        EN.image_form.too_many_files
    );
    assert_eq!(
        EN.selection_message(&SelectionRejected::Unreadable("x.png".into())),
        EN.image_form.unreadable_file
    );
}

#[test]
fn length_hint_switches_at_limit() {
    assert_eq!(EN.length_hint(3, Some(LengthAlert::Warning { remaining: 3 })), "3 characters left");
    assert_eq!(EN.length_hint(0, Some(LengthAlert::LimitReached)), "Character limit reached");
}
