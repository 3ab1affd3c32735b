use super::*;

#[test]
fn accepts_within_limits() {
    let ok = validate_message(&MessageForm::new("Skylar", "happy birthday!")).unwrap();
    assert_eq!(ok.name(), "Skylar");
    assert_eq!(ok.message(), "happy birthday!");
}

#[test]
fn empty_fields_are_reported_per_field() {
    let errs = validate_message(&MessageForm::default()).unwrap_err();
    assert_eq!(errs.name.as_deref(), Some("Name cannot be empty"));
    assert_eq!(errs.message.as_deref(), Some("Message cannot be empty"));

    let errs = validate_message(&MessageForm::new("a", "")).unwrap_err();
    assert!(errs.name.is_none());
    assert!(errs.message.is_some());
}

#[test]
fn limits_are_inclusive_and_counted_in_chars() {
    let name = "é".repeat(MAX_NAME_CHARS);
    let message = "🎂".repeat(MAX_MESSAGE_CHARS);
    assert!(validate_message(&MessageForm::new(name.clone(), message.clone())).is_ok());

    let errs = validate_message(&MessageForm::new(name + "x", message + "x")).unwrap_err();
    assert_eq!(
        errs.name.as_deref(),
        Some("Name cannot be more than 50 characters")
    );
    assert_eq!(
        errs.message.as_deref(),
        Some("Message cannot be more than 400 characters")
    );
}

#[test]
fn remaining_counter_goes_negative() {
    assert_eq!(remaining_message_chars(""), 400);
    assert_eq!(remaining_message_chars("abc"), 397);
    assert_eq!(remaining_message_chars(&"x".repeat(405)), -5);
}
