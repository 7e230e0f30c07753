//! Tests for the password wrapper.

#[test]
fn debug_is_redacted() {
    let password = watch_config::Password::from("hunter2");
    let rendered = format!("{password:?}");
    assert!(!rendered.contains("hunter2"));
    assert_eq!(rendered, "Password(<redacted>)");
}

#[test]
fn inner_value_is_reachable() {
    let password = watch_config::Password::from("hunter2".to_string());
    assert_eq!(password.as_str(), "hunter2");
}
