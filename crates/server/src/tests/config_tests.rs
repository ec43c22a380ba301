use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_bind_locally_and_use_uploads_dir() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.upload_dir, PathBuf::from("uploads"));
}

#[test]
fn settings_file_overrides_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
bind_addr = "0.0.0.0:8080"
upload_dir = "/srv/papers"
max_upload_bytes = 1024
"#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.upload_dir, PathBuf::from("/srv/papers"));
    assert_eq!(settings.max_upload_bytes, 1024);
}

#[test]
fn unparseable_settings_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = ");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("UPLOAD_DIR", "papers"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.upload_dir, PathBuf::from("papers"));
}

#[test]
fn invalid_upload_limit_keeps_default() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[("APP__MAX_UPLOAD_BYTES", "lots")]),
    );
    assert_eq!(settings.max_upload_bytes, Settings::default().max_upload_bytes);
}
