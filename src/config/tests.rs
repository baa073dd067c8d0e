use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cortex_fm_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CORTEX_FM_CONFIG_PATH", "/tmp/cortex-fm-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cortex-fm-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cortex-fm")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cortex-fm")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.audio.quit_fade_out_ms, 500);
    assert_eq!(s.audio.tick_ms, 250);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert!(s.ui.follow_playback);
    assert_eq!(
        s.ui.mood_presets,
        vec!["Chill Vibes", "Late Night Coding", "Workout Hits"]
    );
    assert_eq!(s.ui.track_fields, vec![TrackField::Title, TrackField::Artist]);
    assert_eq!(s.library.extensions.len(), 7);
    assert_eq!(s.generator.model, "gemini-2.5-flash");
    assert_eq!(s.generator.track_count, 8);
    assert_eq!(s.logging.level, "info");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_values_and_empty_extensions() {
    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().unwrap_err().contains("tick_ms"));

    let mut s = Settings::default();
    s.generator.track_count = 0;
    assert!(s.validate().unwrap_err().contains("track_count"));

    let mut s = Settings::default();
    s.generator.timeout_secs = 0;
    assert!(s.validate().unwrap_err().contains("timeout_secs"));

    let mut s = Settings::default();
    s.library.extensions = vec![" ".to_string(), ".".to_string()];
    assert!(s.validate().unwrap_err().contains("extensions"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 750
tick_ms = 100

[controls]
scrub_seconds = 15

[ui]
follow_playback = false
header_text = "late night radio"
mood_presets = ["Rainy Sunday"]
track_fields = ["artist", "title", "source"]
track_separator = " • "

[library]
extensions = ["flac", "opus"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[generator]
api_key = "k-123"
model = "gemini-2.0-flash"
track_count = 5

[logging]
level = "debug"
file = "/tmp/cortex-fm-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CORTEX_FM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CORTEX_FM__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 750);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 15);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "late night radio");
    assert_eq!(s.ui.mood_presets, vec!["Rainy Sunday".to_string()]);
    assert_eq!(
        s.ui.track_fields,
        vec![TrackField::Artist, TrackField::Title, TrackField::Origin]
    );
    assert_eq!(s.ui.track_separator, " • ");
    assert_eq!(s.library.extensions, vec!["flac".to_string(), "opus".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.generator.resolve_api_key().as_deref(), Some("k-123"));
    assert_eq!(s.generator.model, "gemini-2.0-flash");
    assert_eq!(s.generator.track_count, 5);
    assert_eq!(s.generator.timeout_secs, 30);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.resolve_file(),
        std::path::PathBuf::from("/tmp/cortex-fm-test.log")
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 400
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CORTEX_FM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CORTEX_FM__AUDIO__TICK_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 50);
}

#[test]
fn api_key_falls_back_to_named_environment_variable() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CORTEX_FM_TEST_KEY", "  from-env  ");

    let mut generator = GeneratorSettings {
        api_key_env: "CORTEX_FM_TEST_KEY".to_string(),
        ..GeneratorSettings::default()
    };
    assert_eq!(generator.resolve_api_key().as_deref(), Some("from-env"));

    generator.api_key = Some("explicit".to_string());
    assert_eq!(generator.resolve_api_key().as_deref(), Some("explicit"));

    let _g2 = EnvGuard::set("CORTEX_FM_TEST_KEY", "   ");
    generator.api_key = None;
    assert_eq!(generator.resolve_api_key(), None);
}
