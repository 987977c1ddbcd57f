use super::load::{default_config_path, default_state_dir, resolve_config_path};
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
fn resolve_config_path_prefers_folio_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("FOLIO_CONFIG_PATH", "/tmp/folio-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/folio-test-config.toml")
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
            .join("folio")
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
            .join("folio")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_state_dir(),
        std::path::PathBuf::from("/tmp/xdg-state").join("folio")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
root_url = "http://music.local/albums/"
extensions = ["mp3", "ogg"]
default_album = "ncs"
request_timeout_secs = 3

[audio]
initial_volume = 40
unmute_fallback_volume = 25
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9
volume_step = 10

[ui]
header_text = "hello"
show_albums_on_start = false
track_attribution = "Various"

[playback]
auto_advance = true

[logging]
directory = "/tmp/folio-logs"
filter = "warn"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("FOLIO__CATALOG__ROOT_URL");
    let _g2 = EnvGuard::remove("FOLIO__AUDIO__INITIAL_VOLUME");

    let s = Settings::load_from(Some(cfg_path)).unwrap();
    assert_eq!(s.catalog.root_url, "http://music.local/albums/");
    assert_eq!(s.catalog.extensions, vec!["mp3".to_string(), "ogg".to_string()]);
    assert_eq!(s.catalog.default_album.as_deref(), Some("ncs"));
    assert_eq!(s.catalog.request_timeout_secs, 3);
    assert_eq!(s.catalog.info_file, "info.json");
    assert_eq!(s.audio.initial_volume, 40);
    assert_eq!(s.audio.unmute_fallback_volume, 25);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_albums_on_start);
    assert_eq!(s.ui.track_attribution, "Various");
    assert!(s.playback.auto_advance);
    assert_eq!(
        s.logging.directory,
        Some(std::path::PathBuf::from("/tmp/folio-logs"))
    );
    assert_eq!(s.logging.filter, "warn");
    assert!(s.validate().is_ok());
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
initial_volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("FOLIO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("FOLIO__AUDIO__INITIAL_VOLUME", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 30);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::remove("FOLIO__AUDIO__INITIAL_VOLUME");

    let s = Settings::load_from(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.audio.initial_volume, 100);
    assert_eq!(s.audio.unmute_fallback_volume, 10);
    assert_eq!(s.catalog.extensions, vec!["mp3".to_string()]);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.catalog.root_url = "not a url".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.catalog.extensions = vec![" . ".to_string()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.unmute_fallback_volume = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0;
    assert!(s.validate().is_err());
}
