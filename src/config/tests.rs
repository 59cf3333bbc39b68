use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
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
            .join("vivace")
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
            .join("vivace")
            .join("config.toml")
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
[audio]
volume = 0.5
fft_size = 512
smoothing = 0.6
min_db = -90.0
max_db = -20.0
eq_gains_db = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]

[ui]
header_text = "hello"
refresh_hz = 30

[controls]
volume_step = 0.1
band_step_db = 2.0

[library]
extensions = ["mp3"]
recursive = false
follow_links = false
max_depth = 2
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.validate().is_ok());
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.fft_size, 512);
    assert_eq!(s.audio.smoothing, 0.6);
    assert_eq!(s.audio.min_db, -90.0);
    assert_eq!(s.audio.max_db, -20.0);
    assert_eq!(s.audio.eq_gains_db[0], 1.0);
    assert_eq!(s.audio.eq_gains_db[9], -1.0);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.refresh_hz, 30);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.controls.band_step_db, 2.0);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(2));
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
volume = 1.0
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__AUDIO__VOLUME", "0.25");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 0.25);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.fft_size = 100;
    assert!(s.validate().is_err());
    s.audio.fft_size = 256;

    s.audio.smoothing = 1.0;
    assert!(s.validate().is_err());
    s.audio.smoothing = 0.8;

    s.audio.min_db = -10.0;
    assert!(s.validate().is_err());
    s.audio.min_db = -100.0;

    s.audio.eq_gains_db = vec![0.0; 3];
    assert!(s.validate().is_err());
    s.audio.eq_gains_db = vec![0.0; 10];

    s.ui.refresh_hz = 0;
    assert!(s.validate().is_err());
    s.ui.refresh_hz = 60;

    assert!(s.validate().is_ok());
}
