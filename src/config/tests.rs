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
fn resolve_config_path_prefers_halo_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("HALO_CONFIG_PATH", "/tmp/halo-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/halo-test-config.toml")
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
            .join("halo")
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
            .join("halo")
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
[playlist]
path = "mylist.toml"
asset_dir = "media"

[visualizer]
bins = 1024
smoothing = 0.5

[ui]
header_text = "hello"
show_controls = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HALO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("HALO__VISUALIZER__BINS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playlist.path, std::path::PathBuf::from("mylist.toml"));
    assert_eq!(s.playlist.asset_dir, std::path::PathBuf::from("media"));
    assert_eq!(s.visualizer.bins, 1024);
    assert_eq!(s.visualizer.smoothing, 0.5);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_controls);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[visualizer]
bins = 1024
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HALO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("HALO__VISUALIZER__BINS", "512");

    let s = Settings::load().unwrap();
    assert_eq!(s.visualizer.bins, 512);
}

#[test]
fn validate_rejects_bad_visualizer_settings() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.visualizer.bins = 128;
    assert!(s.validate().is_err());

    s.visualizer.bins = 512;
    s.visualizer.smoothing = 1.0;
    assert!(s.validate().is_err());
}
