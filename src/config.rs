//! Konfigurasi saat berjalan.
//!
//! Dibaca dari berkas TOML opsional; setiap kolom punya nilai bawaan. Dua variabel
//! lingkungan menimpa berkas: `MENTAL_CHECK_API_URL` dan `MENTAL_CHECK_LOCAL_PATH`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::Error;
use crate::store::STORAGE_KEY;

pub const API_URL_ENV: &str = "MENTAL_CHECK_API_URL";
pub const LOCAL_PATH_ENV: &str = "MENTAL_CHECK_LOCAL_PATH";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Bila false, hanya penyimpanan lokal yang dipakai.
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Berkas cadangan; bawaannya di direktori data platform.
    pub local_path: Option<PathBuf>,
    pub replay_pending: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: None,
            replay_pending: true,
        }
    }
}

impl Config {
    /// Membaca `path` bila ada, lalu menerapkan variabel lingkungan.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let mut config = match path {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(env::var(API_URL_ENV).ok(), env::var(LOCAL_PATH_ENV).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    fn apply_overrides(&mut self, api_url: Option<String>, local_path: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(path) = local_path.filter(|path| !path.trim().is_empty()) {
            self.storage.local_path = Some(PathBuf::from(path));
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn local_path(&self) -> PathBuf {
        self.storage
            .local_path
            .clone()
            .unwrap_or_else(default_local_path)
    }
}

fn default_local_path() -> PathBuf {
    let file = format!("{STORAGE_KEY}.json");
    match ProjectDirs::from("id", "sdg3", "mental_check") {
        Some(dirs) => dirs.data_dir().join(file),
        None => PathBuf::from(file),
    }
}
