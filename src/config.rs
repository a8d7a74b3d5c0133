use crate::error::{QrBadgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ストレージURLの環境変数
pub const STORAGE_URL_ENV: &str = "PHILSAN_STORAGE_URL";
/// ストレージキーの環境変数
pub const STORAGE_KEY_ENV: &str = "PHILSAN_STORAGE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage_url: Option<String>,
    pub storage_key: Option<String>,
    /// Digital版の取得元バケット
    pub bucket: String,
    pub object: String,
    /// Printed版の同梱データ
    pub static_data_path: PathBuf,
    /// 画像化の倍率（1.0 = 96dpi）
    pub raster_scale: f32,
    /// 取得失敗時の再試行回数
    pub load_retries: u32,
    /// バケット取得のタイムアウト（秒）
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_url: None,
            storage_key: None,
            bucket: "philsan_json".into(),
            object: "selected_philsan_digital.json".into(),
            static_data_path: PathBuf::from("public/data/philsan_names_with_affiliations.json"),
            raster_scale: 2.0,
            load_retries: 0,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| QrBadgeError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("philsan-qr").join("config.json"))
    }

    pub fn storage_url(&self) -> Result<String> {
        // 環境変数を優先
        Self::resolve(STORAGE_URL_ENV, self.storage_url.as_deref())
    }

    pub fn storage_key(&self) -> Result<String> {
        Self::resolve(STORAGE_KEY_ENV, self.storage_key.as_deref())
    }

    fn resolve(env: &str, configured: Option<&str>) -> Result<String> {
        if let Ok(value) = std::env::var(env) {
            if !value.trim().is_empty() {
                return Ok(value);
            }
        }
        configured
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .ok_or(QrBadgeError::MissingStorageCredentials)
    }

    pub fn set_storage(&mut self, url: Option<String>, key: Option<String>) -> Result<()> {
        if let Some(url) = url {
            self.storage_url = Some(url.trim_end_matches('/').to_string());
        }
        if let Some(key) = key {
            self.storage_key = Some(key);
        }
        self.save()
    }

    /// 表示用（キーは伏せる）
    pub fn masked_key(&self) -> String {
        match self.storage_key.as_deref() {
            Some(key) if key.chars().count() > 8 => {
                format!("{}...", key.chars().take(8).collect::<String>())
            }
            Some(_) => "********".into(),
            None => "(未設定)".into(),
        }
    }
}
