//! 参加者レコードの取得元
//!
//! Printed版は同梱の静的JSON、Digital版はオブジェクトストレージのバケットから読む。
//! どちらも結果は同じ `Vec<PersonRecord>`。

mod loader;

pub use loader::{LoadState, RecordLoader};

use crate::config::Config;
use crate::error::{QrBadgeError, Result};
use crate::profile::SourceKind;
use philsan_qr_common::{parse_records, PersonRecord};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 応答待ちの既定上限
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// バケット上のJSONオブジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSource {
    pub endpoint: String,
    pub api_key: String,
    pub bucket: String,
    pub object: String,
    /// 1回の取得の上限時間（接続から本文受信まで）
    pub timeout: Duration,
}

impl BucketSource {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            bucket: bucket.into(),
            object: object.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 設定（と環境変数）から組み立てる
    pub fn from_config(config: &Config, bucket: Option<&str>, object: Option<&str>) -> Result<Self> {
        Ok(Self::new(
            config.storage_url()?,
            config.storage_key()?,
            bucket.unwrap_or(&config.bucket),
            object.unwrap_or(&config.object),
        )
        .with_timeout(Duration::from_secs(config.timeout_seconds)))
    }

    pub fn object_url(&self) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            self.object.trim_start_matches('/')
        )
    }

    async fn download(&self) -> Result<String> {
        let url = self.object_url();
        tracing::debug!(%url, "バケットからダウンロード");

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let response = client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QrBadgeError::Fetch(format!(
                "{}/{} の取得に失敗 ({}): {}",
                self.bucket, self.object, status, body
            )));
        }

        Ok(response.text().await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    StaticFile(PathBuf),
    Bucket(BucketSource),
}

impl RecordSource {
    /// レコード列を取得（順序は取得元のまま）
    pub async fn load(&self) -> Result<Vec<PersonRecord>> {
        let text = match self {
            RecordSource::StaticFile(path) => read_static(path).await?,
            RecordSource::Bucket(bucket) => bucket.download().await?,
        };
        Ok(parse_records(&text)?)
    }

    /// プロファイルの取得元種別から接続先を決める
    ///
    /// `input` があれば種別に関係なくそのローカルファイルを読む。
    pub fn for_profile(
        kind: SourceKind,
        config: &Config,
        input: Option<PathBuf>,
        bucket: Option<&str>,
        object: Option<&str>,
    ) -> Result<Self> {
        if let Some(path) = input {
            return Ok(RecordSource::StaticFile(path));
        }
        match kind {
            SourceKind::StaticFile => Ok(RecordSource::StaticFile(config.static_data_path.clone())),
            SourceKind::Bucket => Ok(RecordSource::Bucket(BucketSource::from_config(config, bucket, object)?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RecordSource::StaticFile(path) => path.display().to_string(),
            RecordSource::Bucket(bucket) => format!("{}/{}", bucket.bucket, bucket.object),
        }
    }
}

async fn read_static(path: &Path) -> Result<String> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(QrBadgeError::FileNotFound(path.display().to_string()));
    }
    Ok(tokio::fs::read_to_string(path).await?)
}
