//! 取得状態の管理と再試行

use super::RecordSource;
use crate::error::Result;
use philsan_qr_common::PersonRecord;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// 取得件数
    Loaded(usize),
    Failed(String),
}

pub struct RecordLoader {
    source: RecordSource,
    retries: u32,
    base_delay: Duration,
    state: LoadState,
}

impl RecordLoader {
    pub fn new(source: RecordSource) -> Self {
        Self {
            source,
            retries: 0,
            base_delay: Duration::from_millis(500),
            state: LoadState::Idle,
        }
    }

    /// 失敗時の再試行回数（待ち時間は毎回倍）
    pub fn with_retries(mut self, retries: u32, base_delay: Duration) -> Self {
        self.retries = retries;
        self.base_delay = base_delay;
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    pub async fn load(&mut self) -> Result<Vec<PersonRecord>> {
        self.state = LoadState::Loading;
        let mut attempt = 0;

        loop {
            match self.source.load().await {
                Ok(records) => {
                    self.state = LoadState::Loaded(records.len());
                    tracing::info!(count = records.len(), source = %self.source.describe(), "レコードを取得しました");
                    return Ok(records);
                }
                Err(e) if attempt < self.retries => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "取得に失敗、{:?}後に再試行", delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    self.state = LoadState::Failed(e.to_string());
                    return Err(e);
                }
            }
        }
    }

    /// 失敗時は空リスト（状態は Failed のまま残る）
    pub async fn load_or_empty(&mut self) -> Vec<PersonRecord> {
        match self.load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(source = %self.source.describe(), error = %e, "レコードの取得に失敗しました");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_state_transitions_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"[{"Name": "A", "Email": "a@x.com"}]"#).unwrap();

        let mut loader = RecordLoader::new(RecordSource::StaticFile(path));
        assert_eq!(loader.state(), &LoadState::Idle);

        let records = loader.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(loader.state(), &LoadState::Loaded(1));
    }

    #[tokio::test]
    async fn test_failed_state_after_retries() {
        let mut loader = RecordLoader::new(RecordSource::StaticFile(PathBuf::from("/nonexistent.json")))
            .with_retries(2, Duration::from_millis(1));

        let records = loader.load_or_empty().await;
        assert!(records.is_empty());
        assert!(matches!(loader.state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_retry_picks_up_late_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.json");
        let writer_path = path.clone();

        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tokio::fs::write(&writer_path, "[]").await.unwrap();
        });

        let mut loader = RecordLoader::new(RecordSource::StaticFile(path))
            .with_retries(5, Duration::from_millis(20));
        let records = loader.load().await.unwrap();
        writer.await.unwrap();

        assert!(records.is_empty());
        assert_eq!(loader.state(), &LoadState::Loaded(0));
    }
}
