//! 一括エクスポートパイプライン
//!
//! 登録済みカードを順番に画像化し、1つのZIPにまとめて保存する。
//!
//! - インデックス昇順・1枚ずつ処理（同時に持つビットマップは1枚）
//! - 未登録のインデックスは黙ってスキップ（部分出力を優先）
//! - 画像化・ZIP確定の失敗はその場で中断して呼び出し元へ返す
//! - 実行中フラグで多重起動を防ぐ。2回目の呼び出しは何もしない。

use super::archive::ArchiveBuilder;
use super::registry::RenderTargetRegistry;
use crate::error::Result;
use crate::render::{encode_png, Rasterizer};
use indicatif::{ProgressBar, ProgressStyle};
use philsan_qr_common::PersonRecord;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 保存ファイル名
pub const ARCHIVE_FILE_NAME: &str = "bulk_qr_codes.zip";

/// エントリ名の接尾辞
pub const ENTRY_SUFFIX: &str = "_qr.png";

/// 氏名からエントリ名を作る（パス区切りはフォルダにならないよう置換）
pub fn entry_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}{}", safe, ENTRY_SUFFIX)
}

/// 1回のエクスポート結果
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub archive_path: PathBuf,
    /// ZIP内のエントリ名（挿入順）
    pub entries: Vec<String>,
    /// 未登録でスキップしたインデックス
    pub skipped: Vec<usize>,
    /// 同名で上書きされた件数
    pub overwritten: usize,
    pub archive_bytes: usize,
}

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Completed(ExportSummary),
    /// 既に実行中だったため何もしなかった
    AlreadyRunning,
}

/// 実行中フラグのガード。どの経路で抜けても必ず解除する。
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct BulkExporter {
    output_dir: PathBuf,
    loading: AtomicBool,
    show_progress: bool,
}

impl BulkExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            loading: AtomicBool::new(false),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// ボタン表示に相当するラベル
    pub fn trigger_label(&self) -> &'static str {
        if self.is_loading() {
            "Downloading..."
        } else {
            "Download All as ZIP"
        }
    }

    /// 全カードをZIPにして保存
    pub async fn export_all<R>(
        &self,
        records: &[PersonRecord],
        registry: &RenderTargetRegistry,
        rasterizer: &R,
    ) -> Result<ExportOutcome>
    where
        R: Rasterizer + ?Sized,
    {
        let Some(_guard) = LoadingGuard::acquire(&self.loading) else {
            tracing::warn!("エクスポート実行中のため要求を無視しました");
            return Ok(ExportOutcome::AlreadyRunning);
        };

        let progress = self.progress_bar(records.len() as u64);
        progress.set_message(self.trigger_label());

        let mut archive = ArchiveBuilder::new();
        let mut skipped = Vec::new();
        let mut overwritten = 0;

        for (index, record) in records.iter().enumerate() {
            let Some(view) = registry.get(index) else {
                tracing::debug!(index, "カード未登録のためスキップ");
                skipped.push(index);
                progress.inc(1);
                continue;
            };

            let bitmap = rasterizer.rasterize(view)?;
            let png = encode_png(&bitmap)?;
            drop(bitmap);

            let name = entry_name(&record.name);
            if archive.insert(name.as_str(), png) {
                tracing::warn!(index, entry = %name, "同名のエントリを上書きしました");
                overwritten += 1;
            }

            progress.inc(1);
            // 1枚ごとに制御を返す
            tokio::task::yield_now().await;
        }

        let entries = archive.names();
        let bytes = archive.finish()?;
        let archive_path = save_archive(&self.output_dir, &bytes).await?;
        progress.finish_and_clear();

        tracing::info!(
            entries = entries.len(),
            skipped = skipped.len(),
            path = %archive_path.display(),
            "ZIPを保存しました"
        );

        Ok(ExportOutcome::Completed(ExportSummary {
            archive_path,
            entries,
            skipped,
            overwritten,
            archive_bytes: bytes.len(),
        }))
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar
    }
}

/// 出力フォルダへ固定名で保存
pub async fn save_archive(output_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(ARCHIVE_FILE_NAME);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrBadgeError;
    use crate::render::SvgCanvas;
    use image::RgbaImage;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// 呼び出し順を記録する単色ラスタライザ
    struct FakeRasterizer {
        calls: Cell<usize>,
        fail_at: Option<usize>,
    }

    impl FakeRasterizer {
        fn new() -> Self {
            Self { calls: Cell::new(0), fail_at: None }
        }

        fn failing_at(call: usize) -> Self {
            Self { calls: Cell::new(0), fail_at: Some(call) }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&self, canvas: &SvgCanvas) -> Result<RgbaImage> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail_at == Some(call) {
                return Err(QrBadgeError::Rasterize("テスト用の失敗".into()));
            }
            Ok(RgbaImage::from_pixel(
                canvas.width_px as u32,
                canvas.height_px as u32,
                image::Rgba([255, 255, 255, 255]),
            ))
        }
    }

    fn registry_for(records: &[PersonRecord]) -> RenderTargetRegistry {
        let mut registry = RenderTargetRegistry::new();
        for index in 0..records.len() {
            registry.mount(index, SvgCanvas::new(4.0, 4.0, String::new()));
        }
        registry
    }

    fn archive_names(path: &Path) -> Vec<String> {
        let bytes = std::fs::read(path).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn completed(outcome: ExportOutcome) -> ExportSummary {
        match outcome {
            ExportOutcome::Completed(summary) => summary,
            ExportOutcome::AlreadyRunning => panic!("実行中扱いになった"),
        }
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(entry_name("Juan"), "Juan_qr.png");
        assert_eq!(entry_name("A/B\\C"), "A_B_C_qr.png");
        assert_eq!(entry_name(""), "_qr.png");
    }

    #[tokio::test]
    async fn test_export_example_scenario() {
        let dir = tempdir().unwrap();
        let records = vec![
            PersonRecord::new("A", "", "a@x.com"),
            PersonRecord::new("B", "", "b@x.com"),
            PersonRecord::new("B", "", "c@x.com"),
        ];
        let registry = registry_for(&records);
        let rasterizer = FakeRasterizer::new();
        let exporter = BulkExporter::new(dir.path());

        let summary = completed(exporter.export_all(&records, &registry, &rasterizer).await.unwrap());

        assert_eq!(rasterizer.calls.get(), 3);
        assert_eq!(summary.entries, vec!["A_qr.png", "B_qr.png"]);
        assert_eq!(summary.overwritten, 1);
        assert_eq!(summary.archive_path, dir.path().join(ARCHIVE_FILE_NAME));
        assert_eq!(archive_names(&summary.archive_path), vec!["A_qr.png", "B_qr.png"]);
    }

    #[tokio::test]
    async fn test_export_preserves_source_order() {
        let dir = tempdir().unwrap();
        let records: Vec<PersonRecord> = ["Zed", "Amy", "Mia", "Bob"]
            .iter()
            .map(|n| PersonRecord::new(*n, "", format!("{}@x.com", n)))
            .collect();
        let registry = registry_for(&records);

        let summary = completed(
            BulkExporter::new(dir.path())
                .export_all(&records, &registry, &FakeRasterizer::new())
                .await
                .unwrap(),
        );

        assert_eq!(
            archive_names(&summary.archive_path),
            vec!["Zed_qr.png", "Amy_qr.png", "Mia_qr.png", "Bob_qr.png"]
        );
    }

    #[tokio::test]
    async fn test_export_skips_missing_target() {
        let dir = tempdir().unwrap();
        let records: Vec<PersonRecord> = (0..5)
            .map(|i| PersonRecord::new(format!("P{}", i), "", format!("p{}@x.com", i)))
            .collect();
        let mut registry = registry_for(&records);
        registry.unmount(2);

        let rasterizer = FakeRasterizer::new();
        let summary = completed(
            BulkExporter::new(dir.path())
                .export_all(&records, &registry, &rasterizer)
                .await
                .unwrap(),
        );

        assert_eq!(summary.skipped, vec![2]);
        assert_eq!(rasterizer.calls.get(), 4);

        let names = archive_names(&summary.archive_path);
        assert_eq!(names.len(), 4);
        assert_eq!(names, vec!["P0_qr.png", "P1_qr.png", "P3_qr.png", "P4_qr.png"]);

        // 各エントリは正しいPNG
        let bytes = std::fs::read(&summary.archive_path).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut data).unwrap();
            assert!(image::load_from_memory(&data).is_ok());
        }
    }

    #[tokio::test]
    async fn test_export_empty_list_produces_empty_archive() {
        let dir = tempdir().unwrap();
        let summary = completed(
            BulkExporter::new(dir.path())
                .export_all(&[], &RenderTargetRegistry::new(), &FakeRasterizer::new())
                .await
                .unwrap(),
        );
        assert!(summary.entries.is_empty());
        assert!(archive_names(&summary.archive_path).is_empty());
    }

    #[tokio::test]
    async fn test_failure_aborts_and_clears_flag() {
        let dir = tempdir().unwrap();
        let records: Vec<PersonRecord> = (0..4)
            .map(|i| PersonRecord::new(format!("P{}", i), "", format!("p{}@x.com", i)))
            .collect();
        let registry = registry_for(&records);
        let exporter = BulkExporter::new(dir.path());

        let rasterizer = FakeRasterizer::failing_at(1);
        let result = exporter.export_all(&records, &registry, &rasterizer).await;

        assert!(matches!(result, Err(QrBadgeError::Rasterize(_))));
        // 失敗以降は処理しない
        assert_eq!(rasterizer.calls.get(), 2);
        assert!(!exporter.is_loading());
        assert!(!dir.path().join(ARCHIVE_FILE_NAME).exists());

        // 手動で再実行できる
        let retry = exporter.export_all(&records, &registry, &FakeRasterizer::new()).await;
        assert_eq!(completed(retry.unwrap()).entries.len(), 4);
    }

    #[tokio::test]
    async fn test_second_call_while_running_is_noop() {
        let dir = tempdir().unwrap();
        let records: Vec<PersonRecord> = (0..3)
            .map(|i| PersonRecord::new(format!("P{}", i), "", format!("p{}@x.com", i)))
            .collect();
        let registry = registry_for(&records);
        let exporter = BulkExporter::new(dir.path());
        let rasterizer = FakeRasterizer::new();

        let (first, second) = tokio::join!(
            exporter.export_all(&records, &registry, &rasterizer),
            exporter.export_all(&records, &registry, &rasterizer),
        );

        assert_eq!(completed(first.unwrap()).entries.len(), 3);
        assert!(matches!(second.unwrap(), ExportOutcome::AlreadyRunning));
        // 画像化は1回分だけ
        assert_eq!(rasterizer.calls.get(), 3);
        assert!(!exporter.is_loading());
    }

    #[test]
    fn test_trigger_label() {
        let exporter = BulkExporter::new("out");
        assert_eq!(exporter.trigger_label(), "Download All as ZIP");

        let guard = LoadingGuard::acquire(&exporter.loading).unwrap();
        assert_eq!(exporter.trigger_label(), "Downloading...");
        assert!(LoadingGuard::acquire(&exporter.loading).is_none());
        drop(guard);
        assert!(!exporter.is_loading());
    }
}
