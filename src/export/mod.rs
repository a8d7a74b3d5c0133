pub mod archive;
pub mod pdf;
pub mod pipeline;
pub mod registry;

pub use archive::ArchiveBuilder;
pub use pipeline::{entry_name, BulkExporter, ExportOutcome, ExportSummary, ARCHIVE_FILE_NAME};
pub use registry::RenderTargetRegistry;

use crate::cli::{ExportFormat, PdfQuality};
use crate::error::{QrBadgeError, Result};
use crate::profile::BulkProfile;
use crate::render::ResvgRasterizer;
use philsan_qr_common::PersonRecord;
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

/// ZIPの保存先フォルダ（ファイル名が渡されたらその親）
fn archive_dir(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.to_path_buf()
    } else {
        output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub output: &'a Path,
    pub title: &'a str,
    pub pdf_quality: PdfQuality,
    /// ZIP用の画像化倍率
    pub raster_scale: f32,
    pub show_progress: bool,
}

pub async fn export_records(
    records: &[PersonRecord],
    profile: &BulkProfile,
    request: &ExportRequest<'_>,
) -> Result<()> {
    if request.format.includes_pdf() && profile.sheet.is_none() {
        return Err(QrBadgeError::Config(format!(
            "{}版はPDF出力に対応していません（zipを指定してください）",
            profile.name
        )));
    }

    if request.format.includes_zip() {
        println!("- カードを準備中... ({}件)", records.len());
        let registry = RenderTargetRegistry::mount_records(records, profile.variant, profile.labels)?;
        let skipped = records.len() - registry.mounted();
        if skipped > 0 {
            println!("  ({}件はメールアドレスが空のためスキップ)", skipped);
        }

        println!("- ZIPを生成中...");
        let rasterizer = ResvgRasterizer::new(request.raster_scale);
        let exporter = BulkExporter::new(archive_dir(request.output)).with_progress(request.show_progress);
        match exporter.export_all(records, &registry, &rasterizer).await? {
            ExportOutcome::Completed(summary) => {
                println!(
                    "✔ ZIP出力: {} ({}件)",
                    summary.archive_path.display(),
                    summary.entries.len()
                );
                if summary.overwritten > 0 {
                    println!("  ⚠ 同名のため {}件が上書きされました", summary.overwritten);
                }
            }
            ExportOutcome::AlreadyRunning => {
                println!("  ⚠ エクスポート実行中のためスキップしました");
            }
        }
    }

    if request.format.includes_pdf() {
        if let Some(layout) = &profile.sheet {
            let output_path = output_path_for_format(request.output, request.title, "pdf");
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let pages = profile.pages(records);
            println!("- PDFを生成中... ({}ページ, 品質: {})", pages.len().max(1), request.pdf_quality);
            pdf::generate_sheet_pdf(
                &pages,
                layout,
                profile.labels,
                &output_path,
                request.title,
                request.pdf_quality,
            )?;
            println!("✔ PDF出力: {}", output_path.display());
        }
    }

    Ok(())
}
