//! 印刷用PDF生成
//!
//! ページごとにシートを合成 → 画像化 → JPEG化して、A4の1ページに全面配置する。

use crate::cli::PdfQuality;
use crate::error::{QrBadgeError, Result};
use crate::render::{compose_sheet, encode_jpeg, Rasterizer, ResvgRasterizer};
use philsan_qr_common::export::pdf_core::PdfSheetCore;
use philsan_qr_common::{FieldLabels, Page, PersonRecord, SheetLayout};
use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, XObjectTransform};
use std::path::Path;

pub fn generate_sheet_pdf(
    pages: &[Page<'_, PersonRecord>],
    layout: &SheetLayout,
    labels: FieldLabels,
    output_path: &Path,
    title: &str,
    quality: PdfQuality,
) -> Result<()> {
    let core = PdfSheetCore::from_layout(layout, quality.dpi());
    let rasterizer = ResvgRasterizer::new(core.raster_scale);
    generate_sheet_pdf_with(pages, layout, labels, output_path, title, quality, &rasterizer)
}

pub fn generate_sheet_pdf_with<R>(
    pages: &[Page<'_, PersonRecord>],
    layout: &SheetLayout,
    labels: FieldLabels,
    output_path: &Path,
    title: &str,
    quality: PdfQuality,
    rasterizer: &R,
) -> Result<()>
where
    R: Rasterizer + ?Sized,
{
    let core = PdfSheetCore::from_layout(layout, quality.dpi());
    let mut doc = PdfDocument::new(title);
    let mut warnings = Vec::new();
    let mut pdf_pages = Vec::with_capacity(pages.len().max(1));
    tracing::debug!(
        dpi = core.dpi,
        placed_width_pt = core.placed_width_pt(),
        page_width_pt = core.page_width_pt,
        "シート画像の配置サイズ"
    );

    for page in pages {
        let sheet = compose_sheet(page, layout, labels)?;
        let bitmap = rasterizer.rasterize(&sheet.canvas)?;
        let jpeg = encode_jpeg(&bitmap, quality.jpeg_quality())?;
        drop(bitmap);

        let image = RawImage::decode_from_bytes(&jpeg, &mut warnings)
            .map_err(|e| QrBadgeError::PdfGeneration(format!("画像読み込みエラー: {}", e)))?;
        let image_id = doc.add_image(&image);

        // 解像度を指定すると画像がページ全体に等倍で収まる
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                dpi: Some(core.dpi),
                ..Default::default()
            },
        }];
        pdf_pages.push(PdfPage::new(Mm(layout.page_width_mm), Mm(layout.page_height_mm), ops));

        tracing::debug!(page = sheet.page_number + 1, placed = sheet.placed, "シートを配置");
    }

    // 0件でも白紙1ページのPDFにする
    if pdf_pages.is_empty() {
        pdf_pages.push(PdfPage::new(Mm(layout.page_width_mm), Mm(layout.page_height_mm), Vec::new()));
    }

    let bytes = doc
        .with_pages(pdf_pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "PDF生成時の警告");
    }

    std::fs::write(output_path, bytes)?;
    Ok(())
}
