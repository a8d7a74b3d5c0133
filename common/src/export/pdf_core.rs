//! PDF export core utilities (sheet geometry in pt / device px).

use crate::layout::{mm_to_pt, SheetLayout, CSS_DPI};

/// PDF描画で使用するシート寸法（pt単位）と解像度
#[derive(Debug, Clone)]
pub struct PdfSheetCore {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// 画像化する解像度
    pub dpi: f32,
    /// CSS px → デバイスpx の倍率
    pub raster_scale: f32,
    pub raster_width_px: u32,
    pub raster_height_px: u32,
    pub stickers_per_page: usize,
}

impl PdfSheetCore {
    pub fn from_layout(layout: &SheetLayout, dpi: f32) -> Self {
        let raster_scale = dpi / CSS_DPI;
        Self {
            page_width_pt: mm_to_pt(layout.page_width_mm),
            page_height_pt: mm_to_pt(layout.page_height_mm),
            dpi,
            raster_scale,
            raster_width_px: (layout.page_width_px() * raster_scale).round() as u32,
            raster_height_px: (layout.page_height_px() * raster_scale).round() as u32,
            stickers_per_page: layout.stickers_per_page(),
        }
    }

    /// 画像をこのdpiで置いたときの幅（pt）
    pub fn placed_width_pt(&self) -> f32 {
        self.raster_width_px as f32 / self.dpi * 72.0
    }
}
