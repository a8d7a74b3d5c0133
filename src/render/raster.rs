//! ラスタライズ（SVGキャンバス → ビットマップ）
//!
//! 透明部分は必ず白で塗りつぶしてから描画する。

use super::SvgCanvas;
use crate::error::{QrBadgeError, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::tiny_skia;
use std::io::Cursor;

/// 大きすぎるキャンバスは確保前に弾く
const MAX_DIM: u32 = 16_384;

/// キャンバスを1枚のビットマップにする
pub trait Rasterizer {
    fn rasterize(&self, canvas: &SvgCanvas) -> Result<RgbaImage>;
}

/// resvg によるラスタライザ
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
    scale: f32,
}

impl ResvgRasterizer {
    /// システムフォントを読み込んで初期化
    pub fn new(scale: f32) -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        tracing::debug!(fonts = options.fontdb.len(), scale, "ラスタライザ初期化");
        Self::with_options(options, scale)
    }

    pub fn with_options(options: usvg::Options<'static>, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { options, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn output_size(&self, canvas: &SvgCanvas) -> Result<(u32, u32)> {
        let width = (canvas.width_px * self.scale).ceil().max(1.0) as u32;
        let height = (canvas.height_px * self.scale).ceil().max(1.0) as u32;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(QrBadgeError::Rasterize(format!(
                "画像サイズが大きすぎます: {}x{} (最大 {}x{})",
                width, height, MAX_DIM, MAX_DIM
            )));
        }
        Ok((width, height))
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, canvas: &SvgCanvas) -> Result<RgbaImage> {
        let (width, height) = self.output_size(canvas)?;
        let tree = usvg::Tree::from_str(&canvas.to_svg(), &self.options)
            .map_err(|e| QrBadgeError::Rasterize(format!("SVG解析失敗: {}", e)))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| QrBadgeError::Rasterize("ピクセルバッファを確保できません".into()))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        // 白で塗った上に描いているので全画素不透明（乗算済み = ストレート）
        RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| QrBadgeError::Rasterize("ピクセル数が一致しません".into()))
    }
}

/// PNGにエンコード
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// JPEGにエンコード（アルファは捨てる）
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(bytes)
}
