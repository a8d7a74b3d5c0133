//! カード描画
//!
//! レコード → SVGキャンバス → ビットマップ の流れ。
//! SVGはブラウザのDOMに相当し、画像化はラスタライザに任せる。

pub mod qr;
pub mod text;
pub mod card;
pub mod sheet;
pub mod raster;

pub use card::{render_card, CardView};
pub use qr::{QrColors, QrSymbol};
pub use raster::{encode_jpeg, encode_png, Rasterizer, ResvgRasterizer};
pub use sheet::{compose_sheet, SheetView};

/// 固定サイズのSVGキャンバス
#[derive(Debug, Clone, PartialEq)]
pub struct SvgCanvas {
    pub width_px: f32,
    pub height_px: f32,
    body: String,
}

impl SvgCanvas {
    pub fn new(width_px: f32, height_px: f32, body: String) -> Self {
        Self { width_px, height_px, body }
    }

    /// 単独のSVGドキュメントとして出力
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">{body}</svg>"#,
            w = self.width_px,
            h = self.height_px,
            body = self.body
        )
    }

    /// 親SVG内に (x, y) で埋め込む。はみ出しは切り取られる。
    pub fn to_nested_svg(&self, x: f32, y: f32) -> String {
        format!(
            r#"<svg x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}" overflow="hidden">{body}</svg>"#,
            w = self.width_px,
            h = self.height_px,
            body = self.body
        )
    }
}
