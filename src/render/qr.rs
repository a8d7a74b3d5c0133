//! QRコード生成
//!
//! 符号化は `qrcode` クレートに任せ、ここではモジュール行列を
//! SVGパスに変換するだけ。同じ入力からは常に同じ出力になる。

use crate::error::{QrBadgeError, Result};
use qrcode::{Color, EcLevel, QrCode};

/// 前景色・背景色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrColors {
    pub foreground: &'static str,
    pub background: &'static str,
}

impl Default for QrColors {
    fn default() -> Self {
        Self {
            foreground: "#000000",
            background: "#ffffff",
        }
    }
}

/// 符号化済みQRシンボル（マージンなし）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSymbol {
    width: usize,
    modules: Vec<bool>,
}

impl QrSymbol {
    /// ペイロードを誤り訂正レベルLで符号化
    pub fn encode(payload: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
            .map_err(|e| QrBadgeError::QrEncode(format!("{} ({}文字)", e, payload.chars().count())))?;

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        Ok(Self { width, modules })
    }

    /// 1辺のモジュール数
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// 暗モジュールのパス（モジュール単位座標、行ごとに連続区間をまとめる）
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if !self.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.is_dark(x, y) {
                    x += 1;
                }
                let run = x - start;
                d.push_str(&format!("M{} {}h{}v1h-{}z", start, y, run, run));
            }
        }
        d
    }

    /// (x, y) に size×size px で描くSVG断片
    pub fn svg_fragment(&self, x: f32, y: f32, size: f32, colors: QrColors) -> String {
        let scale = size / self.width as f32;
        format!(
            r#"<g transform="translate({x:.2} {y:.2}) scale({scale:.6})" shape-rendering="crispEdges"><rect width="{w}" height="{w}" fill="{bg}"/><path d="{d}" fill="{fg}"/></g>"#,
            w = self.width,
            bg = colors.background,
            fg = colors.foreground,
            d = self.path_data(),
        )
    }
}
