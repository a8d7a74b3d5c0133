//! レイアウト設定モジュール
//!
//! mm / px 基準のカード・シート寸法定義（Source of Truth）
//! 画面表示用のカードはCSS px（96dpi）、印刷シートはmmで定義する。

// ============================================
// mm基準レイアウト（Source of Truth）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// ステッカー1枚のサイズ（mm）
pub const STICKER_WIDTH_MM: f32 = 76.2;
pub const STICKER_HEIGHT_MM: f32 = 35.0012;

/// シート構成: 2列 × 8行 = 16枚
pub const SHEET_COLUMNS: usize = 2;
pub const SHEET_ROWS: usize = 8;
pub const STICKERS_PER_SHEET: usize = SHEET_COLUMNS * SHEET_ROWS;

/// シート余白・ステッカー間隔（px）
pub const SHEET_PADDING_PX: f32 = 12.0;
pub const SHEET_GAP_PX: f32 = 1.0;

// ============================================
// 変換係数
// ============================================

/// CSS基準解像度
pub const CSS_DPI: f32 = 96.0;

/// mm → px変換 (96dpi基準)
pub const MM_TO_PX: f32 = CSS_DPI / 25.4;

/// pt → px変換
pub const PT_TO_PX: f32 = 96.0 / 72.0;

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

// ============================================
// カード寸法
// ============================================

/// カードの表示バリエーション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    /// 単体プレビュー（フォーム入力）
    Interactive,
    /// 一覧グリッド（Printed版）
    Grid,
    /// 印刷シート用ステッカー（Digital版）
    Print,
}

impl CardVariant {
    pub fn geometry(&self) -> CardGeometry {
        match self {
            CardVariant::Interactive => CardGeometry::interactive(),
            CardVariant::Grid => CardGeometry::grid(),
            CardVariant::Print => CardGeometry::print(),
        }
    }
}

/// カード1枚の寸法（px）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub width_px: f32,
    pub height_px: f32,
    /// 内側余白
    pub padding_px: f32,
    /// QR列と情報列の間隔
    pub column_gap_px: f32,
    /// QR列の幅比率（残りが情報列）
    pub qr_column_ratio: f32,
    pub qr_size_px: f32,
    pub name_font_px: f32,
    pub affiliation_font_px: f32,
    pub souvenir_font_px: f32,
    /// 0なら枠線なし
    pub border_px: f32,
}

impl CardGeometry {
    /// 単体プレビュー: QR 150px、2列等分
    pub fn interactive() -> Self {
        Self {
            width_px: 372.0,
            height_px: 198.0,
            padding_px: 24.0,
            column_gap_px: 24.0,
            qr_column_ratio: 0.5,
            qr_size_px: 150.0,
            name_font_px: 18.0,
            affiliation_font_px: 16.0,
            souvenir_font_px: 0.0,
            border_px: 0.0,
        }
    }

    /// 一覧グリッド: 230×100px、QR 76px
    pub fn grid() -> Self {
        Self {
            width_px: 230.0,
            height_px: 100.0,
            padding_px: 8.0,
            column_gap_px: 8.0,
            qr_column_ratio: 0.4,
            qr_size_px: 76.0,
            name_font_px: 10.0,
            affiliation_font_px: 9.0,
            souvenir_font_px: 0.0,
            border_px: 0.0,
        }
    }

    /// 印刷ステッカー: 76.2×35.0012mm、QR 94px
    pub fn print() -> Self {
        Self {
            width_px: mm_to_px(STICKER_WIDTH_MM),
            height_px: mm_to_px(STICKER_HEIGHT_MM),
            padding_px: 4.0,
            column_gap_px: 0.0,
            qr_column_ratio: 0.4,
            qr_size_px: 94.0,
            name_font_px: pt_to_px(11.0),
            affiliation_font_px: pt_to_px(8.0),
            souvenir_font_px: pt_to_px(6.0),
            border_px: 1.0,
        }
    }

    /// 内側の利用可能幅
    pub fn content_width_px(&self) -> f32 {
        self.width_px - self.padding_px * 2.0
    }

    /// QR列の幅
    pub fn qr_column_width_px(&self) -> f32 {
        if self.border_px > 0.0 {
            // 印刷カードは余白なしで40%/60%
            self.width_px * self.qr_column_ratio
        } else {
            (self.content_width_px() - self.column_gap_px) * self.qr_column_ratio
        }
    }

    /// 情報列の左端X
    pub fn info_x_px(&self) -> f32 {
        if self.border_px > 0.0 {
            self.qr_column_width_px() + self.padding_px
        } else {
            self.padding_px + self.qr_column_width_px() + self.column_gap_px
        }
    }

    /// 情報列の幅
    pub fn info_width_px(&self) -> f32 {
        (self.width_px - self.info_x_px() - self.padding_px).max(0.0)
    }
}

// ============================================
// シート設定構造体
// ============================================

/// 印刷シート設定
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// ページ幅（mm）
    pub page_width_mm: f32,
    /// ページ高さ（mm）
    pub page_height_mm: f32,
    pub columns: usize,
    pub rows: usize,
    /// ページ内余白（px）
    pub padding_px: f32,
    /// ステッカー間隔（px）
    pub gap_px: f32,
    pub card: CardGeometry,
}

impl SheetLayout {
    /// A4 ステッカーシート（16枚/ページ）
    pub fn a4_sticker_sheet() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            columns: SHEET_COLUMNS,
            rows: SHEET_ROWS,
            padding_px: SHEET_PADDING_PX,
            gap_px: SHEET_GAP_PX,
            card: CardGeometry::print(),
        }
    }

    pub fn stickers_per_page(&self) -> usize {
        self.columns * self.rows
    }

    pub fn page_width_px(&self) -> f32 {
        mm_to_px(self.page_width_mm)
    }

    pub fn page_height_px(&self) -> f32 {
        mm_to_px(self.page_height_mm)
    }

    /// 1列分のセル幅（px）
    pub fn cell_width_px(&self) -> f32 {
        let usable = self.page_width_px() - self.padding_px * 2.0;
        (usable - self.gap_px * (self.columns.saturating_sub(1)) as f32) / self.columns as f32
    }

    /// スロット番号 → カード左上座標（px）。行優先で並べる。
    pub fn slot_origin_px(&self, slot: usize) -> (f32, f32) {
        let column = slot % self.columns;
        let row = slot / self.columns;
        let x = self.padding_px + column as f32 * (self.cell_width_px() + self.gap_px);
        let y = self.padding_px + row as f32 * (self.card.height_px + self.gap_px);
        (x, y)
    }

    /// 全行がページ内に収まるか
    pub fn validate(&self) -> crate::Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(crate::Error::Layout("列数・行数は1以上が必要です".into()));
        }
        if self.card.width_px > self.cell_width_px() + 0.01 {
            return Err(crate::Error::Layout(format!(
                "カード幅 {:.1}px がセル幅 {:.1}px を超えています",
                self.card.width_px,
                self.cell_width_px()
            )));
        }
        let needed = self.padding_px * 2.0
            + self.rows as f32 * self.card.height_px
            + (self.rows - 1) as f32 * self.gap_px;
        if needed > self.page_height_px() + 0.01 {
            return Err(crate::Error::Layout(format!(
                "{}行分の高さ {:.1}px がページ高さ {:.1}px を超えています",
                self.rows,
                needed,
                self.page_height_px()
            )));
        }
        Ok(())
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::a4_sticker_sheet()
    }
}

// ============================================
// ヘルパー関数
// ============================================

/// mm → px 変換
#[inline]
pub fn mm_to_px(mm: f32) -> f32 {
    mm * MM_TO_PX
}

/// pt → px 変換
#[inline]
pub fn pt_to_px(pt: f32) -> f32 {
    pt * PT_TO_PX
}

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticker_dimensions() {
        let card = CardGeometry::print();
        // 76.2mm = 3インチ = 288px
        assert!((card.width_px - 288.0).abs() < 0.01);
        assert!((card.height_px - 132.29).abs() < 0.1);
        assert!((card.name_font_px - 14.67).abs() < 0.01);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((mm_to_px(25.4) - 96.0).abs() < 0.001);
    }

    #[test]
    fn test_a4_sheet_fits() {
        let layout = SheetLayout::a4_sticker_sheet();
        assert_eq!(layout.stickers_per_page(), 16);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_sheet_rejects_too_many_rows() {
        let layout = SheetLayout {
            rows: 9,
            ..SheetLayout::a4_sticker_sheet()
        };
        assert!(matches!(layout.validate(), Err(crate::Error::Layout(_))));
    }

    #[test]
    fn test_slot_origin_row_major() {
        let layout = SheetLayout::a4_sticker_sheet();
        let (x0, y0) = layout.slot_origin_px(0);
        let (x1, y1) = layout.slot_origin_px(1);
        let (x2, y2) = layout.slot_origin_px(2);

        assert_eq!((x0, y0), (SHEET_PADDING_PX, SHEET_PADDING_PX));
        assert!(x1 > x0);
        assert_eq!(y1, y0);
        assert_eq!(x2, x0);
        assert!(y2 > y0);
    }

    #[test]
    fn test_card_columns() {
        let grid = CardGeometry::grid();
        // (230 - 16 - 8) * 0.4
        assert!((grid.qr_column_width_px() - 82.4).abs() < 0.01);
        assert!(grid.qr_column_width_px() >= grid.qr_size_px);
        assert!(grid.info_width_px() > 0.0);

        let print = CardGeometry::print();
        assert!((print.qr_column_width_px() - 115.2).abs() < 0.01);
        assert!(print.qr_column_width_px() >= print.qr_size_px);
    }
}
