//! 一括出力のプロファイル
//!
//! Printed版とDigital版は取得元・ラベル・カード形状・ページ分割だけが違う。

use philsan_qr_common::{
    paginate, single_page, CardVariant, FieldLabels, Page, PersonRecord, SheetLayout,
};
use std::num::NonZeroUsize;

/// 取得元の種類（実際の接続先は実行時に決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    StaticFile,
    Bucket,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkProfile {
    pub name: &'static str,
    pub source: SourceKind,
    pub labels: FieldLabels,
    /// None なら全件を1ページとして扱う
    pub page_size: Option<NonZeroUsize>,
    pub variant: CardVariant,
    /// 印刷シート（PDF出力できるのはこれがある場合のみ）
    pub sheet: Option<SheetLayout>,
}

impl BulkProfile {
    pub fn printed() -> Self {
        Self {
            name: "printed",
            source: SourceKind::StaticFile,
            labels: FieldLabels::AFFILIATION,
            page_size: None,
            variant: CardVariant::Grid,
            sheet: None,
        }
    }

    pub fn digital() -> Self {
        let sheet = SheetLayout::a4_sticker_sheet();
        Self {
            name: "digital",
            source: SourceKind::Bucket,
            labels: FieldLabels::COMPANY,
            page_size: NonZeroUsize::new(sheet.stickers_per_page()),
            variant: CardVariant::Print,
            sheet: Some(sheet),
        }
    }

    pub fn pages<'a>(&self, records: &'a [PersonRecord]) -> Vec<Page<'a, PersonRecord>> {
        match self.page_size {
            Some(size) => paginate(records, size),
            None if records.is_empty() => Vec::new(),
            None => vec![single_page(records)],
        }
    }
}
