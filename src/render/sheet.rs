//! 印刷シート合成
//!
//! 1ページ分のレコードをA4シート上のグリッドに並べる。

use super::card::render_card;
use super::SvgCanvas;
use crate::error::Result;
use philsan_qr_common::{CardVariant, FieldLabels, Page, PersonRecord, SheetLayout};

/// 合成済みシート
#[derive(Debug, Clone)]
pub struct SheetView {
    pub page_number: usize,
    pub canvas: SvgCanvas,
    /// 実際に配置されたカード枚数
    pub placed: usize,
}

/// ページをシートに合成
///
/// スロット位置はページ内の並び順で固定。描画できないレコードの
/// スロットは空欄のまま残す。
pub fn compose_sheet(
    page: &Page<'_, PersonRecord>,
    layout: &SheetLayout,
    labels: FieldLabels,
) -> Result<SheetView> {
    layout.validate()?;

    if page.len() > layout.stickers_per_page() {
        return Err(philsan_qr_common::Error::Layout(format!(
            "ページ{}の{}件はシート容量{}件を超えています",
            page.number + 1,
            page.len(),
            layout.stickers_per_page()
        ))
        .into());
    }

    let width = layout.page_width_px();
    let height = layout.page_height_px();
    let mut body = format!(r##"<rect width="{width:.2}" height="{height:.2}" fill="#ffffff"/>"##);
    let mut placed = 0;

    for (slot, record) in page.records.iter().enumerate() {
        let Some(card) = render_card(record, CardVariant::Print, labels)? else {
            tracing::debug!(index = page.offset + slot, "メールアドレスなし、スロットを空欄にします");
            continue;
        };
        let (x, y) = layout.slot_origin_px(slot);
        body.push_str(&card.to_nested_svg(x, y));
        placed += 1;
    }

    Ok(SheetView {
        page_number: page.number,
        canvas: SvgCanvas::new(width, height, body),
        placed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use philsan_qr_common::paginate;
    use std::num::NonZeroUsize;

    fn records(n: usize) -> Vec<PersonRecord> {
        (0..n)
            .map(|i| PersonRecord::new(format!("Person {}", i), "Acme", format!("p{}@example.com", i)))
            .collect()
    }

    #[test]
    fn test_compose_full_and_partial_pages() {
        let records = records(20);
        let layout = SheetLayout::a4_sticker_sheet();
        let pages = paginate(&records, NonZeroUsize::new(layout.stickers_per_page()).unwrap());

        let first = compose_sheet(&pages[0], &layout, FieldLabels::COMPANY).unwrap();
        let second = compose_sheet(&pages[1], &layout, FieldLabels::COMPANY).unwrap();

        assert_eq!(first.placed, 16);
        assert_eq!(second.placed, 4);
        assert_eq!(second.page_number, 1);
        assert!(first.canvas.to_svg().contains("Person 15"));
        assert!(second.canvas.to_svg().contains("Person 16"));
    }

    #[test]
    fn test_compose_skips_records_without_email() {
        let mut records = records(3);
        records[1].email.clear();
        let layout = SheetLayout::a4_sticker_sheet();
        let page = philsan_qr_common::single_page(&records);

        let sheet = compose_sheet(&page, &layout, FieldLabels::COMPANY).unwrap();
        assert_eq!(sheet.placed, 2);
        assert!(!sheet.canvas.to_svg().contains("Person 1<"));
    }

    #[test]
    fn test_compose_rejects_oversized_page() {
        let records = records(17);
        let layout = SheetLayout::a4_sticker_sheet();
        let page = philsan_qr_common::single_page(&records);

        assert!(compose_sheet(&page, &layout, FieldLabels::COMPANY).is_err());
    }
}
