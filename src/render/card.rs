//! カードレンダラ
//!
//! 1レコード → QR + 氏名 + 所属（+ 記念品）のSVGキャンバス。
//! 入力だけで決まる純粋関数で、副作用はない。

use super::qr::{QrColors, QrSymbol};
use super::text::{escape_xml, wrap_text, ASCENT_RATIO, LINE_HEIGHT_RATIO};
use super::SvgCanvas;
use crate::error::Result;
use philsan_qr_common::{CardGeometry, CardVariant, FieldLabels, PersonRecord};

/// カード1枚分のキャンバス
pub type CardView = SvgCanvas;

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
const TEXT_COLOR: &str = "#000000";
const SOUVENIR_COLOR: &str = "#666666";

/// 1行分のテキスト
struct TextLine {
    text: String,
    font_px: f32,
    weight: u16,
}

/// レコードをカードとして描画
///
/// メールアドレスが空のレコードは描画しない（`None`）。
/// 単体プレビューでは「未入力」とみなしてカードごと非表示にし、
/// 一括モードではそのレコードはマウントされない。
pub fn render_card(
    record: &PersonRecord,
    variant: CardVariant,
    labels: FieldLabels,
) -> Result<Option<CardView>> {
    if !record.is_renderable() {
        return Ok(None);
    }

    let geometry = variant.geometry();
    let symbol = QrSymbol::encode(&record.email)?;

    let mut body = String::new();
    body.push_str(&format!(
        r##"<rect width="{:.2}" height="{:.2}" fill="#ffffff"/>"##,
        geometry.width_px, geometry.height_px
    ));

    // QR列の中央に配置
    let qr_column_x = if geometry.border_px > 0.0 { 0.0 } else { geometry.padding_px };
    let qr_x = qr_column_x + (geometry.qr_column_width_px() - geometry.qr_size_px) / 2.0;
    let qr_y = (geometry.height_px - geometry.qr_size_px) / 2.0;
    body.push_str(&symbol.svg_fragment(qr_x, qr_y, geometry.qr_size_px, QrColors::default()));

    let lines = info_lines(record, variant, labels, &geometry);
    body.push_str(&text_block(&lines, &geometry));

    if let Some(souvenir) = record.souvenir_label() {
        if geometry.souvenir_font_px > 0.0 {
            // 右下に固定
            let x = geometry.width_px - 4.0;
            let y = geometry.height_px - 2.0 - geometry.souvenir_font_px * (1.0 - ASCENT_RATIO);
            body.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{fs:.2}" font-style="italic" text-anchor="end" fill="{SOUVENIR_COLOR}">{text}</text>"#,
                fs = geometry.souvenir_font_px,
                text = escape_xml(souvenir),
            ));
        }
    }

    if geometry.border_px > 0.0 {
        let half = geometry.border_px / 2.0;
        body.push_str(&format!(
            r##"<rect x="{half:.2}" y="{half:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="#000000" stroke-width="{bw:.2}"/>"##,
            w = geometry.width_px - geometry.border_px,
            h = geometry.height_px - geometry.border_px,
            bw = geometry.border_px,
        ));
    }

    Ok(Some(SvgCanvas::new(geometry.width_px, geometry.height_px, body)))
}

/// 氏名・所属の行を組み立てる
fn info_lines(
    record: &PersonRecord,
    variant: CardVariant,
    labels: FieldLabels,
    geometry: &CardGeometry,
) -> Vec<TextLine> {
    let (name, affiliation, name_weight) = match variant {
        // 未入力欄はラベルをプレースホルダとして表示
        CardVariant::Interactive => (
            non_empty_or(&record.name, labels.name),
            non_empty_or(&record.affiliation, labels.affiliation),
            600,
        ),
        // 空の所属は空白1文字にして行の高さを保つ
        CardVariant::Grid | CardVariant::Print => (
            record.name.as_str(),
            non_empty_or(&record.affiliation, " "),
            700,
        ),
    };

    let width = geometry.info_width_px();
    let mut lines = Vec::new();

    let name_lines = wrap_text(name, width, geometry.name_font_px);
    if name_lines.is_empty() {
        // 氏名が空でも1行分の高さを確保
        lines.push(TextLine { text: String::new(), font_px: geometry.name_font_px, weight: name_weight });
    }
    for text in name_lines {
        lines.push(TextLine { text, font_px: geometry.name_font_px, weight: name_weight });
    }

    let affiliation_lines = wrap_text(affiliation, width, geometry.affiliation_font_px);
    if affiliation_lines.is_empty() {
        lines.push(TextLine { text: String::new(), font_px: geometry.affiliation_font_px, weight: 400 });
    }
    for text in affiliation_lines {
        lines.push(TextLine { text, font_px: geometry.affiliation_font_px, weight: 400 });
    }

    lines
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// 情報列に縦中央揃えで並べる
fn text_block(lines: &[TextLine], geometry: &CardGeometry) -> String {
    let total: f32 = lines.iter().map(|l| l.font_px * LINE_HEIGHT_RATIO).sum();
    let x = geometry.info_x_px();
    let mut top = (geometry.height_px - total) / 2.0;
    let mut out = String::new();

    for line in lines {
        let line_height = line.font_px * LINE_HEIGHT_RATIO;
        if !line.text.is_empty() {
            let baseline = top + (line_height - line.font_px) / 2.0 + line.font_px * ASCENT_RATIO;
            out.push_str(&format!(
                r#"<text x="{x:.2}" y="{baseline:.2}" font-family="{FONT_FAMILY}" font-size="{fs:.2}" font-weight="{wt}" fill="{TEXT_COLOR}">{text}</text>"#,
                fs = line.font_px,
                wt = line.weight,
                text = escape_xml(&line.text),
            ));
        }
        top += line_height;
    }
    out
}
