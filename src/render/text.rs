//! テキスト配置ユーティリティ
//!
//! フォントメトリクスを持たないので文字幅は概算。
//! 欧文は0.55em、全角は1em として折り返す。

/// 行送り（フォントサイズ比）
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

/// ベースライン位置（フォントサイズ比）
pub const ASCENT_RATIO: f32 = 0.8;

pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn char_width_em(ch: char) -> f32 {
    if ch.is_ascii() {
        0.55
    } else {
        1.0
    }
}

/// 文字列の推定幅（px）
pub fn estimate_width(text: &str, font_px: f32) -> f32 {
    text.chars().map(char_width_em).sum::<f32>() * font_px
}

/// 単語単位で折り返し、1単語が収まらなければ文字単位で折る
pub fn wrap_text(text: &str, max_width_px: f32, font_px: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            estimate_width(word, font_px)
        } else {
            estimate_width(&current, font_px) + estimate_width(" ", font_px) + estimate_width(word, font_px)
        };

        if candidate <= max_width_px {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        for ch in word.chars() {
            let width = estimate_width(&current, font_px) + char_width_em(ch) * font_px;
            if !current.is_empty() && width > max_width_px {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
