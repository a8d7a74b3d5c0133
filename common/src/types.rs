//! 参加者レコードの型定義
//!
//! 静的JSONとリモートバケットのどちらから読んでも同じ形:
//! `[{ "Name", "Affiliation" | "Company", "Email", "Souvenir"? }]`

use serde::{Deserialize, Deserializer, Serialize};

/// 参加者1名分のレコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(rename = "Name", default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// 所属（データセットにより "Affiliation" または "Company"）
    #[serde(
        rename = "Affiliation",
        alias = "Company",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub affiliation: String,

    /// QRコードの中身
    #[serde(rename = "Email", default, deserialize_with = "null_as_empty")]
    pub email: String,

    /// 記念品ラベル（印刷シートのみ）
    #[serde(rename = "Souvenir", default, skip_serializing_if = "Option::is_none")]
    pub souvenir: Option<String>,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
            email: email.into(),
            souvenir: None,
        }
    }

    pub fn with_souvenir(mut self, souvenir: impl Into<String>) -> Self {
        self.souvenir = Some(souvenir.into());
        self
    }

    /// メールアドレスが空のレコードはカードにできない（空白のみは空扱いしない）
    pub fn is_renderable(&self) -> bool {
        !self.email.is_empty()
    }

    /// 空文字の記念品は「なし」と同じ扱い
    pub fn souvenir_label(&self) -> Option<&str> {
        self.souvenir.as_deref().filter(|s| !s.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 所属欄の表示ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLabels {
    pub name: &'static str,
    pub affiliation: &'static str,
}

impl FieldLabels {
    /// Printed版（所属 = Affiliation）
    pub const AFFILIATION: FieldLabels = FieldLabels {
        name: "Full Name",
        affiliation: "Affiliation",
    };

    /// Digital版（所属 = Company）
    pub const COMPANY: FieldLabels = FieldLabels {
        name: "Full Name",
        affiliation: "Company",
    };
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self::AFFILIATION
    }
}

/// JSON配列をレコード列としてパース
pub fn parse_records(text: &str) -> crate::Result<Vec<PersonRecord>> {
    // BOM付きで保存されたファイル対策
    let text = text.trim_start_matches('\u{feff}');
    Ok(serde_json::from_str(text)?)
}
