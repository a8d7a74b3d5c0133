use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "philsan-qr")]
#[command(about = "Philsan QRバッジ・ステッカー一括生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Printed版: 同梱JSONからグリッドカードを生成してZIP出力
    Printed {
        /// 入力JSONファイル（省略時は設定の static_data_path）
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 画像化の倍率（1.0 = 96dpi）
        #[arg(long)]
        scale: Option<f32>,
    },

    /// Digital版: バケットからデータを取得してステッカーシートを生成
    Digital {
        /// バケット名（省略時は設定値）
        #[arg(long)]
        bucket: Option<String>,

        /// バケット内のオブジェクトキー（省略時は設定値）
        #[arg(long)]
        object: Option<String>,

        /// バケットの代わりにローカルJSONを使う
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (zip/pdf/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// PDFタイトル（ファイル名にも使用）
        #[arg(short, long, default_value = "philsan_stickers")]
        title: String,

        /// PDF画像品質 (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,

        /// 画像化の倍率（1.0 = 96dpi）
        #[arg(long)]
        scale: Option<f32>,

        /// 取得失敗時の再試行回数
        #[arg(long)]
        retries: Option<u32>,
    },

    /// 1名分のカードをプレビュー
    Preview {
        /// 氏名
        #[arg(long)]
        name: Option<String>,

        /// メールアドレス（QRコードの中身）
        #[arg(long)]
        email: Option<String>,

        /// 所属
        #[arg(long)]
        affiliation: Option<String>,

        /// 出力PNG
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// 対話的に入力する
        #[arg(short = 'I', long)]
        interactive: bool,
    },

    /// 設定を表示/編集
    Config {
        /// ストレージのURLを設定
        #[arg(long)]
        set_storage_url: Option<String>,

        /// ストレージのキーを設定
        #[arg(long)]
        set_storage_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Zip,
    Pdf,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn includes_zip(&self) -> bool {
        matches!(self, ExportFormat::Zip | ExportFormat::Both)
    }

    pub fn includes_pdf(&self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Both)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(ExportFormat::Zip),
            "pdf" | "print" => Ok(ExportFormat::Pdf),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use zip, pdf, or both", s)),
        }
    }
}

/// PDF画像品質設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PdfQuality {
    /// 高品質: 300dpi, 85%
    High,
    /// 中品質: 200dpi, 75%（デフォルト）
    #[default]
    Medium,
    /// 低品質: 150dpi, 60%
    Low,
}

impl PdfQuality {
    /// シートを画像化する解像度
    pub fn dpi(&self) -> f32 {
        match self {
            PdfQuality::High => 300.0,
            PdfQuality::Medium => 200.0,
            PdfQuality::Low => 150.0,
        }
    }

    /// JPEG品質 (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PdfQuality::High => 85,
            PdfQuality::Medium => 75,
            PdfQuality::Low => 60,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}
