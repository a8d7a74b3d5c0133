use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrBadgeError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ストレージの接続情報が設定されていません。`philsan-qr config --set-storage-url URL --set-storage-key KEY` または環境変数 PHILSAN_STORAGE_URL / PHILSAN_STORAGE_KEY で設定してください")]
    MissingStorageCredentials,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("データ取得エラー: {0}")]
    Fetch(String),

    #[error("QRコード生成エラー: {0}")]
    QrEncode(String),

    #[error("カード描画エラー: {0}")]
    Render(String),

    #[error("画像化エラー: {0}")]
    Rasterize(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error("ZIP生成エラー: {0}")]
    Archive(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] philsan_qr_common::Error),
}

impl From<zip::result::ZipError> for QrBadgeError {
    fn from(err: zip::result::ZipError) -> Self {
        QrBadgeError::Archive(err.to_string())
    }
}

impl From<reqwest::Error> for QrBadgeError {
    fn from(err: reqwest::Error) -> Self {
        QrBadgeError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QrBadgeError>;
