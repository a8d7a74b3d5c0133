//! Philsan QR Common Library
//!
//! CLIとレンダラで共有される型・レイアウト定数・ページ分割

pub mod types;
pub mod layout;
pub mod error;
pub mod page;
pub mod export;

pub use types::{PersonRecord, FieldLabels, parse_records};
pub use layout::{CardGeometry, CardVariant, SheetLayout};
pub use error::{Error, Result};
pub use page::{paginate, single_page, Page};
