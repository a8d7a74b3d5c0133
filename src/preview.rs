//! 単体プレビュー（フォーム入力 → カード）
//!
//! 入力が変わるたびに描画し直す。メールアドレスが空の間はカードを出さない。

use crate::error::{QrBadgeError, Result};
use crate::render::{encode_png, render_card, CardView, Rasterizer};
use dialoguer::Input;
use philsan_qr_common::{CardVariant, FieldLabels, PersonRecord};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewForm {
    record: PersonRecord,
    labels: FieldLabels,
}

impl PreviewForm {
    pub fn new(labels: FieldLabels) -> Self {
        Self {
            record: PersonRecord::default(),
            labels,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.record.email = email.into();
    }

    pub fn set_affiliation(&mut self, affiliation: impl Into<String>) {
        self.record.affiliation = affiliation.into();
    }

    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    /// 現在の入力で描画したカード
    pub fn card(&self) -> Result<Option<CardView>> {
        render_card(&self.record, CardVariant::Interactive, self.labels)
    }

    /// カードをPNGで保存。カードが出ない状態なら以前のPNGを消して false。
    pub fn save_png<R>(&self, rasterizer: &R, output: &Path) -> Result<bool>
    where
        R: Rasterizer + ?Sized,
    {
        let Some(card) = self.card()? else {
            match std::fs::remove_file(output) {
                Ok(()) => tracing::debug!(path = %output.display(), "古いプレビューを削除"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Ok(false);
        };
        let bitmap = rasterizer.rasterize(&card)?;
        std::fs::write(output, encode_png(&bitmap)?)?;
        Ok(true)
    }

    /// 1項目ずつ入力させ、その都度プレビューを書き出す
    pub fn run_interactive<R>(&mut self, rasterizer: &R, output: &Path) -> Result<()>
    where
        R: Rasterizer + ?Sized,
    {
        let name = prompt(self.labels.name, &self.record.name)?;
        self.set_name(name);
        self.refresh(rasterizer, output)?;

        let email = prompt("Email", &self.record.email)?;
        self.set_email(email);
        self.refresh(rasterizer, output)?;

        let affiliation = prompt(self.labels.affiliation, &self.record.affiliation)?;
        self.set_affiliation(affiliation);
        self.refresh(rasterizer, output)?;

        Ok(())
    }

    fn refresh<R>(&self, rasterizer: &R, output: &Path) -> Result<()>
    where
        R: Rasterizer + ?Sized,
    {
        if self.save_png(rasterizer, output)? {
            println!("  → プレビュー更新: {}", output.display());
        } else {
            println!("  （メールアドレス未入力のためカードは表示されません）");
        }
        Ok(())
    }
}

fn prompt(label: &str, current: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| QrBadgeError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SvgCanvas;
    use image::RgbaImage;

    struct BlankRasterizer;

    impl Rasterizer for BlankRasterizer {
        fn rasterize(&self, canvas: &SvgCanvas) -> Result<RgbaImage> {
            Ok(RgbaImage::new(canvas.width_px as u32, canvas.height_px as u32))
        }
    }

    #[test]
    fn test_no_card_until_email_entered() {
        let mut form = PreviewForm::new(FieldLabels::AFFILIATION);
        form.set_name("Juan");
        form.set_affiliation("UP");
        assert!(form.card().unwrap().is_none());

        form.set_email("juan@example.com");
        assert!(form.card().unwrap().is_some());

        form.set_email("");
        assert!(form.card().unwrap().is_none());
    }

    #[test]
    fn test_card_reflects_latest_input() {
        let mut form = PreviewForm::new(FieldLabels::AFFILIATION);
        form.set_email("a@x.com");
        form.set_name("First");
        form.set_name("Second");

        let svg = form.card().unwrap().unwrap().to_svg();
        assert!(svg.contains("Second"));
        assert!(!svg.contains("First"));
        assert_eq!(form.record().name, "Second");
    }

    #[test]
    fn test_save_png_skips_without_email() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("preview.png");
        let form = PreviewForm::new(FieldLabels::AFFILIATION);

        assert!(!form.save_png(&BlankRasterizer, &output).unwrap());
        assert!(!output.exists());
    }

    #[test]
    fn test_clearing_email_removes_previous_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("preview.png");
        let mut form = PreviewForm::new(FieldLabels::AFFILIATION);

        form.set_email("old@x.com");
        form.refresh(&BlankRasterizer, &output).unwrap();
        assert!(output.exists());

        form.set_email("");
        form.refresh(&BlankRasterizer, &output).unwrap();
        assert!(form.card().unwrap().is_none());
        assert!(!output.exists(), "古いQRのプレビューが残っている");
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("preview.png");
        let mut form = PreviewForm::new(FieldLabels::AFFILIATION);
        form.set_email("a@x.com");

        assert!(form.save_png(&BlankRasterizer, &output).unwrap());
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
