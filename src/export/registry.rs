//! 描画済みカードの登録表（インデックス → カード）
//!
//! 各カードはマウント時に自分の位置へ登録し、エクスポート中は読み取りのみ。
//! キーはメールアドレスではなく並び順なので、重複メールもそのまま扱える。

use crate::error::Result;
use crate::render::{render_card, CardView};
use philsan_qr_common::{CardVariant, FieldLabels, PersonRecord};

#[derive(Debug, Default)]
pub struct RenderTargetRegistry {
    slots: Vec<Option<CardView>>,
}

impl RenderTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// 全レコードを描画して位置ごとに登録（描画できないものは未登録）
    pub fn mount_records(
        records: &[PersonRecord],
        variant: CardVariant,
        labels: FieldLabels,
    ) -> Result<Self> {
        let mut registry = Self::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match render_card(record, variant, labels)? {
                Some(view) => registry.mount(index, view),
                None => tracing::warn!(index, name = %record.name, "メールアドレスが空のためカードを作成しません"),
            }
        }
        Ok(registry)
    }

    pub fn mount(&mut self, index: usize, view: CardView) {
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(view);
    }

    pub fn unmount(&mut self, index: usize) -> Option<CardView> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&CardView> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// 登録済みの枚数
    pub fn mounted(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted() == 0
    }
}
