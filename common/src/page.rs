//! ページ分割（印刷シート用）
//!
//! レコード列を固定長のページに切り分ける。順序は変えない。

use std::num::NonZeroUsize;

/// 1ページ分のスライス
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 0始まりのページ番号
    pub number: usize,
    /// 先頭レコードの全体インデックス
    pub offset: usize,
    pub records: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (全体インデックス, レコード) を順に返す
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(slot, record)| (self.offset + slot, record))
    }
}

// derive(Clone, Copy) だと T: Clone を要求してしまうため手書き
impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Page<'_, T> {}

/// `page_size` 件ずつに分割（最終ページは短くてもよい）
pub fn paginate<T>(records: &[T], page_size: NonZeroUsize) -> Vec<Page<'_, T>> {
    records
        .chunks(page_size.get())
        .enumerate()
        .map(|(number, chunk)| Page {
            number,
            offset: number * page_size.get(),
            records: chunk,
        })
        .collect()
}

/// グリッド表示用: 全件を1ページとして扱う
pub fn single_page<T>(records: &[T]) -> Page<'_, T> {
    Page {
        number: 0,
        offset: 0,
        records,
    }
}
