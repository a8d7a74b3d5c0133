//! ZIPアーカイブ組み立て
//!
//! エントリはメモリ上に挿入順で保持し、最後に1つのZIPへ書き出す。
//! 同名エントリは後勝ちで上書きし、位置は最初の挿入位置のまま。

use crate::error::Result;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug)]
struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<ArchiveEntry>,
    positions: HashMap<String, usize>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを追加。既存の同名エントリを置き換えた場合は true。
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) -> bool {
        let name = name.into();
        if let Some(&position) = self.positions.get(&name) {
            self.entries[position].data = data;
            return true;
        }
        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push(ArchiveEntry { name, data });
        false
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// エントリ名（挿入順）
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// ZIPバイト列として確定
    pub fn finish(self) -> Result<Vec<u8>> {
        // PNGは圧縮済み。タイムスタンプ固定で同じ入力から同じZIPになる。
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(zip::DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in self.entries {
            writer.start_file(entry.name, options)?;
            writer.write_all(&entry.data)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_back(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut builder = ArchiveBuilder::new();
        builder.insert("c_qr.png", vec![3]);
        builder.insert("a_qr.png", vec![1]);
        builder.insert("b_qr.png", vec![2]);

        let entries = read_back(builder.finish().unwrap());
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["c_qr.png", "a_qr.png", "b_qr.png"]);
    }

    #[test]
    fn test_same_name_last_write_wins() {
        let mut builder = ArchiveBuilder::new();
        assert!(!builder.insert("A_qr.png", vec![1]));
        assert!(!builder.insert("B_qr.png", vec![2]));
        assert!(builder.insert("B_qr.png", vec![3]));
        assert_eq!(builder.len(), 2);

        let entries = read_back(builder.finish().unwrap());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], ("B_qr.png".to_string(), vec![3]));
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
        assert!(read_back(builder.finish().unwrap()).is_empty());
    }

    #[test]
    fn test_finish_is_deterministic() {
        let build = || {
            let mut builder = ArchiveBuilder::new();
            builder.insert("x_qr.png", vec![1, 2, 3]);
            builder.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
