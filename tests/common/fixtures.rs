// Test fixtures for integration testing

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Word 97 FIB layout
const FIB_MAGIC: u16 = 0xA5EC;
const FIB_FLAGS: usize = 0x000A;
const FIB_CCP_TEXT: usize = 0x004C;
const FIB_FC_CLX: usize = 0x01A2;
const FIB_LCB_CLX: usize = 0x01A6;
const FLAG_WHICH_TABLE: u16 = 0x0200;
const FC_COMPRESSED: u32 = 0x4000_0000;
const TEXT_OFFSET: usize = 0x200;

/// A document directory and an index directory, both temporary
#[allow(dead_code)] // Used in integration tests
pub struct TestDocs {
    pub docs: TempDir,
    pub index: TempDir,
}

#[allow(dead_code)] // Used in integration tests
impl TestDocs {
    pub fn new() -> Self {
        Self {
            docs: TempDir::new().unwrap(),
            index: TempDir::new().unwrap(),
        }
    }

    /// Recipe collection: two text recipes, a Word recipe, a nested
    /// folder and an empty folder
    pub fn recipes() -> Self {
        Self::new()
            .with_text("soups/tomato.txt", "Tomato Soup\n\nSimmer tomatoes with basil.")
            .with_text("bread.txt", "Sourdough Bread\n\nFeed the starter overnight.")
            .with_doc("desserts/flan.doc", "Caramel flan with vanilla custard")
            .with_dir("drafts")
    }

    pub fn with_text(self, relative: &str, content: &str) -> Self {
        let path = self.prepare(relative);
        fs::write(path, content).unwrap();
        self
    }

    pub fn with_bytes(self, relative: &str, content: &[u8]) -> Self {
        let path = self.prepare(relative);
        fs::write(path, content).unwrap();
        self
    }

    /// Write a minimal Word 97 document holding `text`
    pub fn with_doc(self, relative: &str, text: &str) -> Self {
        let path = self.prepare(relative);
        let mut compound = cfb::create(&path).unwrap();
        let (word, table) = legacy_doc_bytes(text);
        compound
            .create_stream("WordDocument")
            .unwrap()
            .write_all(&word)
            .unwrap();
        compound
            .create_stream("1Table")
            .unwrap()
            .write_all(&table)
            .unwrap();
        compound.flush().unwrap();
        self
    }

    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.docs.path().join(relative)).unwrap();
        self
    }

    pub fn doc_dir(&self) -> &Path {
        self.docs.path()
    }

    pub fn index_dir(&self) -> PathBuf {
        self.index.path().join("index")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        std::path::absolute(self.docs.path().join(relative)).unwrap()
    }

    fn prepare(&self, relative: &str) -> PathBuf {
        let path = self.docs.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        path
    }
}

/// `WordDocument` and `1Table` streams for a document whose text is a
/// single cp1252 piece
#[allow(dead_code)] // Used in integration tests
pub fn legacy_doc_bytes(text: &str) -> (Vec<u8>, Vec<u8>) {
    let text = text.as_bytes();

    let mut word = vec![0u8; TEXT_OFFSET];
    word[0..2].copy_from_slice(&FIB_MAGIC.to_le_bytes());
    word[FIB_FLAGS..FIB_FLAGS + 2].copy_from_slice(&FLAG_WHICH_TABLE.to_le_bytes());
    word[FIB_CCP_TEXT..FIB_CCP_TEXT + 4].copy_from_slice(&(text.len() as u32).to_le_bytes());
    word[FIB_FC_CLX..FIB_FC_CLX + 4].copy_from_slice(&0u32.to_le_bytes());
    word[FIB_LCB_CLX..FIB_LCB_CLX + 4].copy_from_slice(&21u32.to_le_bytes());
    word.extend_from_slice(text);

    let mut table = vec![0x02];
    table.extend_from_slice(&16u32.to_le_bytes());
    table.extend_from_slice(&0u32.to_le_bytes());
    table.extend_from_slice(&(text.len() as u32).to_le_bytes());
    table.extend_from_slice(&[0, 0]);
    table.extend_from_slice(&(((TEXT_OFFSET as u32) * 2) | FC_COMPRESSED).to_le_bytes());
    table.extend_from_slice(&[0, 0]);

    (word, table)
}
