//! Legacy Word (97-2003 `.doc`) extractor.
//!
//! A `.doc` file is an OLE2 compound file. The text lives in the
//! `WordDocument` stream, split into pieces described by the piece
//! table (CLX) stored in the `0Table` or `1Table` stream. The File
//! Information Block (FIB) at the start of `WordDocument` says which
//! table stream is in use and where the CLX is.
//!
//! The document title comes from the `\u{5}SummaryInformation`
//! property set when the author filled it in.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use cfb::CompoundFile;
use thiserror::Error;

use crate::core::error::{IndexerError, Result};
use crate::core::extract::{
    mb_to_bytes, modified_time, read_limited, stem_title, ContentExtractor, FilePatterns,
    DEFAULT_MAX_FILE_SIZE_MB,
};
use crate::core::types::DocumentRecord;

const WORD_STREAM: &str = "WordDocument";
const TABLE0_STREAM: &str = "0Table";
const TABLE1_STREAM: &str = "1Table";
const SUMMARY_STREAM: &str = "\u{5}SummaryInformation";

const FIB_MAGIC: u16 = 0xA5EC;
const FIB_FLAGS: usize = 0x000A;
const FIB_CCP_TEXT: usize = 0x004C;
const FIB_FC_CLX: usize = 0x01A2;
const FIB_LCB_CLX: usize = 0x01A6;
const FIB_MIN_LEN: usize = FIB_LCB_CLX + 4;

const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;

const FC_COMPRESSED: u32 = 0x4000_0000;
const FC_MASK: u32 = 0x3FFF_FFFF;

const PID_CODEPAGE: u32 = 1;
const PID_TITLE: u32 = 2;
const VT_LPSTR: u32 = 0x1E;
const VT_LPWSTR: u32 = 0x1F;

/// Parse failures inside a `.doc` file
#[derive(Error, Debug)]
pub enum WordError {
    #[error("not an OLE2 compound file: {0}")]
    NotCompound(std::io::Error),

    #[error("missing {0} stream")]
    MissingStream(&'static str),

    #[error("bad FIB magic {0:#06x}")]
    BadMagic(u16),

    #[error("document is encrypted")]
    Encrypted,

    #[error("truncated {0}")]
    Truncated(&'static str),

    #[error("corrupt piece table: {0}")]
    BadPieceTable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

type WordResult<T> = std::result::Result<T, WordError>;

/// Indexes Word 97-2003 binary documents
#[derive(Debug, Clone)]
pub struct WordExtractor {
    patterns: FilePatterns,
    max_file_size_bytes: u64,
}

impl WordExtractor {
    pub const NAME: &'static str = "word";

    /// Create a Word extractor for the given file patterns
    pub fn new(patterns: &[String], max_file_size_mb: usize) -> Result<Self> {
        Ok(Self {
            patterns: FilePatterns::new(patterns)?,
            max_file_size_bytes: mb_to_bytes(max_file_size_mb),
        })
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self {
            patterns: FilePatterns::new(default_patterns())
                .unwrap_or_else(|_| unreachable!("built-in patterns are valid")),
            max_file_size_bytes: mb_to_bytes(DEFAULT_MAX_FILE_SIZE_MB),
        }
    }
}

/// Patterns claimed by default
pub fn default_patterns() -> Vec<String> {
    vec!["*.doc".to_string()]
}

impl ContentExtractor for WordExtractor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, path: &Path) -> bool {
        self.patterns.matches(path)
    }

    fn extract(&self, path: &Path) -> Result<DocumentRecord> {
        let bytes = read_limited(path, self.max_file_size_bytes, Self::NAME)?;
        let document =
            parse_document(Cursor::new(bytes)).map_err(|e| IndexerError::extraction(path, Self::NAME, e))?;

        let title = document.title.unwrap_or_else(|| stem_title(path));

        Ok(DocumentRecord::standard(
            path,
            Self::NAME,
            title,
            document.text,
            modified_time(path),
        ))
    }
}

/// Text and metadata pulled out of a `.doc`
#[derive(Debug, Clone, PartialEq)]
pub struct WordDocument {
    pub title: Option<String>,
    pub text: String,
}

/// Parse a `.doc` from any seekable reader
pub fn parse_document<R: Read + Seek>(reader: R) -> WordResult<WordDocument> {
    let mut compound = CompoundFile::open(reader).map_err(WordError::NotCompound)?;

    let word = read_stream(&mut compound, WORD_STREAM)?;
    let fib = Fib::parse(&word)?;
    if fib.encrypted {
        return Err(WordError::Encrypted);
    }

    let table_name = if fib.which_table {
        TABLE1_STREAM
    } else {
        TABLE0_STREAM
    };
    let table = read_stream(&mut compound, table_name)?;

    let pieces = parse_clx(&table, fib.fc_clx, fib.lcb_clx)?;
    let raw = decode_pieces(&word, &pieces, fib.ccp_text)?;

    let title = if compound.is_stream(SUMMARY_STREAM) {
        read_stream(&mut compound, SUMMARY_STREAM)
            .ok()
            .and_then(|summary| summary_title(&summary))
    } else {
        None
    };

    Ok(WordDocument {
        title,
        text: normalize_text(&raw),
    })
}

fn read_stream<F: Read + Seek>(
    compound: &mut CompoundFile<F>,
    name: &'static str,
) -> WordResult<Vec<u8>> {
    if !compound.is_stream(name) {
        return Err(WordError::MissingStream(name));
    }
    let mut stream = compound.open_stream(name)?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    Ok(buf)
}

/// The FIB fields needed to find the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fib {
    encrypted: bool,
    which_table: bool,
    ccp_text: u32,
    fc_clx: u32,
    lcb_clx: u32,
}

impl Fib {
    fn parse(word: &[u8]) -> WordResult<Self> {
        if word.len() < FIB_MIN_LEN {
            return Err(WordError::Truncated("FIB"));
        }
        let truncated = || WordError::Truncated("FIB");

        let ident = u16_at(word, 0).ok_or_else(truncated)?;
        if ident != FIB_MAGIC {
            return Err(WordError::BadMagic(ident));
        }
        let flags = u16_at(word, FIB_FLAGS).ok_or_else(truncated)?;

        Ok(Self {
            encrypted: flags & FLAG_ENCRYPTED != 0,
            which_table: flags & FLAG_WHICH_TABLE != 0,
            ccp_text: u32_at(word, FIB_CCP_TEXT).ok_or_else(truncated)?,
            fc_clx: u32_at(word, FIB_FC_CLX).ok_or_else(truncated)?,
            lcb_clx: u32_at(word, FIB_LCB_CLX).ok_or_else(truncated)?,
        })
    }
}

/// A run of characters stored contiguously in `WordDocument`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    cp_start: u32,
    cp_end: u32,
    /// Byte offset into `WordDocument`
    offset: u32,
    /// One byte per character (Windows-1252) instead of UTF-16LE
    compressed: bool,
}

/// Skip the Prc entries and parse the PlcPcd that follows
fn parse_clx(table: &[u8], fc: u32, lcb: u32) -> WordResult<Vec<Piece>> {
    let start = fc as usize;
    let end = start
        .checked_add(lcb as usize)
        .ok_or(WordError::Truncated("CLX"))?;
    let clx = table.get(start..end).ok_or(WordError::Truncated("CLX"))?;

    let mut pos = 0usize;
    loop {
        match clx.get(pos) {
            Some(0x01) => {
                let cb = u16_at(clx, pos + 1).ok_or(WordError::Truncated("Prc"))?;
                pos += 3 + cb as usize;
            }
            Some(0x02) => {
                let lcb = u32_at(clx, pos + 1).ok_or(WordError::Truncated("Pcdt"))? as usize;
                let plc = clx
                    .get(pos + 5..pos + 5 + lcb)
                    .ok_or(WordError::Truncated("PlcPcd"))?;
                return parse_plc_pcd(plc);
            }
            Some(other) => {
                return Err(WordError::BadPieceTable(format!(
                    "unexpected clxt {other:#04x}"
                )))
            }
            None => return Err(WordError::BadPieceTable("no Pcdt entry".to_string())),
        }
    }
}

fn parse_plc_pcd(plc: &[u8]) -> WordResult<Vec<Piece>> {
    if plc.len() < 4 || (plc.len() - 4) % 12 != 0 {
        return Err(WordError::BadPieceTable(format!(
            "PlcPcd length {} is not 4 + 12n",
            plc.len()
        )));
    }
    let count = (plc.len() - 4) / 12;
    let descriptors = 4 * (count + 1);

    let mut pieces = Vec::with_capacity(count);
    for i in 0..count {
        let cp_start = u32_at(plc, 4 * i).ok_or(WordError::Truncated("PlcPcd"))?;
        let cp_end = u32_at(plc, 4 * (i + 1)).ok_or(WordError::Truncated("PlcPcd"))?;
        if cp_end < cp_start {
            return Err(WordError::BadPieceTable(format!(
                "piece {i} ends before it starts"
            )));
        }

        let fc_raw = u32_at(plc, descriptors + 8 * i + 2).ok_or(WordError::Truncated("Pcd"))?;
        let compressed = fc_raw & FC_COMPRESSED != 0;
        let fc = fc_raw & FC_MASK;

        pieces.push(Piece {
            cp_start,
            cp_end,
            offset: if compressed { fc / 2 } else { fc },
            compressed,
        });
    }
    Ok(pieces)
}

/// Decode the first `ccp_text` characters (the main document)
fn decode_pieces(word: &[u8], pieces: &[Piece], ccp_text: u32) -> WordResult<String> {
    let mut out = String::new();
    let mut remaining = ccp_text as usize;

    for piece in pieces {
        if remaining == 0 {
            break;
        }
        let count = ((piece.cp_end - piece.cp_start) as usize).min(remaining);
        let start = piece.offset as usize;

        if piece.compressed {
            let end = start
                .checked_add(count)
                .ok_or(WordError::Truncated("text piece"))?;
            let bytes = word
                .get(start..end)
                .ok_or(WordError::Truncated("text piece"))?;
            out.extend(bytes.iter().map(|&b| cp1252_char(b)));
        } else {
            let end = count
                .checked_mul(2)
                .and_then(|len| start.checked_add(len))
                .ok_or(WordError::Truncated("text piece"))?;
            let bytes = word
                .get(start..end)
                .ok_or(WordError::Truncated("text piece"))?;
            out.extend(decode_utf16le(bytes));
        }
        remaining -= count;
    }

    Ok(out)
}

/// Map Word control characters to plain text
///
/// Paragraph, line and page breaks become newlines and cell marks
/// become tabs. Field instructions (between 0x13 and 0x14) are
/// dropped; field results (between 0x14 and 0x15) are kept.
fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // One entry per open field: true while inside its instruction part
    let mut fields: Vec<bool> = Vec::new();

    for c in raw.chars() {
        match c {
            '\u{13}' => fields.push(true),
            '\u{14}' => {
                if let Some(in_instruction) = fields.last_mut() {
                    *in_instruction = false;
                }
            }
            '\u{15}' => {
                fields.pop();
            }
            _ if fields.iter().any(|&in_instruction| in_instruction) => {}
            '\r' | '\u{0B}' | '\u{0C}' => out.push('\n'),
            '\u{07}' => out.push('\t'),
            '\u{1E}' => out.push('-'),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out.trim().to_string()
}

/// Title from a SummaryInformation property set stream
fn summary_title(stream: &[u8]) -> Option<String> {
    if u16_at(stream, 0)? != 0xFFFE || u32_at(stream, 24)? == 0 {
        return None;
    }
    let section = u32_at(stream, 44)? as usize;
    let property_count = u32_at(stream, section + 4)? as usize;

    let mut codepage = None;
    let mut title_at = None;
    for i in 0..property_count.min(1024) {
        let entry = section + 8 + 8 * i;
        let id = u32_at(stream, entry)?;
        let offset = section + u32_at(stream, entry + 4)? as usize;
        match id {
            PID_CODEPAGE => codepage = u16_at(stream, offset + 4),
            PID_TITLE => title_at = Some(offset),
            _ => {}
        }
    }

    let at = title_at?;
    let len = u32_at(stream, at + 4)? as usize;
    let title: String = match u32_at(stream, at)? {
        VT_LPSTR => {
            let bytes = stream.get(at + 8..at + 8 + len)?;
            match codepage {
                Some(1200) => decode_utf16le(bytes).collect(),
                Some(65001) => String::from_utf8_lossy(bytes).into_owned(),
                _ => bytes.iter().map(|&b| cp1252_char(b)).collect(),
            }
        }
        VT_LPWSTR => decode_utf16le(stream.get(at + 8..at + 8 + 2 * len)?).collect(),
        _ => return None,
    };

    let title = title.trim_end_matches('\0').trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn decode_utf16le(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
}

/// Windows-1252 to Unicode
fn cp1252_char(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}',
        '\u{017D}', '\u{008F}', '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
    ];
    match byte {
        0x80..=0x9F => HIGH[(byte - 0x80) as usize],
        _ => char::from(byte),
    }
}

fn u16_at(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
