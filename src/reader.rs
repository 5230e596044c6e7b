use std::io::ErrorKind;
use std::path::Path;

/// Outcome of reading one research file.
///
/// Callers drop both `Missing` and `Unreadable` from the bundle; the split
/// only matters for reporting.
#[derive(Debug)]
pub enum SourceText {
    /// Nothing at the path.
    Missing,
    /// The path exists but could not be read.
    Unreadable(std::io::Error),
    /// Decoded, newline-normalized text.
    Text(String),
}

impl SourceText {
    pub fn text(&self) -> Option<&str> {
        match self {
            SourceText::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// Read a research file as text.
///
/// UTF-8 is tried first; anything that is not valid UTF-8 is decoded as
/// Latin-1, which accepts every byte sequence. `\r\n` and lone `\r` become `\n`.
pub fn read_source(path: &Path) -> SourceText {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return SourceText::Missing,
        Err(e) => return SourceText::Unreadable(e),
    };

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            crate::debug_log!(
                "[research-compiler] DEBUG: {} is not UTF-8, decoding as Latin-1",
                path.display()
            );
            decode_latin1(e.as_bytes())
        }
    };

    SourceText::Text(normalize_newlines(text))
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
