//! LS-8 program image format.
//!
//! A simple text-based format:
//! - One byte per line, written as binary digits (`10000010`)
//! - Everything after `#` is a comment
//! - Blank lines are ignored

use crate::asm::disasm;
use std::path::Path;
use std::io::{BufRead, BufReader, Write};
use thiserror::Error;

/// Parse image text into bytes.
pub fn parse_image(source: &str) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    for (line_num, line) in source.lines().enumerate() {
        if let Some(byte) = parse_line(line, line_num + 1)? {
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

/// Load an image file from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ImageError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| ImageError::IoError(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut bytes = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ImageError::IoError(e.to_string()))?;
        if let Some(byte) = parse_line(&line, line_num + 1)? {
            bytes.push(byte);
        }
    }

    Ok(bytes)
}

/// Save an image to disk, annotated with its disassembly.
pub fn save_image<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), ImageError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| ImageError::IoError(e.to_string()))?;
    file.write_all(format_image(bytes).as_bytes())
        .map_err(|e| ImageError::IoError(e.to_string()))
}

/// Render bytes in image format.
///
/// The first byte of each instruction carries its disassembly as a comment.
pub fn format_image(bytes: &[u8]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# LS-8 image, {} bytes\n\n", bytes.len()));

    let mut notes = disasm::listing(bytes).into_iter().peekable();
    for (addr, byte) in bytes.iter().enumerate() {
        match notes.next_if(|(at, _)| *at == addr) {
            Some((_, text)) => output.push_str(&format!("{:08b} # {:02X}: {}\n", byte, addr, text)),
            None => output.push_str(&format!("{:08b}\n", byte)),
        }
    }

    output
}

fn parse_line(line: &str, line_num: usize) -> Result<Option<u8>, ImageError> {
    let code = line.split('#').next().unwrap_or("").trim();
    if code.is_empty() {
        return Ok(None);
    }

    if code.len() > 8 || !code.chars().all(|c| c == '0' || c == '1') {
        return Err(ImageError::ParseError {
            line: line_num,
            message: format!("expected up to 8 binary digits, found `{}`", code),
        });
    }

    u8::from_str_radix(code, 2)
        .map(Some)
        .map_err(|e| ImageError::ParseError {
            line: line_num,
            message: e.to_string(),
        })
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_print8() {
        let source = "\
# print8.ls8
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000

00000001 # HLT
";
        assert_eq!(parse_image(source).unwrap(), vec![0x82, 0, 8, 0x47, 0, 1]);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = parse_image("00000001\n0000002\n").unwrap_err();
        assert!(matches!(err, ImageError::ParseError { line: 2, .. }));

        let err = parse_image("111111111\n").unwrap_err();
        assert!(matches!(err, ImageError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_format_is_parseable() {
        let bytes = [0x82, 0, 8, 0x47, 0, 1];
        let text = format_image(&bytes);
        assert!(text.contains("LDI R0,0x08"));
        assert!(text.contains("PRN R0"));
        assert_eq!(parse_image(&text).unwrap(), bytes);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ls8-image-{}.ls8", std::process::id()));
        save_image(&path, &[0x82, 1, 2, 0x01]).unwrap();
        let bytes = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(bytes, vec![0x82, 1, 2, 0x01]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image("/definitely/not/here.ls8").unwrap_err();
        assert!(matches!(err, ImageError::IoError(_)));
    }
}
