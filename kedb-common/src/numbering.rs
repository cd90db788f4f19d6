//! KEDB identifier allocation
//!
//! Identifiers are `KEDB` followed by a four-digit, zero-padded sequence
//! number. The next identifier is derived from the files already present in
//! the output directory: the highest parsed number plus one, or `KEDB0001`
//! when the directory holds no generated documents.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{Error, Result};

/// Identifier prefix shared by every document
pub const PREFIX: &str = "KEDB";

/// File extension of generated documents
pub const EXTENSION: &str = "docx";

/// Largest number that still renders as four digits
pub const MAX_NUMBER: u32 = 9999;

/// Output file names, anchored at the start only
static FILE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^KEDB(\d{4})\.docx").expect("valid file name pattern"));

/// Bare identifiers such as `KEDB0042`
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^KEDB(\d{4})$").expect("valid identifier pattern"));

/// Sequential KEDB document number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KedbNumber(u32);

impl KedbNumber {
    /// First number handed out in an empty output directory
    pub const FIRST: KedbNumber = KedbNumber(1);

    /// Create a number, rejecting values outside `1..=9999`
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(Error::InvalidInput("KEDB numbers start at 1".to_string()));
        }
        if value > MAX_NUMBER {
            return Err(Error::IdentifierSpaceExhausted(MAX_NUMBER));
        }
        Ok(Self(value))
    }

    /// Raw sequence value
    pub fn value(self) -> u32 {
        self.0
    }

    /// Following number, or an error past `KEDB9999`
    pub fn next(self) -> Result<Self> {
        if self.0 >= MAX_NUMBER {
            return Err(Error::IdentifierSpaceExhausted(self.0));
        }
        Ok(Self(self.0 + 1))
    }

    /// Parse a bare identifier (`KEDB0042`)
    pub fn parse(identifier: &str) -> Result<Self> {
        IDENTIFIER_PATTERN
            .captures(identifier)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .and_then(|value| KedbNumber::new(value).ok())
            .ok_or_else(|| Error::InvalidInput(format!("Not a KEDB identifier: {}", identifier)))
    }

    /// Output file name (`KEDB0042.docx`)
    pub fn file_name(self) -> String {
        format!("{}.{}", self, EXTENSION)
    }
}

impl fmt::Display for KedbNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", PREFIX, self.0)
    }
}

impl Serialize for KedbNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extract the number from an output file name
///
/// Returns `None` for anything that does not start with `KEDB####.docx`,
/// and for `KEDB0000.docx`, which is outside the number range.
pub fn parse_file_name(name: &str) -> Option<KedbNumber> {
    FILE_NAME_PATTERN
        .captures(name)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .and_then(|value| KedbNumber::new(value).ok())
}

/// Highest number among the given file names
pub fn highest_number<'a, I>(names: I) -> Option<KedbNumber>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().filter_map(parse_file_name).max()
}

/// Compute the next identifier for `dir`
///
/// Creates the directory if it does not exist yet.
pub fn next_number(dir: &Path) -> Result<KedbNumber> {
    std::fs::create_dir_all(dir)?;

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    let next = match highest_number(names.iter().map(String::as_str)) {
        Some(highest) => highest.next()?,
        None => KedbNumber::FIRST,
    };

    debug!("Next KEDB number in {}: {}", dir.display(), next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_display_zero_pads() {
        assert_eq!(KedbNumber(1).to_string(), "KEDB0001");
        assert_eq!(KedbNumber(42).to_string(), "KEDB0042");
        assert_eq!(KedbNumber(9999).to_string(), "KEDB9999");
        assert_eq!(KedbNumber(7).file_name(), "KEDB0007.docx");
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(parse_file_name("KEDB0001.docx"), Some(KedbNumber(1)));
        assert_eq!(parse_file_name("KEDB0120.docx"), Some(KedbNumber(120)));
        // Anchored at the start only, trailing text is tolerated
        assert_eq!(parse_file_name("KEDB0005.docx.bak"), Some(KedbNumber(5)));
    }

    #[test]
    fn test_parse_file_name_rejects_other_names() {
        assert_eq!(parse_file_name("notes.txt"), None);
        assert_eq!(parse_file_name("KEDB001.docx"), None);
        assert_eq!(parse_file_name("KEDB00001.docx"), None);
        assert_eq!(parse_file_name("kedb0001.docx"), None);
        assert_eq!(parse_file_name("copy of KEDB0001.docx"), None);
        assert_eq!(parse_file_name("KEDB0001.pdf"), None);
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(KedbNumber::parse("KEDB0042").unwrap(), KedbNumber(42));
        assert!(KedbNumber::parse("KEDB0042.docx").is_err());
        assert!(KedbNumber::parse("../KEDB0042").is_err());
        assert!(KedbNumber::parse("KEDB42").is_err());
    }

    #[test]
    fn test_zero_is_never_parsed() {
        assert!(KedbNumber::parse("KEDB0000").is_err());
        assert_eq!(parse_file_name("KEDB0000.docx"), None);
    }

    #[test]
    fn test_next_number_ignores_zero_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("KEDB0000.docx"), b"x").unwrap();

        assert_eq!(next_number(dir.path()).unwrap(), KedbNumber::FIRST);
    }

    #[test]
    fn test_new_bounds() {
        assert!(KedbNumber::new(0).is_err());
        assert_eq!(KedbNumber::new(1).unwrap(), KedbNumber::FIRST);
        assert!(matches!(
            KedbNumber::new(10_000),
            Err(Error::IdentifierSpaceExhausted(_))
        ));
    }

    #[test]
    fn test_highest_number() {
        let names = ["KEDB0003.docx", "readme.md", "KEDB0010.docx", "KEDB0002.docx"];
        assert_eq!(highest_number(names), Some(KedbNumber(10)));
        assert_eq!(highest_number(["a.docx", "b.docx"]), None);
    }

    #[test]
    fn test_next_number_empty_dir_starts_at_one() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_number(dir.path()).unwrap(), KedbNumber(1));
    }

    #[test]
    fn test_next_number_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output_docs");
        assert!(!output.exists());

        assert_eq!(next_number(&output).unwrap().to_string(), "KEDB0001");
        assert!(output.is_dir());
    }

    #[test]
    fn test_next_number_is_max_plus_one() {
        let dir = TempDir::new().unwrap();
        for name in ["KEDB0001.docx", "KEDB0004.docx", "KEDB0002.docx", "other.docx"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        assert_eq!(next_number(dir.path()).unwrap().to_string(), "KEDB0005");
    }

    #[test]
    fn test_next_number_exhausted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("KEDB9999.docx"), b"x").unwrap();

        assert!(matches!(
            next_number(dir.path()),
            Err(Error::IdentifierSpaceExhausted(9999))
        ));
    }
}
