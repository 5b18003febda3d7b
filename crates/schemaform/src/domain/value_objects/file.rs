//! File Value Objects
//!
//! File handles as reported by a file picker, and the `accept` list a file
//! field may declare.

use serde::{Deserialize, Serialize};
use std::fmt;

const SIZE_UNITS: [&str; 5] = ["b", "Kb", "Mb", "Gb", "Tb"];

/// Label shown by a file field with no selection
pub const NO_FILE_LABEL: &str = "Choose a file";

/// A selected file
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    /// Extension including the leading dot, taken from the last `.`
    pub fn extension(&self) -> Option<&str> {
        self.name.rfind('.').map(|i| &self.name[i..])
    }

    /// Human-readable size, e.g. `128.20 Kb`
    pub fn size_label(&self) -> String {
        let mut value = self.size as f64;
        let mut unit = 0;
        while value > 1024.0 && unit < SIZE_UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{:.2} {}", value, SIZE_UNITS[unit])
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.size_label())
    }
}

/// One `name [size]` line per file, or the empty-selection label
pub fn file_list_label(files: &[FileHandle]) -> String {
    if files.is_empty() {
        return NO_FILE_LABEL.to_string();
    }
    files
        .iter()
        .map(FileHandle::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepted file extensions / MIME types of a file field
///
/// Tokens are matched literally: case-sensitive, no wildcard expansion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptList(Vec<String>);

impl AcceptList {
    /// Parse a comma-separated `accept` attribute
    pub fn parse(accept: &str) -> Self {
        Self(
            accept
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// A file is accepted when its extension or MIME type is a token
    pub fn accepts(&self, file: &FileHandle) -> bool {
        self.0.iter().any(|token| {
            file.extension() == Some(token.as_str()) || file.mime == *token
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(FileHandle::new("cv.final.pdf", 1, "").extension(), Some(".pdf"));
        assert_eq!(FileHandle::new("README", 1, "").extension(), None);
    }

    #[test]
    fn test_size_label() {
        assert_eq!(FileHandle::new("a", 512, "").size_label(), "512.00 b");
        assert_eq!(FileHandle::new("a", 1024, "").size_label(), "1024.00 b");
        assert_eq!(FileHandle::new("a", 131_277, "").size_label(), "128.20 Kb");
        assert_eq!(FileHandle::new("a", 5 * 1024 * 1024, "").size_label(), "5.00 Mb");
    }

    #[test]
    fn test_file_list_label() {
        assert_eq!(file_list_label(&[]), "Choose a file");
        let files = vec![
            FileHandle::new("a.pdf", 100, "application/pdf"),
            FileHandle::new("b.pdf", 2048, "application/pdf"),
        ];
        assert_eq!(file_list_label(&files), "a.pdf [100.00 b]\nb.pdf [2.00 Kb]");
    }

    #[test]
    fn test_accept_parse_trims_tokens() {
        let accept = AcceptList::parse(".pdf, .doc,application/msword ,");
        assert_eq!(accept.tokens(), &[".pdf", ".doc", "application/msword"]);
        assert!(AcceptList::parse("  ").is_empty());
    }

    #[test]
    fn test_accept_matches_extension_or_mime() {
        let accept = AcceptList::parse(".pdf, application/msword");
        assert!(accept.accepts(&FileHandle::new("x.pdf", 1, "")));
        assert!(accept.accepts(&FileHandle::new("x.bin", 1, "application/msword")));
        assert!(!accept.accepts(&FileHandle::new("x.PDF", 1, "")));
        assert!(!accept.accepts(&FileHandle::new("x.png", 1, "image/png")));
    }

    #[test]
    fn test_accept_has_no_wildcards() {
        let accept = AcceptList::parse("image/*");
        assert!(!accept.accepts(&FileHandle::new("x.png", 1, "image/png")));
    }
}
