use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Counting convention the target document service uses for its indices.
///
/// Google Docs counts UTF-16 code units, so a single emoji outside the Basic
/// Multilingual Plane advances the cursor by two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUnit {
    #[default]
    Utf16,
    /// Unicode scalar values.
    Chars,
    /// UTF-8 bytes.
    Bytes,
}

impl TextUnit {
    pub const ALL: &'static [TextUnit] = &[TextUnit::Utf16, TextUnit::Chars, TextUnit::Bytes];

    /// Length of `text` measured in this unit.
    pub fn len(self, text: &str) -> usize {
        match self {
            TextUnit::Utf16 => text.encode_utf16().count(),
            TextUnit::Chars => text.chars().count(),
            TextUnit::Bytes => text.len(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextUnit::Utf16 => "utf16",
            TextUnit::Chars => "chars",
            TextUnit::Bytes => "bytes",
        }
    }
}

impl fmt::Display for TextUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "utf16" | "utf-16" => Ok(TextUnit::Utf16),
            "chars" => Ok(TextUnit::Chars),
            "bytes" | "utf8" | "utf-8" => Ok(TextUnit::Bytes),
            other => Err(format!(
                "unknown text unit '{other}' (expected utf16, chars or bytes)"
            )),
        }
    }
}
