use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How labels with equal counts are ordered within a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Ascending codebook code; labels without a code follow, first-seen.
    #[default]
    CodeOrder,
    /// Order in which labels first occur in the data.
    FirstSeen,
}

impl TieBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeOrder => "code-order",
            Self::FirstSeen => "first-seen",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "code-order" | "code" => Ok(Self::CodeOrder),
            "first-seen" | "first" => Ok(Self::FirstSeen),
            other => Err(format!(
                "unknown tie-break '{other}' (expected code-order or first-seen)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("code-order".parse::<TieBreak>(), Ok(TieBreak::CodeOrder));
        assert_eq!("First-Seen".parse::<TieBreak>(), Ok(TieBreak::FirstSeen));
        assert!("alphabetical".parse::<TieBreak>().is_err());
    }
}
