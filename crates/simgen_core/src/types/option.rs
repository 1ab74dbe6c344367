//! Option contract vocabulary.

use std::fmt;
use std::str::FromStr;

use super::error::OptionKindError;

/// Side of a vanilla option contract.
///
/// Parses from the CLI strings accepted by the harness: `call`/`c` and
/// `put`/`p`, case-insensitive.
///
/// # Examples
///
/// ```
/// use simgen_core::types::OptionKind;
///
/// let kind: OptionKind = "Put".parse().unwrap();
/// assert_eq!(kind, OptionKind::Put);
/// assert_eq!(kind.to_string(), "put");
/// assert!("straddle".parse::<OptionKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionKind {
    /// Returns the lowercase tag used in chunk file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl FromStr for OptionKind {
    type Err = OptionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionKind::Call),
            "put" | "p" => Ok(OptionKind::Put),
            _ => Err(OptionKindError::Unrecognised(s.to_string())),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_tag())
    }
}
