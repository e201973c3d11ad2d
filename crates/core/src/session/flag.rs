//! Tri-state session flag.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A session flag that remembers whether it was ever evaluated.
///
/// `Unset` means the flag was never checked (fresh or reset session), `False`
/// means it was checked and is off. Access decisions only ever ask
/// [`Flag::is_true`], so both non-`True` states deny access, but they remain
/// distinguishable for consumers that care about the difference.
///
/// Serializes as `null`, `false` or `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Flag {
    /// Never evaluated.
    #[default]
    Unset,
    /// Evaluated and off.
    False,
    /// Evaluated and on.
    True,
}

impl Flag {
    /// Returns `true` only for [`Flag::True`].
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Returns `true` for [`Flag::Unset`].
    #[must_use]
    pub const fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The flag as a nullable boolean.
    #[must_use]
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::False => Some(false),
            Self::True => Some(true),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unset, Self::from)
    }
}

impl From<Flag> for Option<bool> {
    fn from(flag: Flag) -> Self {
        flag.as_option()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::False => write!(f, "false"),
            Self::True => write!(f, "true"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert_eq!(Flag::default(), Flag::Unset);
        assert!(Flag::default().is_unset());
    }

    #[test]
    fn test_only_true_is_true() {
        assert!(Flag::True.is_true());
        assert!(!Flag::False.is_true());
        assert!(!Flag::Unset.is_true());
    }

    #[test]
    fn test_unset_and_false_are_distinct() {
        assert_ne!(Flag::Unset, Flag::False);
        assert_eq!(Flag::Unset.as_option(), None);
        assert_eq!(Flag::False.as_option(), Some(false));
    }

    #[test]
    fn test_serde_as_nullable_bool() {
        assert_eq!(serde_json::to_string(&Flag::Unset).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Flag::True).unwrap(), "true");

        let parsed: Flag = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, Flag::False);
        let parsed: Flag = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Flag::Unset);
    }
}
