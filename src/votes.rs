use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

/// Represents the helpfulness vote count attached to a review.
///
/// Review dumps store the count as a string, with comma separators for counts
/// of a thousand or more (for example `"1,024"`). The [`FromStr`]
/// implementation strips the separators, and the [`Display`] implementation
/// formats the plain count.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq)]
pub struct Votes(u32);

impl Votes {
    /// Returns the number of votes.
    #[must_use]
    pub fn count(self) -> u32 {
        self.0
    }
}

impl From<u32> for Votes {
    fn from(count: u32) -> Self {
        Self(count)
    }
}

impl Debug for Votes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Votes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Votes {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().replace(',', "").parse()?))
    }
}
