//! Currency pair identity.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CambistError;

/// A traded currency pair such as `BTC/USD`.
///
/// Both legs are stored upper-case. The venue addresses the pair by its
/// channel name (`BTC-USD`), which is also the `product_id` every feed
/// message carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Product {
    pub base: String,
    pub quote: String,
}

impl Product {
    /// Builds a pair from its two legs, normalizing case.
    pub fn new(base: impl AsRef<str>, quote: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().to_ascii_uppercase(),
            quote: quote.as_ref().to_ascii_uppercase(),
        }
    }

    /// Returns the venue channel name, e.g. `"BTC-USD"`.
    pub fn channel_name(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Product {
    type Err = CambistError;

    /// Accepts `BTC-USD` or `BTC/USD`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .trim()
            .split_once(['-', '/'])
            .ok_or_else(|| CambistError::Config(format!("invalid product '{s}'")))?;

        if base.is_empty() || quote.is_empty() || quote.contains(['-', '/']) {
            return Err(CambistError::Config(format!("invalid product '{s}'")));
        }

        Ok(Self::new(base, quote))
    }
}
