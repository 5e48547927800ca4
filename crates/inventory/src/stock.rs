use serde::{Deserialize, Serialize};

use storefront_core::ValueObject;

/// Categorical stock level shown to shoppers instead of the raw count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLabel {
    /// One unit or fewer (including zero and negative counts).
    Low,
    /// Two or three units.
    Adequate,
    /// More than three units.
    Plentiful,
}

impl StockLabel {
    /// Derive the label for a quantity. Always recomputed, never cached against a
    /// different quantity than the one being displayed.
    pub fn for_quantity(quantity: i64) -> Self {
        match quantity {
            q if q <= 1 => StockLabel::Low,
            2..=3 => StockLabel::Adequate,
            _ => StockLabel::Plentiful,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLabel::Low => "low",
            StockLabel::Adequate => "adequate",
            StockLabel::Plentiful => "plentiful",
        }
    }
}

impl ValueObject for StockLabel {}

impl core::fmt::Display for StockLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
