//! Transit products and the product bitmask used for query filters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Closed set of transit products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Product {
    /// Long-distance, regional and suburban trains
    Rail,
    /// Metro / U-Bahn
    Subway,
    /// Tram / light rail
    Tram,
    /// Bus
    Bus,
    /// Ferry
    Ferry,
    /// Cable car, funicular, gondola
    #[serde(rename = "CABLECAR")]
    CableCar,
    /// Demand-responsive service (call bus, shared taxi)
    OnDemand,
}

impl Product {
    /// All products in bit order
    pub const ALL: [Self; 7] = [
        Self::Rail,
        Self::Subway,
        Self::Tram,
        Self::Bus,
        Self::Ferry,
        Self::CableCar,
        Self::OnDemand,
    ];

    /// Bit assigned to this product in a [`ProductSet`]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Single-character code
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Rail => 'R',
            Self::Subway => 'U',
            Self::Tram => 'T',
            Self::Bus => 'B',
            Self::Ferry => 'F',
            Self::CableCar => 'C',
            Self::OnDemand => 'P',
        }
    }

    /// Parse a single-character code
    ///
    /// # Errors
    ///
    /// Returns `UnknownCode` for characters not assigned to a product.
    pub fn from_code(code: char) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|product| product.code() == code)
            .ok_or_else(|| DomainError::UnknownCode(code.to_string()))
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rail => "Rail",
            Self::Subway => "Subway",
            Self::Tram => "Tram",
            Self::Bus => "Bus",
            Self::Ferry => "Ferry",
            Self::CableCar => "Cable car",
            Self::OnDemand => "On demand",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compact set of products, one bit per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductSet(u8);

impl ProductSet {
    /// No products
    pub const EMPTY: Self = Self(0);

    /// Every product
    pub const ALL: Self = Self(0b0111_1111);

    /// Create a set from raw bits, ignoring unassigned bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bitmask
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the product is in the set
    #[must_use]
    pub const fn contains(self, product: Product) -> bool {
        self.0 & product.bit() != 0
    }

    /// Return the set with the product added
    #[must_use]
    pub const fn with(self, product: Product) -> Self {
        Self(self.0 | product.bit())
    }

    /// Add a product in place
    pub fn insert(&mut self, product: Product) {
        self.0 |= product.bit();
    }

    /// Remove a product in place
    pub fn remove(&mut self, product: Product) {
        self.0 &= !product.bit();
    }

    /// Whether no product is selected
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of products in the set
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Products in bit order
    pub fn iter(self) -> impl Iterator<Item = Product> {
        Product::ALL
            .into_iter()
            .filter(move |product| self.contains(*product))
    }
}

impl FromIterator<Product> for ProductSet {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |set, product| set.with(product))
    }
}

impl fmt::Display for ProductSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for product in self.iter() {
            write!(f, "{}", product.code())?;
        }
        Ok(())
    }
}

impl FromStr for ProductSet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().map(Product::from_code).collect()
    }
}
