//! Scalar filters tracked next to the area selection.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Token meaning "no constraint" for bedrooms and bathrooms.
pub const ANY_TOKEN: &str = "any";

/// Highest selectable bedroom bucket, meaning "4 or more".
pub const BEDROOM_TOP_BUCKET: u8 = 4;

/// Largest bedroom count the scoring service understands.
pub const BEDROOM_CEILING: u8 = 10;

/// Studio (0) through the top bucket.
pub const BEDROOM_BUCKET_COUNT: usize = BEDROOM_TOP_BUCKET as usize + 1;

pub const DEFAULT_FEE_TOKEN: &str = "fees_ok_if_10pct_cheaper";

/// Fixed baseline the form resets to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub neighborhoods: Vec<String>,
    pub min_price: u32,
    pub max_price: u32,
    pub bedrooms_token: String,
    pub bathroom_token: String,
    pub fee_token: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            neighborhoods: vec![
                "Tribeca".into(),
                "Kips Bay".into(),
                "Gramercy Park".into(),
            ],
            min_price: 2500,
            max_price: 5000,
            bedrooms_token: ANY_TOKEN.into(),
            bathroom_token: ANY_TOKEN.into(),
            fee_token: DEFAULT_FEE_TOKEN.into(),
        }
    }
}

impl DefaultsConfig {
    /// Check that every token parses and the price range is ordered.
    pub fn validate(&self) -> DomainResult<()> {
        ScalarFilters::from_defaults(self).map(|_| ())
    }
}

/// Bedroom buttons: either "any" or a set of buckets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BedroomSelection {
    #[default]
    Any,
    Buckets(BTreeSet<u8>),
}

impl BedroomSelection {
    /// Apply one button click. `None` is the "any" button.
    ///
    /// An empty or complete bucket set collapses back to `Any`.
    pub fn toggle(&mut self, bucket: Option<u8>) -> DomainResult<()> {
        let Some(bucket) = bucket else {
            *self = BedroomSelection::Any;
            return Ok(());
        };
        if bucket > BEDROOM_TOP_BUCKET {
            return Err(DomainError::InvalidBedroomBucket(bucket));
        }

        let mut buckets = match std::mem::take(self) {
            BedroomSelection::Any => BTreeSet::new(),
            BedroomSelection::Buckets(b) => b,
        };
        if !buckets.remove(&bucket) {
            buckets.insert(bucket);
        }

        *self = if buckets.is_empty() || buckets.len() == BEDROOM_BUCKET_COUNT {
            BedroomSelection::Any
        } else {
            BedroomSelection::Buckets(buckets)
        };
        Ok(())
    }

    /// Bedroom counts sent to the scoring service.
    pub fn expand(&self) -> Vec<u8> {
        match self {
            BedroomSelection::Any => (0..=BEDROOM_CEILING).collect(),
            BedroomSelection::Buckets(buckets) => match buckets.iter().copied().minmax() {
                MinMaxResult::NoElements => (0..=BEDROOM_CEILING).collect(),
                MinMaxResult::OneElement(b) => expand_range(b, b),
                MinMaxResult::MinMax(lo, hi) => expand_range(lo, hi),
            },
        }
    }

    fn contains(&self, bucket: u8) -> bool {
        matches!(self, BedroomSelection::Buckets(b) if b.contains(&bucket))
    }
}

/// Inclusive range, stretched to the ceiling when it ends at the top bucket.
fn expand_range(lo: u8, hi: u8) -> Vec<u8> {
    let hi = if hi == BEDROOM_TOP_BUCKET {
        BEDROOM_CEILING
    } else {
        hi
    };
    (lo..=hi).collect()
}

impl fmt::Display for BedroomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedroomSelection::Any => write!(f, "{ANY_TOKEN}"),
            BedroomSelection::Buckets(b) => write!(f, "{}", b.iter().join(",")),
        }
    }
}

impl FromStr for BedroomSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ANY_TOKEN) {
            return Ok(BedroomSelection::Any);
        }
        let invalid = || DomainError::InvalidToken {
            field: "bedrooms",
            value: s.to_string(),
        };
        let mut selection = BedroomSelection::Any;
        for part in s.split(',') {
            let bucket: u8 = part.trim().parse().map_err(|_| invalid())?;
            if selection.contains(bucket) {
                continue;
            }
            selection.toggle(Some(bucket))?;
        }
        Ok(selection)
    }
}

/// Minimum bathrooms for a token: "any" is 0.
pub fn parse_bathroom_token(token: &str) -> DomainResult<f64> {
    let token = token.trim();
    if token.eq_ignore_ascii_case(ANY_TOKEN) {
        return Ok(0.0);
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(DomainError::InvalidToken {
            field: "bathrooms",
            value: token.to_string(),
        }),
    }
}

/// Non-hierarchical filters owned by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarFilters {
    pub min_price: u32,
    pub max_price: u32,
    pub bedrooms: BedroomSelection,
    pub bathroom_token: String,
    pub fee_token: String,
}

impl ScalarFilters {
    pub fn from_defaults(defaults: &DefaultsConfig) -> DomainResult<Self> {
        if defaults.min_price > defaults.max_price {
            return Err(DomainError::InvalidPriceRange {
                min: defaults.min_price,
                max: defaults.max_price,
            });
        }
        parse_bathroom_token(&defaults.bathroom_token)?;
        if defaults.fee_token.trim().is_empty() {
            return Err(DomainError::InvalidToken {
                field: "broker fees",
                value: defaults.fee_token.clone(),
            });
        }
        Ok(Self {
            min_price: defaults.min_price,
            max_price: defaults.max_price,
            bedrooms: defaults.bedrooms_token.parse()?,
            bathroom_token: defaults.bathroom_token.clone(),
            fee_token: defaults.fee_token.clone(),
        })
    }

    /// Exact field-by-field comparison with the defaults.
    pub fn matches_defaults(&self, defaults: &DefaultsConfig) -> bool {
        self.min_price == defaults.min_price
            && self.max_price == defaults.max_price
            && defaults
                .bedrooms_token
                .parse::<BedroomSelection>()
                .is_ok_and(|b| b == self.bedrooms)
            && self.bathroom_token == defaults.bathroom_token
            && self.fee_token == defaults.fee_token
    }
}
