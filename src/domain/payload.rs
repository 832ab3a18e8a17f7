//! Request body for the scoring service.

use serde::Serialize;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::filters::{parse_bathroom_token, ScalarFilters};
use crate::domain::selection::SelectionSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub neighborhood_names: Vec<String>,
    pub min_price: u32,
    pub max_price: u32,
    pub bedrooms: Vec<u8>,
    pub min_bathroom: f64,
    pub broker_fees: String,
}

impl SubmissionPayload {
    /// Build the payload; an empty selection is refused.
    pub fn build(selection: &SelectionSet, scalars: &ScalarFilters) -> DomainResult<Self> {
        if selection.is_empty() {
            return Err(DomainError::EmptySelection);
        }
        Ok(Self {
            neighborhood_names: selection.to_name_list(),
            min_price: scalars.min_price,
            max_price: scalars.max_price,
            bedrooms: scalars.bedrooms.expand(),
            min_bathroom: parse_bathroom_token(&scalars.bathroom_token)?,
            broker_fees: scalars.fee_token.clone(),
        })
    }
}
