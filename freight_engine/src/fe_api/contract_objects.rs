use freight_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{CargoOrder, TransportOrder};

/// A carrier's offer to carry a cargo order with one of their transport orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRequest {
    #[serde(default)]
    pub cargo_order: Option<i64>,
    #[serde(default)]
    pub transport_order: Option<i64>,
    pub price: Money,
}

impl ContractRequest {
    pub fn new(cargo_order: i64, transport_order: i64, price: Money) -> Self {
        Self { cargo_order: Some(cargo_order), transport_order: Some(transport_order), price }
    }
}

/// The orders a carrier may currently pair into a contract, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCandidates {
    pub cargo_orders: Vec<CargoOrder>,
    pub transport_orders: Vec<TransportOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCmrDocument {
    pub file_path: String,
}
