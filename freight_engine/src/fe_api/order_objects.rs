use std::fmt::Display;

use freight_common::{is_blank, Money};
use serde::{Deserialize, Serialize};

use crate::{db_types::TrailerType, traits::ValidationError};

//--------------------------------------   CargoOrderQuery   ---------------------------------------------------------
/// Search filter for cargo orders.
///
/// `q` and `category` come straight from the public search form. The remaining filters are only settable through the
/// builder methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CargoOrderQuery {
    /// Case-insensitive substring of a referenced cargo item's name
    #[serde(default)]
    pub q: Option<String>,
    /// Category id
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(skip)]
    pub shipper_id: Option<i64>,
    #[serde(skip)]
    pub uncontracted_only: bool,
    #[serde(skip)]
    pub limit: Option<i64>,
}

impl CargoOrderQuery {
    pub fn with_text<S: Into<String>>(mut self, q: S) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_shipper_id(mut self, shipper_id: i64) -> Self {
        self.shipper_id = Some(shipper_id);
        self
    }

    pub fn uncontracted(mut self) -> Self {
        self.uncontracted_only = true;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The search text, or `None` if it is missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.category.is_none() && self.shipper_id.is_none() && !self.uncontracted_only
    }
}

impl Display for CargoOrderQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters. ")?;
        }
        if let Some(q) = self.text() {
            write!(f, "q: {q}. ")?;
        }
        if let Some(category) = &self.category {
            write!(f, "category: {category}. ")?;
        }
        if let Some(shipper_id) = &self.shipper_id {
            write!(f, "shipper_id: {shipper_id}. ")?;
        }
        if self.uncontracted_only {
            write!(f, "uncontracted only. ")?;
        }
        if let Some(limit) = &self.limit {
            write!(f, "limit: {limit}. ")?;
        }
        Ok(())
    }
}

//-------------------------------------- TransportOrderQuery ---------------------------------------------------------
/// Search filter for transport orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportOrderQuery {
    /// Case-insensitive substring of a referenced transport item's trailer number
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub transport_type: Option<TrailerType>,
    #[serde(skip)]
    pub carrier_id: Option<i64>,
    #[serde(skip)]
    pub uncontracted_only: bool,
    #[serde(skip)]
    pub limit: Option<i64>,
}

impl TransportOrderQuery {
    pub fn with_text<S: Into<String>>(mut self, q: S) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_transport_type(mut self, transport_type: TrailerType) -> Self {
        self.transport_type = Some(transport_type);
        self
    }

    pub fn with_carrier_id(mut self, carrier_id: i64) -> Self {
        self.carrier_id = Some(carrier_id);
        self
    }

    pub fn uncontracted(mut self) -> Self {
        self.uncontracted_only = true;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.transport_type.is_none() && self.carrier_id.is_none() && !self.uncontracted_only
    }
}

impl Display for TransportOrderQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters. ")?;
        }
        if let Some(q) = self.text() {
            write!(f, "q: {q}. ")?;
        }
        if let Some(transport_type) = &self.transport_type {
            write!(f, "transport_type: {transport_type}. ")?;
        }
        if let Some(carrier_id) = &self.carrier_id {
            write!(f, "carrier_id: {carrier_id}. ")?;
        }
        if self.uncontracted_only {
            write!(f, "uncontracted only. ")?;
        }
        if let Some(limit) = &self.limit {
            write!(f, "limit: {limit}. ")?;
        }
        Ok(())
    }
}

//--------------------------------------   Order requests    ---------------------------------------------------------
/// A cargo order as submitted by a shipper, before address resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoOrderRequest {
    pub loading_address: String,
    pub unloading_address: String,
    #[serde(default)]
    pub cargo_items: Vec<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub insurance: bool,
    pub price: Money,
    #[serde(default)]
    pub trailer_type: Option<TrailerType>,
}

impl CargoOrderRequest {
    /// Checks that need no lookups. Ownership and category checks happen in the workflow.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_route_fields(&self.loading_address, &self.unloading_address, self.price)?;
        if self.cargo_items.is_empty() {
            return Err(ValidationError::field("cargo_items", "Select at least one cargo item."));
        }
        Ok(())
    }
}

/// A transport order as submitted by a carrier, before address resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOrderRequest {
    pub loading_address: String,
    pub unloading_address: String,
    #[serde(default)]
    pub transport_items: Vec<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub insurance: bool,
    pub price: Money,
}

impl TransportOrderRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_route_fields(&self.loading_address, &self.unloading_address, self.price)?;
        if self.transport_items.is_empty() {
            return Err(ValidationError::field("transport_items", "Select at least one transport item."));
        }
        Ok(())
    }
}

fn validate_route_fields(loading: &str, unloading: &str, price: Money) -> Result<(), ValidationError> {
    if is_blank(loading) {
        return Err(ValidationError::field("loading_address", "This field is required."));
    }
    if is_blank(unloading) {
        return Err(ValidationError::field("unloading_address", "This field is required."));
    }
    validate_price(price)
}

pub(crate) fn validate_price(price: Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        Err(ValidationError::field("price", "Price cannot be negative."))
    } else {
        Ok(())
    }
}
