//! Cargo items, transport items and categories.
use std::fmt::Debug;

use freight_common::is_blank;
use log::*;

use crate::{
    db_types::{CargoItem, Category, CategoryKind, NewCargoItem, NewTransportItem, TransportItem},
    fe_api::profiles::{carrier_profile, shipper_profile},
    traits::{MarketplaceDatabase, MarketplaceError, ValidationError},
};

pub struct CatalogueApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogueApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogueApi ({:?})", self.db)
    }
}

impl<B> CatalogueApi<B>
where B: MarketplaceDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Adds a cargo item to the catalogue of the shipper behind `account_id`.
    pub async fn add_cargo_item(&self, account_id: i64, item: NewCargoItem) -> Result<CargoItem, MarketplaceError> {
        item.validate()?;
        let profile = shipper_profile(&self.db, account_id).await?;
        let item = self.db.insert_cargo_item(profile.id, item).await?;
        debug!("🔄️ Shipper {} added cargo item #{} '{}'", profile.id, item.id, item.name);
        Ok(item)
    }

    pub async fn cargo_items(&self, account_id: i64) -> Result<Vec<CargoItem>, MarketplaceError> {
        let profile = shipper_profile(&self.db, account_id).await?;
        self.db.fetch_cargo_items_for_shipper(profile.id).await
    }

    /// Adds a vehicle to the fleet of the carrier behind `account_id`. Licences and plates are globally unique.
    pub async fn add_transport_item(
        &self,
        account_id: i64,
        item: NewTransportItem,
    ) -> Result<TransportItem, MarketplaceError> {
        item.validate()?;
        let profile = carrier_profile(&self.db, account_id).await?;
        let item = self.db.insert_transport_item(profile.id, item).await?;
        debug!("🔄️ Carrier {} added transport item #{} ({})", profile.id, item.id, item.trailer_type);
        Ok(item)
    }

    pub async fn transport_items(&self, account_id: i64) -> Result<Vec<TransportItem>, MarketplaceError> {
        let profile = carrier_profile(&self.db, account_id).await?;
        self.db.fetch_transport_items_for_carrier(profile.id).await
    }

    pub async fn add_category(
        &self,
        kind: CategoryKind,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, MarketplaceError> {
        if is_blank(name) {
            return Err(ValidationError::field("name", "This field is required.").into());
        }
        match self.db.insert_category(kind, name, description).await {
            Err(MarketplaceError::DuplicateEntry(_)) => {
                Err(ValidationError::field("name", format!("A {kind} category named '{}' already exists.", name.trim()))
                    .into())
            },
            result => result,
        }
    }

    /// All categories of the given kind, ordered by name.
    pub async fn categories(&self, kind: CategoryKind) -> Result<Vec<Category>, MarketplaceError> {
        self.db.fetch_categories(kind).await
    }
}
