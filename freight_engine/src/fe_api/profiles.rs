use crate::{
    db_types::{CarrierProfile, Role, ShipperProfile},
    traits::{AccountManagement, MarketplaceError},
};

pub(crate) async fn shipper_profile<B: AccountManagement>(
    db: &B,
    account_id: i64,
) -> Result<ShipperProfile, MarketplaceError> {
    db.fetch_shipper_profile(account_id)
        .await?
        .ok_or(MarketplaceError::ProfileNotFound { account_id, role: Role::Shipper })
}

pub(crate) async fn carrier_profile<B: AccountManagement>(
    db: &B,
    account_id: i64,
) -> Result<CarrierProfile, MarketplaceError> {
    db.fetch_carrier_profile(account_id)
        .await?
        .ok_or(MarketplaceError::ProfileNotFound { account_id, role: Role::Carrier })
}
