use serde::{Deserialize, Serialize};

use crate::db_types::{Account, CargoOrder, CarrierProfile, Profile, ShipperProfile, TransportOrder};

/// The number of orders shown on a dashboard.
pub const DASHBOARD_ORDER_COUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub account: Account,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Shipper {
        profile: ShipperProfile,
        recent_cargo_orders: Vec<CargoOrder>,
        total_cargo_orders: i64,
    },
    Carrier {
        profile: CarrierProfile,
        recent_transport_orders: Vec<TransportOrder>,
        total_transport_orders: i64,
    },
}
