use freight_common::{Coordinate, RouteOption};
use freight_engine::{
    db_types::{Account, CarrierProfile, NewAccount, Profile, ShipperProfile},
    traits::{AccountApiError, AccountManagement, Geocoder, ProfileCoordinates},
};
use mockall::mock;

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn create_account(&self, account: NewAccount, coordinates: ProfileCoordinates) -> Result<(Account, Profile), AccountApiError>;
        async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError>;
        async fn fetch_account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError>;
        async fn fetch_shipper_profile(&self, account_id: i64) -> Result<Option<ShipperProfile>, AccountApiError>;
        async fn fetch_carrier_profile(&self, account_id: i64) -> Result<Option<CarrierProfile>, AccountApiError>;
    }
}

mock! {
    pub AddressBook {}
    impl Geocoder for AddressBook {
        async fn resolve_address(&self, address: &str) -> Option<Coordinate>;
        async fn fetch_routes(&self, start: Coordinate, end: Coordinate) -> Option<Vec<RouteOption>>;
    }
}
