//! Registration and account lookups.
use std::fmt::Debug;

use futures_util::future::join;
use log::*;

use crate::{
    db_types::{Account, NewAccount, Profile, Role},
    fe_api::account_objects::AccountDetails,
    traits::{AccountApiError, AccountManagement, Geocoder, ProfileCoordinates},
};

/// The `AccountApi` registers new shippers and carriers, and looks up accounts along with their role profiles.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new account.
    ///
    /// The legal address, and the warehouse address for shippers, are geocoded best-effort. Addresses that cannot be
    /// resolved leave the profile coordinates empty; they never block registration. The account, its profile and the
    /// shipper's virtual warehouse are created atomically.
    pub async fn register<G: Geocoder>(
        &self,
        account: NewAccount,
        geocoder: &G,
    ) -> Result<AccountDetails, AccountApiError> {
        account.validate()?;
        let account = account.normalized();
        let warehouse_lookup = async {
            match account.warehouse_address.as_deref() {
                Some(address) => geocoder.resolve_address(address).await,
                None => None,
            }
        };
        let (legal, warehouse) = join(geocoder.resolve_address(&account.address), warehouse_lookup).await;
        if legal.is_none() {
            info!("🔄️ Legal address of '{}' could not be geocoded. Registering without coordinates.", account.username);
        }
        let coordinates = ProfileCoordinates { legal, warehouse };
        let (account, profile) = self.db.create_account(account, coordinates).await?;
        info!("🔄️ Registered {} account '{}' (#{})", account.role, account.username, account.id);
        Ok(AccountDetails { account, profile })
    }

    /// Fetches the account for the given account id. If no account exists, `None` is returned.
    pub async fn account_by_id(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account(account_id).await
    }

    pub async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account_by_username(username).await
    }

    /// The role profile of an existing account.
    pub async fn profile(&self, account: &Account) -> Result<Profile, AccountApiError> {
        let profile = match account.role {
            Role::Shipper => self.db.fetch_shipper_profile(account.id).await?.map(Profile::Shipper),
            Role::Carrier => self.db.fetch_carrier_profile(account.id).await?.map(Profile::Carrier),
        };
        profile.ok_or_else(|| {
            error!("🔄️ Account #{} is a {} but has no matching profile", account.id, account.role);
            AccountApiError::ProfileNotFound(account.id)
        })
    }

    /// The account and its profile. `None` if the account does not exist.
    pub async fn account_details(&self, account_id: i64) -> Result<Option<AccountDetails>, AccountApiError> {
        let Some(account) = self.db.fetch_account(account_id).await? else {
            return Ok(None);
        };
        let profile = self.profile(&account).await?;
        Ok(Some(AccountDetails { account, profile }))
    }
}
