use thiserror::Error;

use crate::{
    db_types::{Account, CarrierProfile, NewAccount, Profile, ShipperProfile},
    traits::{ProfileCoordinates, ValidationError},
};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("An account with these details already exists. {0}")]
    DuplicateAccount(String),
    #[error("The requested account id {0} does not exist")]
    AccountNotFound(i64),
    #[error("Account {0} has no profile for its role")]
    ProfileNotFound(i64),
    #[error("{0}")]
    Validation(ValidationError),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AccountApiError::DuplicateAccount(db_err.message().to_string())
            },
            e => AccountApiError::DatabaseError(e.to_string()),
        }
    }
}

impl From<ValidationError> for AccountApiError {
    fn from(e: ValidationError) -> Self {
        AccountApiError::Validation(e)
    }
}

/// The `AccountManagement` trait defines behaviour for registering and looking up accounts.
///
/// Every account has exactly one role, fixed at creation, and exactly one profile matching that role. Backends must
/// create the account, its profile and (for shippers) the virtual warehouse atomically.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates the account, its role profile and, for shippers, an empty virtual warehouse, in a single transaction.
    ///
    /// `account` must already be validated and normalized. Unique violations on username, email or VAT number are
    /// reported as [`AccountApiError::DuplicateAccount`].
    async fn create_account(
        &self,
        account: NewAccount,
        coordinates: ProfileCoordinates,
    ) -> Result<(Account, Profile), AccountApiError>;

    /// Fetches the account with the given id. If no account exists, `None` is returned.
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError>;

    async fn fetch_account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError>;

    /// The shipper profile linked to the account, if the account is a shipper.
    async fn fetch_shipper_profile(&self, account_id: i64) -> Result<Option<ShipperProfile>, AccountApiError>;

    /// The carrier profile linked to the account, if the account is a carrier.
    async fn fetch_carrier_profile(&self, account_id: i64) -> Result<Option<CarrierProfile>, AccountApiError>;
}
