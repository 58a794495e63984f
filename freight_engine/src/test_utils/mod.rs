//! Helpers for tests that need a real database or a deterministic geocoder.
pub mod prepare_env;
pub mod static_geocoder;

use crate::db_types::{NewAccount, Role};

/// A valid registration for `username`, with `{username}@example.test` as email and the given legal address.
pub fn new_account(username: &str, role: Role, address: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        email: format!("{username}@example.test"),
        company_name: format!("{username} Logistics"),
        address: address.to_string(),
        vat_number: None,
        phone_number: None,
        contact_person: "Dispatch desk".to_string(),
        role,
        warehouse_address: None,
    }
}
