//! Shipment contracts and CMR documents.
//!
//! A contract pairs one cargo order with one transport order. Each order can be part of at most one contract. The
//! checks in [`ContractApi::create_contract`] give the user a helpful message, but the claim itself is settled by the
//! storage backend, so two carriers racing for the same cargo order cannot both win.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use freight_common::is_blank;
use log::*;

use crate::{
    db_types::{CmrDocument, ContractNumber, NewContract, Role, ShipmentContract},
    fe_api::{
        contract_objects::{ContractCandidates, ContractRequest, NewCmrDocument},
        profiles::{carrier_profile, shipper_profile},
    },
    helpers::ContractTerms,
    order_objects::{validate_price, CargoOrderQuery, TransportOrderQuery},
    traits::{AccountApiError, MarketplaceDatabase, MarketplaceError, ValidationError},
};

pub struct ContractApi<B> {
    db: B,
}

impl<B: Debug> Debug for ContractApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContractApi ({:?})", self.db)
    }
}

impl<B> ContractApi<B>
where B: MarketplaceDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Cargo orders without a contract, and the carrier's own transport orders without a contract.
    pub async fn candidates(&self, account_id: i64) -> Result<ContractCandidates, MarketplaceError> {
        let profile = carrier_profile(&self.db, account_id).await?;
        let cargo_orders = self.db.search_cargo_orders(CargoOrderQuery::default().uncontracted()).await?;
        let transport_orders = self
            .db
            .search_transport_orders(TransportOrderQuery::default().with_carrier_id(profile.id).uncontracted())
            .await?;
        Ok(ContractCandidates { cargo_orders, transport_orders })
    }

    /// Forms a contract between a cargo order and one of the carrier's transport orders, effective now.
    pub async fn create_contract(
        &self,
        account_id: i64,
        request: ContractRequest,
    ) -> Result<ShipmentContract, MarketplaceError> {
        self.create_contract_at(account_id, request, Utc::now()).await
    }

    /// Forms a contract as if it were submitted at `now`. The contract number and deadlines derive from `now`.
    pub async fn create_contract_at(
        &self,
        account_id: i64,
        request: ContractRequest,
        now: DateTime<Utc>,
    ) -> Result<ShipmentContract, MarketplaceError> {
        let (Some(cargo_order_id), Some(transport_order_id)) = (request.cargo_order, request.transport_order) else {
            return Err(ValidationError::form("Select both cargo order and transport unit.").into());
        };
        validate_price(request.price)?;
        let profile = carrier_profile(&self.db, account_id).await?;
        let cargo_order =
            self.db.fetch_cargo_order(cargo_order_id).await?.ok_or(MarketplaceError::CargoOrderNotFound(cargo_order_id))?;
        let transport_order = self
            .db
            .fetch_transport_order(transport_order_id)
            .await?
            .ok_or(MarketplaceError::TransportOrderNotFound(transport_order_id))?;
        if transport_order.carrier_id != profile.id {
            return Err(ValidationError::field("transport_order", "Select one of your own transport orders.").into());
        }
        if transport_order.is_contracted() {
            return Err(MarketplaceError::TransportOrderAlreadyContracted(transport_order.id));
        }
        if cargo_order.is_contracted() {
            return Err(MarketplaceError::CargoOrderAlreadyContracted(cargo_order.id));
        }
        let terms = ContractTerms::starting_at(now);
        let contract = NewContract {
            cargo_order_id,
            transport_order_id,
            contract_number: terms.contract_number,
            price: request.price,
            payment_deadline: terms.payment_deadline,
            delivery_deadline: terms.delivery_deadline,
            accepted: true,
            created_at: terms.created_at,
        };
        let contract = self.db.insert_contract(contract).await?;
        info!(
            "🔄️ Contract {} formed between cargo order #{cargo_order_id} and transport order #{transport_order_id}",
            contract.contract_number
        );
        Ok(contract)
    }

    /// Every contract the account is a party to, newest first.
    pub async fn contracts_for_account(&self, account_id: i64) -> Result<Vec<ShipmentContract>, MarketplaceError> {
        match self.role_of(account_id).await? {
            Role::Shipper => {
                let profile = shipper_profile(&self.db, account_id).await?;
                self.db.fetch_contracts_for_shipper(profile.id).await
            },
            Role::Carrier => {
                let profile = carrier_profile(&self.db, account_id).await?;
                self.db.fetch_contracts_for_carrier(profile.id).await
            },
        }
    }

    pub async fn contract_for_account(
        &self,
        account_id: i64,
        contract_id: i64,
    ) -> Result<ShipmentContract, MarketplaceError> {
        let contract = self
            .db
            .fetch_contract(contract_id)
            .await?
            .ok_or_else(|| MarketplaceError::ContractNotFound(contract_id.to_string()))?;
        self.ensure_party(account_id, &contract).await?;
        Ok(contract)
    }

    /// Looks a contract up by its number. Anything that is not a well-formed contract number cannot exist, and is
    /// reported as not found.
    pub async fn contract_by_number_for_account(
        &self,
        account_id: i64,
        number: &str,
    ) -> Result<ShipmentContract, MarketplaceError> {
        let number = number.parse::<ContractNumber>().map_err(|e| {
            debug!("🔄️ {e}");
            MarketplaceError::ContractNotFound(number.to_string())
        })?;
        let contract = self
            .db
            .fetch_contract_by_number(&number)
            .await?
            .ok_or_else(|| MarketplaceError::ContractNotFound(number.to_string()))?;
        self.ensure_party(account_id, &contract).await?;
        Ok(contract)
    }

    /// Records a generated CMR document for a contract the account is party to.
    pub async fn add_cmr_document(
        &self,
        account_id: i64,
        contract_id: i64,
        document: NewCmrDocument,
    ) -> Result<CmrDocument, MarketplaceError> {
        if is_blank(&document.file_path) {
            return Err(ValidationError::field("file_path", "This field is required.").into());
        }
        let contract = self.contract_for_account(account_id, contract_id).await?;
        let document = self.db.insert_cmr_document(contract.id, document.file_path.trim(), Utc::now()).await?;
        info!("🔄️ CMR document #{} recorded for contract {}", document.id, contract.contract_number);
        Ok(document)
    }

    pub async fn cmr_documents(&self, account_id: i64, contract_id: i64) -> Result<Vec<CmrDocument>, MarketplaceError> {
        let contract = self.contract_for_account(account_id, contract_id).await?;
        self.db.fetch_cmr_documents(contract.id).await
    }

    async fn role_of(&self, account_id: i64) -> Result<Role, MarketplaceError> {
        let account =
            self.db.fetch_account(account_id).await?.ok_or(AccountApiError::AccountNotFound(account_id))?;
        Ok(account.role)
    }

    /// Shippers are party to a contract through its cargo order, carriers through its transport order.
    async fn ensure_party(&self, account_id: i64, contract: &ShipmentContract) -> Result<(), MarketplaceError> {
        let is_party = match self.role_of(account_id).await? {
            Role::Shipper => {
                let profile = shipper_profile(&self.db, account_id).await?;
                self.db.fetch_cargo_order(contract.cargo_order_id).await?.is_some_and(|o| o.shipper_id == profile.id)
            },
            Role::Carrier => {
                let profile = carrier_profile(&self.db, account_id).await?;
                self.db
                    .fetch_transport_order(contract.transport_order_id)
                    .await?
                    .is_some_and(|o| o.carrier_id == profile.id)
            },
        };
        if is_party {
            Ok(())
        } else {
            warn!("🔄️ Account {account_id} tried to access contract {} without being a party to it", contract.id);
            Err(MarketplaceError::Forbidden(format!("Account {account_id} is not a party to this contract.")))
        }
    }
}
