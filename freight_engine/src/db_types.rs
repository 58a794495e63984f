use std::{fmt::Display, str::FromStr, sync::OnceLock};

use chrono::{DateTime, Utc};
use freight_common::{is_blank, Coordinate, Money, Point, RouteOption};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::traits::ValidationError;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        Role         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Shipper,
    Carrier,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Shipper => write!(f, "shipper"),
            Role::Carrier => write!(f, "carrier"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shipper" => Ok(Self::Shipper),
            "carrier" => Ok(Self::Carrier),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------     TrailerType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize)]
pub enum TrailerType {
    #[sqlx(rename = "tautliner")]
    #[serde(rename = "tautliner")]
    Tautliner,
    #[sqlx(rename = "reefer")]
    #[serde(rename = "reefer")]
    Reefer,
    #[sqlx(rename = "insulated trailer")]
    #[serde(rename = "insulated trailer")]
    InsulatedTrailer,
    #[sqlx(rename = "container chassis")]
    #[serde(rename = "container chassis")]
    ContainerChassis,
    #[sqlx(rename = "flatbed trailer")]
    #[serde(rename = "flatbed trailer")]
    FlatbedTrailer,
    #[sqlx(rename = "tandem trailer")]
    #[serde(rename = "tandem trailer")]
    TandemTrailer,
    #[sqlx(rename = "car transporter")]
    #[serde(rename = "car transporter")]
    CarTransporter,
    #[sqlx(rename = "cattle trailer")]
    #[serde(rename = "cattle trailer")]
    CattleTrailer,
    #[sqlx(rename = "open-top trailer")]
    #[serde(rename = "open-top trailer")]
    OpenTopTrailer,
    #[sqlx(rename = "cement tanker")]
    #[serde(rename = "cement tanker")]
    CementTanker,
    /// Dangerous goods
    #[sqlx(rename = "adr")]
    #[serde(rename = "adr")]
    Adr,
    #[sqlx(rename = "timber trailer")]
    #[serde(rename = "timber trailer")]
    TimberTrailer,
    #[sqlx(rename = "lowboy trailer")]
    #[serde(rename = "lowboy trailer")]
    LowboyTrailer,
    #[sqlx(rename = "tanker trailer")]
    #[serde(rename = "tanker trailer")]
    TankerTrailer,
    #[sqlx(rename = "dump trailer")]
    #[serde(rename = "dump trailer")]
    DumpTrailer,
    #[sqlx(rename = "bulk flour tanker")]
    #[serde(rename = "bulk flour tanker")]
    BulkFlourTanker,
}

impl TrailerType {
    pub const ALL: [TrailerType; 16] = [
        TrailerType::Tautliner,
        TrailerType::Reefer,
        TrailerType::InsulatedTrailer,
        TrailerType::ContainerChassis,
        TrailerType::FlatbedTrailer,
        TrailerType::TandemTrailer,
        TrailerType::CarTransporter,
        TrailerType::CattleTrailer,
        TrailerType::OpenTopTrailer,
        TrailerType::CementTanker,
        TrailerType::Adr,
        TrailerType::TimberTrailer,
        TrailerType::LowboyTrailer,
        TrailerType::TankerTrailer,
        TrailerType::DumpTrailer,
        TrailerType::BulkFlourTanker,
    ];

    /// The wire and storage spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            TrailerType::Tautliner => "tautliner",
            TrailerType::Reefer => "reefer",
            TrailerType::InsulatedTrailer => "insulated trailer",
            TrailerType::ContainerChassis => "container chassis",
            TrailerType::FlatbedTrailer => "flatbed trailer",
            TrailerType::TandemTrailer => "tandem trailer",
            TrailerType::CarTransporter => "car transporter",
            TrailerType::CattleTrailer => "cattle trailer",
            TrailerType::OpenTopTrailer => "open-top trailer",
            TrailerType::CementTanker => "cement tanker",
            TrailerType::Adr => "adr",
            TrailerType::TimberTrailer => "timber trailer",
            TrailerType::LowboyTrailer => "lowboy trailer",
            TrailerType::TankerTrailer => "tanker trailer",
            TrailerType::DumpTrailer => "dump trailer",
            TrailerType::BulkFlourTanker => "bulk flour tanker",
        }
    }
}

impl Display for TrailerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailerType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        TrailerType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| ConversionError(format!("Invalid trailer type: {s}")))
    }
}

/// Accepts any spelling that [`TrailerType::from_str`] does, so JSON bodies and query strings are case-insensitive.
impl<'de> Deserialize<'de> for TrailerType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------       Account       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub company_name: String,
    pub address: String,
    pub vat_number: Option<String>,
    pub phone_number: Option<String>,
    pub contact_person: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      NewAccount     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub company_name: String,
    /// The legal address. It becomes the profile's `legal_address`.
    pub address: String,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub contact_person: String,
    pub role: Role,
    /// Shippers only. Ignored for carriers.
    #[serde(default)]
    pub warehouse_address: Option<String>,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("username", &self.username),
            ("email", &self.email),
            ("company_name", &self.company_name),
            ("address", &self.address),
            ("contact_person", &self.contact_person),
        ] {
            if is_blank(value) {
                return Err(ValidationError::field(field, "This field is required."));
            }
        }
        if !self.email.contains('@') {
            return Err(ValidationError::field("email", "Enter a valid email address."));
        }
        Ok(())
    }

    /// Empty optional text fields are stored as NULL so that the UNIQUE constraint on `vat_number` only applies to
    /// real values.
    pub fn normalized(mut self) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
        self.vat_number = clean(self.vat_number);
        self.phone_number = clean(self.phone_number);
        self.warehouse_address = match self.role {
            Role::Shipper => clean(self.warehouse_address),
            Role::Carrier => None,
        };
        self
    }
}

//--------------------------------------   ShipperProfile    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ShipperProfile {
    pub id: i64,
    pub account_id: i64,
    pub legal_address: String,
    pub legal_address_latitude: Option<f64>,
    pub legal_address_longitude: Option<f64>,
    pub warehouse_address: Option<String>,
    pub warehouse_latitude: Option<f64>,
    pub warehouse_longitude: Option<f64>,
    pub contact_person: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub vat_number: Option<String>,
}

impl ShipperProfile {
    pub fn legal_coordinate(&self) -> Option<Coordinate> {
        coordinate(self.legal_address_longitude, self.legal_address_latitude)
    }

    pub fn warehouse_coordinate(&self) -> Option<Coordinate> {
        coordinate(self.warehouse_longitude, self.warehouse_latitude)
    }
}

//--------------------------------------   CarrierProfile    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CarrierProfile {
    pub id: i64,
    pub account_id: i64,
    pub legal_address: String,
    pub legal_address_latitude: Option<f64>,
    pub legal_address_longitude: Option<f64>,
    pub contact_person: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub vat_number: Option<String>,
}

impl CarrierProfile {
    pub fn legal_coordinate(&self) -> Option<Coordinate> {
        coordinate(self.legal_address_longitude, self.legal_address_latitude)
    }
}

fn coordinate(longitude: Option<f64>, latitude: Option<f64>) -> Option<Coordinate> {
    Some(Coordinate::new(longitude?, latitude?))
}

/// The role-specific half of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Shipper(ShipperProfile),
    Carrier(CarrierProfile),
}

impl Profile {
    pub fn id(&self) -> i64 {
        match self {
            Profile::Shipper(p) => p.id,
            Profile::Carrier(p) => p.id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Shipper(_) => Role::Shipper,
            Profile::Carrier(_) => Role::Carrier,
        }
    }
}

//--------------------------------------      CargoItem      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CargoItem {
    pub id: i64,
    pub shipper_id: i64,
    pub name: String,
    /// m³
    pub volume: f64,
    /// kg
    pub weight: f64,
    pub on_pallets: bool,
    pub number_of_pallets: i64,
    pub packaging: Option<String>,
    pub storage_conditions: Option<String>,
    pub transport_conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCargoItem {
    pub name: String,
    pub volume: f64,
    pub weight: f64,
    #[serde(default)]
    pub on_pallets: bool,
    #[serde(default)]
    pub number_of_pallets: i64,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub storage_conditions: Option<String>,
    #[serde(default)]
    pub transport_conditions: Option<String>,
}

impl NewCargoItem {
    pub fn new<S: Into<String>>(name: S, volume: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            volume,
            weight,
            on_pallets: false,
            number_of_pallets: 0,
            packaging: None,
            storage_conditions: None,
            transport_conditions: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::field("name", "This field is required."));
        }
        if self.volume.is_nan() || self.volume < 0.0 {
            return Err(ValidationError::field("volume", "Volume cannot be negative."));
        }
        if self.weight.is_nan() || self.weight < 0.0 {
            return Err(ValidationError::field("weight", "Weight cannot be negative."));
        }
        if self.number_of_pallets < 0 {
            return Err(ValidationError::field("number_of_pallets", "Number of pallets cannot be negative."));
        }
        Ok(())
    }
}

//--------------------------------------    TransportItem    ---------------------------------------------------------
pub const MAX_PLATE_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TransportItem {
    pub id: i64,
    pub carrier_id: i64,
    pub driver_license: String,
    pub truck_number: String,
    pub trailer_number: String,
    pub trailer_type: TrailerType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransportItem {
    pub driver_license: String,
    pub truck_number: String,
    pub trailer_number: String,
    pub trailer_type: TrailerType,
}

impl NewTransportItem {
    pub fn new<S: Into<String>>(driver_license: S, truck_number: S, trailer_number: S, trailer_type: TrailerType) -> Self {
        Self {
            driver_license: driver_license.into(),
            truck_number: truck_number.into(),
            trailer_number: trailer_number.into(),
            trailer_type,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("driver_license", &self.driver_license),
            ("truck_number", &self.truck_number),
            ("trailer_number", &self.trailer_number),
        ] {
            if is_blank(value) {
                return Err(ValidationError::field(field, "This field is required."));
            }
            if value.trim().chars().count() > MAX_PLATE_LENGTH {
                return Err(ValidationError::field(
                    field,
                    format!("Ensure this value has at most {MAX_PLATE_LENGTH} characters."),
                ));
            }
        }
        Ok(())
    }
}

//--------------------------------------      Category       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Cargo,
    Transport,
}

impl CategoryKind {
    pub fn table(&self) -> &'static str {
        match self {
            CategoryKind::Cargo => "cargo_categories",
            CategoryKind::Transport => "transport_categories",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Cargo => write!(f, "cargo"),
            CategoryKind::Transport => write!(f, "transport"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

//--------------------------------------     CargoOrder      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoOrder {
    pub id: i64,
    pub shipper_id: i64,
    pub cargo_item_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub loading_points: Vec<Point>,
    pub unloading_points: Vec<Point>,
    pub insurance: bool,
    pub price: Money,
    pub trailer_type: Option<TrailerType>,
    pub route_info: Option<Vec<RouteOption>>,
    pub is_accepted: bool,
    pub carrier_id: Option<i64>,
    pub contract_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CargoOrder {
    pub fn is_contracted(&self) -> bool {
        self.contract_id.is_some()
    }
}

/// A fully resolved cargo order, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewCargoOrder {
    pub shipper_id: i64,
    pub cargo_item_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub loading_points: Vec<Point>,
    pub unloading_points: Vec<Point>,
    pub insurance: bool,
    pub price: Money,
    pub trailer_type: Option<TrailerType>,
    pub route_info: Option<Vec<RouteOption>>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   TransportOrder    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOrder {
    pub id: i64,
    pub carrier_id: i64,
    pub transport_item_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub loading_points: Vec<Point>,
    pub unloading_points: Vec<Point>,
    pub insurance: bool,
    pub price: Money,
    pub route_info: Option<Vec<RouteOption>>,
    pub contract_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransportOrder {
    pub fn is_contracted(&self) -> bool {
        self.contract_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewTransportOrder {
    pub carrier_id: i64,
    pub transport_item_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub loading_points: Vec<Point>,
    pub unloading_points: Vec<Point>,
    pub insurance: bool,
    pub price: Money,
    pub route_info: Option<Vec<RouteOption>>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   ContractNumber    ---------------------------------------------------------
/// `CONTRACT-` followed by the UTC creation timestamp as `%Y%m%d%H%M%S`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ContractNumber(String);

impl ContractNumber {
    pub const PATTERN: &'static str = r"^CONTRACT-\d{14}$";

    pub fn for_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self(format!("CONTRACT-{}", timestamp.format("%Y%m%d%H%M%S")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContractNumber {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if contract_number_regex()?.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ConversionError(format!("Invalid contract number: {s}")))
        }
    }
}

fn contract_number_regex() -> Result<&'static Regex, ConversionError> {
    static CONTRACT_NUMBER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    CONTRACT_NUMBER
        .get_or_init(|| Regex::new(ContractNumber::PATTERN))
        .as_ref()
        .map_err(|e| ConversionError(e.to_string()))
}

impl Display for ContractNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------  ShipmentContract   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ShipmentContract {
    pub id: i64,
    pub cargo_order_id: i64,
    pub transport_order_id: i64,
    pub contract_number: ContractNumber,
    pub price: Money,
    pub payment_deadline: DateTime<Utc>,
    pub delivery_deadline: DateTime<Utc>,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub cargo_order_id: i64,
    pub transport_order_id: i64,
    pub contract_number: ContractNumber,
    pub price: Money,
    pub payment_deadline: DateTime<Utc>,
    pub delivery_deadline: DateTime<Utc>,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     CmrDocument     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CmrDocument {
    pub id: i64,
    pub contract_id: i64,
    pub file_path: String,
    pub generated_at: DateTime<Utc>,
}

//--------------------------------------  VirtualWarehouse   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct VirtualWarehouse {
    pub id: i64,
    pub shipper_id: i64,
}

/// One stock line. Quantities are in kilograms, the unit of [`CargoItem::weight`].
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WarehouseStock {
    pub id: i64,
    pub warehouse_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub initial_quantity: f64,
    pub available_quantity: f64,
}
