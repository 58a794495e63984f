use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;

//--------------------------------------       Money         ---------------------------------------------------------
/// A freight price, held as an integer number of cents.
///
/// Prices are serialised as integer cents on the wire and in the database.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Money(i64);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Money {
    pub fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Money::from(150_050).to_string(), "1500.50");
        assert_eq!(Money::from(7).to_string(), "0.07");
        assert_eq!(Money::from(-1_250).to_string(), "-12.50");
    }

    #[test]
    fn cents_on_the_wire() {
        assert_eq!(serde_json::to_string(&Money::from_units(15)).unwrap(), "1500");
        let m: Money = serde_json::from_str("-5").unwrap();
        assert!(m.is_negative());
        assert!(!Money::default().is_negative());
    }
}
