use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::db_types::ContractNumber;

pub const PAYMENT_TERM_DAYS: i64 = 7;
pub const DELIVERY_TERM_DAYS: i64 = 14;

/// The number, timestamp and deadlines fixed when a contract is formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTerms {
    pub contract_number: ContractNumber,
    pub created_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    pub delivery_deadline: DateTime<Utc>,
}

impl ContractTerms {
    /// Terms for a contract formed at `now`. The creation time is truncated to whole seconds, so the contract number
    /// and the deadlines all agree to the second.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let created_at = now.trunc_subsecs(0);
        Self {
            contract_number: ContractNumber::for_timestamp(created_at),
            created_at,
            payment_deadline: created_at + Duration::days(PAYMENT_TERM_DAYS),
            delivery_deadline: created_at + Duration::days(DELIVERY_TERM_DAYS),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn deadlines_follow_creation_time() {
        let now = Utc.with_ymd_and_hms(2024, 2, 25, 23, 59, 58).unwrap() + Duration::milliseconds(750);
        let terms = ContractTerms::starting_at(now);
        assert_eq!(terms.created_at, Utc.with_ymd_and_hms(2024, 2, 25, 23, 59, 58).unwrap());
        assert_eq!(terms.contract_number.as_str(), "CONTRACT-20240225235958");
        assert_eq!(terms.payment_deadline, Utc.with_ymd_and_hms(2024, 3, 3, 23, 59, 58).unwrap());
        assert_eq!(terms.delivery_deadline, Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 58).unwrap());
    }
}
