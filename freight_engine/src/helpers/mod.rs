mod contract_terms;
mod stock;

pub use contract_terms::{ContractTerms, DELIVERY_TERM_DAYS, PAYMENT_TERM_DAYS};
pub use stock::available_quantity;
