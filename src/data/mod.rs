mod load;
mod parse;
mod records;

pub use load::load_network_data;
pub use records::{ContactRecord, ExchangeDirection, NetworkData, ReferralRecord};
