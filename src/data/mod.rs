//! External data: World Bank inflation observations and the country list.

pub mod countries;
pub mod worldbank;

pub use countries::search_countries;
pub use worldbank::{InflationResponse, WorldBankClient, WorldBankConfig};
