use serde::{Deserialize, Serialize};

use super::Address;
use crate::config::AddressRegion;

/// The applicant's primary bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub account_no: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub address: Address,
}

impl Bank {
    pub fn blank(region: AddressRegion) -> Self {
        Self {
            phone: Some(String::new()),
            fax: Some(String::new()),
            email: Some(String::new()),
            address: Address::blank(region),
            ..Self::default()
        }
    }
}

/// A supplier the applicant already buys from on terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRef {
    pub name: String,
    pub account_no: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
}

impl TradeRef {
    pub fn blank(region: AddressRegion) -> Self {
        Self {
            account_no: Some(String::new()),
            phone: Some(String::new()),
            fax: Some(String::new()),
            email: Some(String::new()),
            address: Some(Address::blank(region)),
            ..Self::default()
        }
    }
}
