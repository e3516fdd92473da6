use serde::{Deserialize, Serialize};

use crate::config::AddressRegion;

/// A postal address. Exactly one of `country` / `county` is collected,
/// depending on the deployment's [`AddressRegion`]; the other stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// An empty address collecting the locality field `region` selects.
    pub fn blank(region: AddressRegion) -> Self {
        match region {
            AddressRegion::Country => Self {
                country: Some(String::new()),
                ..Self::default()
            },
            AddressRegion::County => Self {
                county: Some(String::new()),
                ..Self::default()
            },
        }
    }
}
