use serde::{Deserialize, Serialize};

use super::Address;

/// A person the credit department can reach. `role` is free text; new
/// applications seed it from the configured contact roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub role: String,
    pub name: String,
    pub title: String,
    pub email: String,
}

impl Contact {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Self::default()
        }
    }
}

/// A principal of the applying business.
///
/// `ssn` holds the canonical `123-45-6789` form. Use
/// [`mask_ssn`](crate::masking::mask_ssn) to display it; never store the mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub title: String,
    pub ssn: String,
    pub full_time: Option<bool>,
    pub home_address: Option<Address>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Owner {
    pub fn blank(home_address: Address) -> Self {
        Self {
            phone: Some(String::new()),
            email: Some(String::new()),
            home_address: Some(home_address),
            ..Self::default()
        }
    }
}

/// Someone signing the application. `signature_data_url` references a
/// captured signature image and is never inspected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub name: String,
    pub title: String,
    pub agree: bool,
    pub date: Option<String>,
    pub signature_data_url: Option<String>,
}

impl Signer {
    pub fn blank() -> Self {
        Self {
            date: Some(String::new()),
            signature_data_url: Some(String::new()),
            ..Self::default()
        }
    }

    pub fn has_signature(&self) -> bool {
        self.signature_data_url
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
