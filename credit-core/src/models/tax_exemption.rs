use serde::{Deserialize, Serialize};

/// Day, month and year entered as separate fields on the resale certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl EffectiveDate {
    /// January 1st of `year`.
    pub fn start_of(year: i32) -> Self {
        Self {
            day: 1,
            month: 1,
            year,
        }
    }
}

/// Generic multi-state resale certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResaleCertificate {
    pub product_description: Option<String>,
    pub other_exemption: Option<String>,
    pub effective_date: Option<EffectiveDate>,
    pub purchaser_name: Option<String>,
    pub purchaser_address: Option<String>,
    pub purchaser_city: Option<String>,
    pub purchaser_state: Option<String>,
    pub purchaser_zip: Option<String>,
    pub purchaser_country: Option<String>,
    pub signature_name: Option<String>,
    pub signature_title: Option<String>,
    pub signature_date: Option<String>,
    /// Goods are bought for resale.
    pub resale: Option<bool>,
    /// Goods are incorporated into a product that is resold.
    pub incorporating: Option<bool>,
    pub customer_number: Option<u64>,
}

impl ResaleCertificate {
    /// A blank certificate effective from January 1st of `year`.
    pub fn blank(year: i32) -> Self {
        let empty = || Some(String::new());
        Self {
            resale: Some(false),
            incorporating: Some(false),
            product_description: empty(),
            other_exemption: empty(),
            effective_date: Some(EffectiveDate::start_of(year)),
            purchaser_name: empty(),
            purchaser_address: empty(),
            purchaser_city: empty(),
            purchaser_state: empty(),
            purchaser_zip: empty(),
            purchaser_country: empty(),
            signature_name: empty(),
            signature_title: empty(),
            signature_date: empty(),
            customer_number: None,
        }
    }
}

/// New York Form ST-120, collected only when New York is an exempt state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NySt120 {
    pub purchaser_name: String,
    pub purchaser_address: String,
    pub purchaser_country: Option<String>,
    pub ny_registration: String,
    pub vendor_name: String,
    pub signer_name: Option<String>,
    pub signer_title: Option<String>,
    pub signer_date: Option<String>,
}

impl NySt120 {
    pub fn blank() -> Self {
        Self {
            purchaser_country: Some(String::new()),
            signer_name: Some(String::new()),
            signer_title: Some(String::new()),
            signer_date: Some(String::new()),
            ..Self::default()
        }
    }
}
