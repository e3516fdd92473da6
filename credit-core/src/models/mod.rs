mod address;
mod application;
mod credit;
mod party;
mod tax_exemption;

pub use address::Address;
pub use application::{
    CreditApplication, ModelError, TRADE_REFERENCE_COUNT, default_application,
    default_application_for_year,
};
pub use credit::{Bank, TradeRef};
pub use party::{Contact, Owner, Signer};
pub use tax_exemption::{EffectiveDate, NySt120, ResaleCertificate};
