use std::collections::BTreeMap;

use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::{Address, Bank, Contact, NySt120, Owner, ResaleCertificate, Signer, TradeRef};
use crate::config::FormConfig;
use crate::reference::{NEW_YORK, requires_resale_number};
use crate::wizard::BranchFlags;

/// Number of trade references every application carries.
pub const TRADE_REFERENCE_COUNT: usize = 3;

/// Errors from structural edits that would break an application invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("an application needs at least one {0}")]
    LastEntry(&'static str),

    #[error("no {kind} at position {index}")]
    NoSuchEntry { kind: &'static str, index: usize },

    #[error("state '{0}' is not a selected exempt state that takes a resale number")]
    UnexpectedResaleNumber(String),
}

/// One in-progress credit application.
///
/// Sections belonging to inactive branches are kept, not cleared: turning
/// `request_line_of_credit` off and on again brings the credit answers back.
///
/// List fields with a minimum size (`contacts`, `owners`, `signers`) and the
/// tax-exemption state selection are private so every edit goes through a
/// method that keeps the invariants.
///
/// Saved applications are checked on load: an empty contact, owner or signer
/// list is rejected, and resale numbers are pruned as [`set_exempt_states`]
/// would.
///
/// [`set_exempt_states`]: CreditApplication::set_exempt_states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawApplication")]
pub struct CreditApplication {
    // Business
    pub company_name: String,
    pub dba_name: Option<String>,
    pub phone: String,
    pub fax: Option<String>,
    pub email: String,
    pub ein: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: Option<String>,
    pub county: Option<String>,
    pub po_required: bool,
    pub mailing_different: bool,
    pub mailing: Option<Address>,
    pub entity_type: String,
    pub primary_business: Option<String>,
    pub customer_number: Option<String>,
    pub state_of_incorporation: Option<String>,
    pub years_in_business: Option<String>,
    contacts: Vec<Contact>,
    pub invoice_email: Option<String>,
    pub statement_email: Option<String>,
    pub acknowledgement_email: Option<String>,

    // Branching
    pub request_line_of_credit: bool,
    pub request_tax_exempt: bool,

    // Credit
    pub credit_amount: Option<Decimal>,
    pub credit_disclosure_ack: bool,
    owners: Vec<Owner>,
    pub bank: Option<Bank>,
    pub trade_refs: [TradeRef; TRADE_REFERENCE_COUNT],

    // Tax exemption
    exempt_states: Vec<String>,
    resale_numbers: BTreeMap<String, String>,
    pub resale_certificate: Option<ResaleCertificate>,
    pub ny_st120: NySt120,

    // Signing
    pub csa_name: Option<String>,
    pub csa_email: Option<String>,
    pub customer_finance_name: Option<String>,
    pub customer_finance_email: Option<String>,
    signers: Vec<Signer>,
}

/// Unchecked shape of a saved application.
#[derive(Deserialize)]
struct RawApplication {
    company_name: String,
    dba_name: Option<String>,
    phone: String,
    fax: Option<String>,
    email: String,
    ein: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    country: Option<String>,
    county: Option<String>,
    po_required: bool,
    mailing_different: bool,
    mailing: Option<Address>,
    entity_type: String,
    primary_business: Option<String>,
    customer_number: Option<String>,
    state_of_incorporation: Option<String>,
    years_in_business: Option<String>,
    contacts: Vec<Contact>,
    invoice_email: Option<String>,
    statement_email: Option<String>,
    acknowledgement_email: Option<String>,
    request_line_of_credit: bool,
    request_tax_exempt: bool,
    credit_amount: Option<Decimal>,
    credit_disclosure_ack: bool,
    owners: Vec<Owner>,
    bank: Option<Bank>,
    trade_refs: [TradeRef; TRADE_REFERENCE_COUNT],
    exempt_states: Vec<String>,
    #[serde(default)]
    resale_numbers: BTreeMap<String, String>,
    resale_certificate: Option<ResaleCertificate>,
    ny_st120: NySt120,
    csa_name: Option<String>,
    csa_email: Option<String>,
    customer_finance_name: Option<String>,
    customer_finance_email: Option<String>,
    signers: Vec<Signer>,
}

impl TryFrom<RawApplication> for CreditApplication {
    type Error = ModelError;

    fn try_from(raw: RawApplication) -> Result<Self, Self::Error> {
        if raw.contacts.is_empty() {
            return Err(ModelError::LastEntry("contact"));
        }
        if raw.owners.is_empty() {
            return Err(ModelError::LastEntry("owner"));
        }
        if raw.signers.is_empty() {
            return Err(ModelError::LastEntry("signer"));
        }

        let mut application = Self {
            company_name: raw.company_name,
            dba_name: raw.dba_name,
            phone: raw.phone,
            fax: raw.fax,
            email: raw.email,
            ein: raw.ein,
            address: raw.address,
            city: raw.city,
            state: raw.state,
            zip: raw.zip,
            country: raw.country,
            county: raw.county,
            po_required: raw.po_required,
            mailing_different: raw.mailing_different,
            mailing: raw.mailing,
            entity_type: raw.entity_type,
            primary_business: raw.primary_business,
            customer_number: raw.customer_number,
            state_of_incorporation: raw.state_of_incorporation,
            years_in_business: raw.years_in_business,
            contacts: raw.contacts,
            invoice_email: raw.invoice_email,
            statement_email: raw.statement_email,
            acknowledgement_email: raw.acknowledgement_email,
            request_line_of_credit: raw.request_line_of_credit,
            request_tax_exempt: raw.request_tax_exempt,
            credit_amount: raw.credit_amount,
            credit_disclosure_ack: raw.credit_disclosure_ack,
            owners: raw.owners,
            bank: raw.bank,
            trade_refs: raw.trade_refs,
            exempt_states: Vec::new(),
            resale_numbers: raw.resale_numbers,
            resale_certificate: raw.resale_certificate,
            ny_st120: raw.ny_st120,
            csa_name: raw.csa_name,
            csa_email: raw.csa_email,
            customer_finance_name: raw.customer_finance_name,
            customer_finance_email: raw.customer_finance_email,
            signers: raw.signers,
        };
        let before = application.resale_numbers.len();
        application.set_exempt_states(raw.exempt_states);
        let dropped = before - application.resale_numbers.len();
        if dropped > 0 {
            warn!(dropped, "discarded resale numbers for unselected states");
        }
        Ok(application)
    }
}

/// Builds a blank application for a new session.
///
/// The resale certificate's effective date defaults to January 1st of the
/// current local year; everything else is fixed by `config`.
pub fn default_application(config: &FormConfig) -> CreditApplication {
    default_application_for_year(config, Local::now().year())
}

/// [`default_application`] with the resale certificate year supplied.
pub fn default_application_for_year(
    config: &FormConfig,
    year: i32,
) -> CreditApplication {
    let region = config.address_region;
    let blank_address = Address::blank(region);

    CreditApplication {
        company_name: String::new(),
        dba_name: Some(String::new()),
        phone: String::new(),
        fax: Some(String::new()),
        email: String::new(),
        ein: String::new(),
        address: String::new(),
        city: String::new(),
        state: String::new(),
        zip: String::new(),
        country: blank_address.country.clone(),
        county: blank_address.county.clone(),
        po_required: config.requires_po,
        mailing_different: false,
        mailing: Some(blank_address.clone()),
        entity_type: config.default_entity_type().to_string(),
        primary_business: Some(String::new()),
        customer_number: Some(String::new()),
        state_of_incorporation: Some(String::new()),
        years_in_business: Some(String::new()),
        contacts: vec![Contact::with_role(config.contact_role(0))],
        invoice_email: Some(String::new()),
        statement_email: Some(String::new()),
        acknowledgement_email: Some(String::new()),

        request_line_of_credit: true,
        request_tax_exempt: true,

        credit_amount: None,
        credit_disclosure_ack: false,
        owners: vec![Owner::blank(blank_address.clone())],
        bank: Some(Bank::blank(region)),
        trade_refs: std::array::from_fn(|_| TradeRef::blank(region)),

        exempt_states: Vec::new(),
        resale_numbers: BTreeMap::new(),
        resale_certificate: Some(ResaleCertificate::blank(year)),
        ny_st120: NySt120::blank(),

        csa_name: None,
        csa_email: None,
        customer_finance_name: None,
        customer_finance_email: None,
        signers: vec![Signer::blank()],
    }
}

fn remove_keeping_one<T>(
    items: &mut Vec<T>,
    index: usize,
    kind: &'static str,
) -> Result<T, ModelError> {
    if index >= items.len() {
        return Err(ModelError::NoSuchEntry { kind, index });
    }
    if items.len() == 1 {
        return Err(ModelError::LastEntry(kind));
    }
    Ok(items.remove(index))
}

impl CreditApplication {
    pub fn branch_flags(&self) -> BranchFlags {
        BranchFlags {
            request_line_of_credit: self.request_line_of_credit,
            request_tax_exempt: self.request_tax_exempt,
        }
    }

    // ── contacts ─────────────────────────────────────────────────────────

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts
    }

    /// Appends a contact whose role is the next configured role.
    pub fn add_contact(
        &mut self,
        config: &FormConfig,
    ) -> &mut Contact {
        let role = config.contact_role(self.contacts.len()).to_string();
        self.contacts.push(Contact::with_role(role));
        let last = self.contacts.len() - 1;
        &mut self.contacts[last]
    }

    pub fn remove_contact(
        &mut self,
        index: usize,
    ) -> Result<Contact, ModelError> {
        remove_keeping_one(&mut self.contacts, index, "contact")
    }

    // ── owners ───────────────────────────────────────────────────────────

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn owners_mut(&mut self) -> &mut [Owner] {
        &mut self.owners
    }

    pub fn add_owner(
        &mut self,
        config: &FormConfig,
    ) -> &mut Owner {
        self.owners
            .push(Owner::blank(Address::blank(config.address_region)));
        let last = self.owners.len() - 1;
        &mut self.owners[last]
    }

    pub fn remove_owner(
        &mut self,
        index: usize,
    ) -> Result<Owner, ModelError> {
        remove_keeping_one(&mut self.owners, index, "owner")
    }

    // ── signers ──────────────────────────────────────────────────────────

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn signers_mut(&mut self) -> &mut [Signer] {
        &mut self.signers
    }

    pub fn add_signer(&mut self) -> &mut Signer {
        self.signers.push(Signer::blank());
        let last = self.signers.len() - 1;
        &mut self.signers[last]
    }

    pub fn remove_signer(
        &mut self,
        index: usize,
    ) -> Result<Signer, ModelError> {
        remove_keeping_one(&mut self.signers, index, "signer")
    }

    /// Returns `true` once every signer has ticked the agreement box.
    pub fn all_signers_agreed(&self) -> bool {
        !self.signers.is_empty() && self.signers.iter().all(|s| s.agree)
    }

    // ── tax exemption ────────────────────────────────────────────────────

    pub fn exempt_states(&self) -> &[String] {
        &self.exempt_states
    }

    pub fn is_exempt_in(
        &self,
        code: &str,
    ) -> bool {
        self.exempt_states.iter().any(|s| s == code)
    }

    /// Replaces the exempt state selection, dropping duplicates while keeping
    /// first-seen order.
    ///
    /// Resale numbers for states that are no longer selected are discarded so
    /// the resale number keys always stay within the selection.
    pub fn set_exempt_states<I, S>(
        &mut self,
        codes: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into();
            if !selected.contains(&code) {
                selected.push(code);
            }
        }
        self.exempt_states = selected;

        let exempt = &self.exempt_states;
        self.resale_numbers
            .retain(|code, _| requires_resale_number(code) && exempt.contains(code));
    }

    /// Selected states that need a resale number, in selection order.
    pub fn required_resale_states(&self) -> Vec<&str> {
        self.exempt_states
            .iter()
            .map(String::as_str)
            .filter(|code| requires_resale_number(code))
            .collect()
    }

    pub fn resale_numbers(&self) -> &BTreeMap<String, String> {
        &self.resale_numbers
    }

    pub fn resale_number(
        &self,
        code: &str,
    ) -> Option<&str> {
        self.resale_numbers.get(code).map(String::as_str)
    }

    /// Records the resale number for a selected state that takes one.
    pub fn set_resale_number(
        &mut self,
        code: &str,
        number: impl Into<String>,
    ) -> Result<(), ModelError> {
        if !(self.is_exempt_in(code) && requires_resale_number(code)) {
            return Err(ModelError::UnexpectedResaleNumber(code.to_string()));
        }
        self.resale_numbers.insert(code.to_string(), number.into());
        Ok(())
    }

    /// The ST-120 is required when the tax branch is on and New York is selected.
    pub fn requires_ny_st120(&self) -> bool {
        self.request_tax_exempt && self.is_exempt_in(NEW_YORK)
    }
}
