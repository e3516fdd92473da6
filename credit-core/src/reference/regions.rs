use serde::{Deserialize, Serialize};

/// Code of the one state whose resale certificate has its own form (ST-120).
pub const NEW_YORK: &str = "NY";

/// A state, province or country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
    /// Whether a tax exemption in this state needs a resale number.
    pub resale_number_required: bool,
}

const fn region(
    code: &'static str,
    name: &'static str,
) -> Region {
    Region {
        code,
        name,
        resale_number_required: false,
    }
}

const fn resale_region(
    code: &'static str,
    name: &'static str,
) -> Region {
    Region {
        code,
        name,
        resale_number_required: true,
    }
}

/// The 50 states plus DC, in display order.
pub static US_STATES: [Region; 51] = [
    region("AL", "Alabama"),
    region("AK", "Alaska"),
    region("AZ", "Arizona"),
    region("AR", "Arkansas"),
    resale_region("CA", "California"),
    region("CO", "Colorado"),
    region("CT", "Connecticut"),
    region("DE", "Delaware"),
    region("DC", "District of Columbia"),
    resale_region("FL", "Florida"),
    region("GA", "Georgia"),
    resale_region("HI", "Hawaii"),
    region("ID", "Idaho"),
    resale_region("IL", "Illinois"),
    region("IN", "Indiana"),
    region("IA", "Iowa"),
    region("KS", "Kansas"),
    region("KY", "Kentucky"),
    resale_region("LA", "Louisiana"),
    region("ME", "Maine"),
    resale_region("MD", "Maryland"),
    resale_region("MA", "Massachusetts"),
    region("MI", "Michigan"),
    region("MN", "Minnesota"),
    region("MS", "Mississippi"),
    region("MO", "Missouri"),
    region("MT", "Montana"),
    region("NE", "Nebraska"),
    region("NV", "Nevada"),
    region("NH", "New Hampshire"),
    region("NJ", "New Jersey"),
    region("NM", "New Mexico"),
    resale_region("NY", "New York"),
    region("NC", "North Carolina"),
    region("ND", "North Dakota"),
    region("OH", "Ohio"),
    region("OK", "Oklahoma"),
    region("OR", "Oregon"),
    region("PA", "Pennsylvania"),
    region("RI", "Rhode Island"),
    region("SC", "South Carolina"),
    region("SD", "South Dakota"),
    region("TN", "Tennessee"),
    region("TX", "Texas"),
    region("UT", "Utah"),
    region("VT", "Vermont"),
    region("VA", "Virginia"),
    resale_region("WA", "Washington"),
    region("WV", "West Virginia"),
    region("WI", "Wisconsin"),
    region("WY", "Wyoming"),
];

/// Canadian provinces and territories.
pub static CA_PROVINCES: [Region; 13] = [
    region("AB", "Alberta"),
    region("BC", "British Columbia"),
    region("MB", "Manitoba"),
    region("NB", "New Brunswick"),
    region("NL", "Newfoundland and Labrador"),
    region("NS", "Nova Scotia"),
    region("NT", "Northwest Territories"),
    region("NU", "Nunavut"),
    region("ON", "Ontario"),
    region("PE", "Prince Edward Island"),
    region("QC", "Quebec"),
    region("SK", "Saskatchewan"),
    region("YT", "Yukon"),
];

pub static COUNTRIES: [Region; 2] = [region("US", "United States"), region("CA", "Canada")];

/// A `{label, value}` pair for a select input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl From<&Region> for SelectOption {
    fn from(region: &Region) -> Self {
        Self {
            label: region.name.to_string(),
            value: region.code.to_string(),
        }
    }
}

fn options(regions: &[Region]) -> Vec<SelectOption> {
    regions.iter().map(SelectOption::from).collect()
}

pub fn state_options() -> Vec<SelectOption> {
    options(&US_STATES)
}

pub fn province_options() -> Vec<SelectOption> {
    options(&CA_PROVINCES)
}

pub fn country_options() -> Vec<SelectOption> {
    options(&COUNTRIES)
}

/// Returns `true` if an exemption in state `code` needs a resale number.
/// Unknown codes never do.
pub fn requires_resale_number(code: &str) -> bool {
    US_STATES
        .iter()
        .any(|s| s.code == code && s.resale_number_required)
}

/// Codes of every state that needs a resale number, in table order.
pub fn resale_required_states() -> impl Iterator<Item = &'static str> {
    US_STATES
        .iter()
        .filter(|s| s.resale_number_required)
        .map(|s| s.code)
}

pub fn state_name(code: &str) -> Option<&'static str> {
    US_STATES.iter().find(|s| s.code == code).map(|s| s.name)
}
