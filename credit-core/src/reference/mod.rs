//! Static lookup data consumed for display: region option lists and plant
//! branding. None of it feeds validation except the resale-number flag on
//! US states.

mod plant;
mod regions;

pub use plant::{DEFAULT_BRANDING, PlantBranding, PlantCode, is_plant_code, plant_branding};
pub use regions::{
    CA_PROVINCES, COUNTRIES, NEW_YORK, Region, SelectOption, US_STATES, country_options,
    province_options, requires_resale_number, resale_required_states, state_name, state_options,
};
