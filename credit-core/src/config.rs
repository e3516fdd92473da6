//! Per-deployment variation points for the credit application.
//!
//! Deployments of the form differ in which legal entity types they offer,
//! whether the EIN is mandatory, whether purchase orders are required by
//! default, which contact roles are seeded, and whether addresses carry a
//! country or a county. All of that lives in [`FormConfig`], so the model and
//! the validators never fork per deployment.
//!
//! A config is usually loaded from TOML:
//!
//! ```
//! use credit_core::config::{AddressRegion, FormConfig};
//!
//! let config = FormConfig::from_toml_str(
//!     r#"
//!     entity_types = ["Proprietorship", "Partnership", "Corporation", "LLC", "Branch"]
//!     requires_ein = false
//!     address_region = "county"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.entity_types.len(), 5);
//! assert_eq!(config.address_region, AddressRegion::County);
//! // Unspecified keys keep their defaults.
//! assert_eq!(config.contact_roles, vec!["main", "accounting", "additional"]);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Entity type preselected on a new application when the deployment offers it.
pub const PREFERRED_ENTITY_TYPE: &str = "Corporation";

/// Errors raised while loading or checking a [`FormConfig`].
#[derive(Debug, Error)]
pub enum FormConfigError {
    #[error("at least one entity type must be configured")]
    NoEntityTypes,

    #[error("entity type at position {0} is blank")]
    BlankEntityType(usize),

    #[error("entity type '{0}' is listed more than once")]
    DuplicateEntityType(String),

    #[error("at least one contact role must be configured")]
    NoContactRoles,

    #[error("contact role at position {0} is blank")]
    BlankContactRole(usize),

    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which secondary locality field an [`Address`](crate::models::Address) collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressRegion {
    #[default]
    Country,
    County,
}

/// Deployment configuration consumed by
/// [`default_application`](crate::models::default_application) and the
/// section validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Legal structures offered in the entity type select, in display order.
    pub entity_types: Vec<String>,

    /// Whether the business step requires an EIN.
    pub requires_ein: bool,

    /// Initial value of the application's "PO required" answer.
    pub requires_po: bool,

    /// Roles assigned to contacts as they are added. The first role seeds
    /// the initial contact; once the list runs out, the last role repeats.
    pub contact_roles: Vec<String>,

    pub address_region: AddressRegion,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            entity_types: to_strings(&["Proprietorship", "Partnership", "Corporation", "LLC"]),
            requires_ein: true,
            requires_po: false,
            contact_roles: to_strings(&["main", "accounting", "additional"]),
            address_region: AddressRegion::Country,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl FormConfig {
    /// The variant that also accepts branch offices as applicants.
    pub fn with_branch() -> Self {
        let mut config = Self::default();
        config.entity_types.push("Branch".to_string());
        config
    }

    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, FormConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, FormConfigError> {
        let text = fs::read_to_string(path).map_err(|source| FormConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            entity_types = config.entity_types.len(),
            region = ?config.address_region,
            "loaded form config"
        );
        Ok(config)
    }

    /// Checks the invariants the model relies on.
    ///
    /// # Errors
    ///
    /// Returns [`FormConfigError`] if:
    /// - no entity types are configured, or one is blank or repeated
    /// - no contact roles are configured, or one is blank
    pub fn validate(&self) -> Result<(), FormConfigError> {
        if self.entity_types.is_empty() {
            return Err(FormConfigError::NoEntityTypes);
        }
        let mut seen = HashSet::new();
        for (i, entity_type) in self.entity_types.iter().enumerate() {
            if entity_type.trim().is_empty() {
                return Err(FormConfigError::BlankEntityType(i));
            }
            if !seen.insert(entity_type.as_str()) {
                return Err(FormConfigError::DuplicateEntityType(entity_type.clone()));
            }
        }
        if self.contact_roles.is_empty() {
            return Err(FormConfigError::NoContactRoles);
        }
        if let Some(i) = self.contact_roles.iter().position(|r| r.trim().is_empty()) {
            return Err(FormConfigError::BlankContactRole(i));
        }
        Ok(())
    }

    pub fn allows_entity_type(
        &self,
        entity_type: &str,
    ) -> bool {
        self.entity_types.iter().any(|t| t == entity_type)
    }

    /// [`PREFERRED_ENTITY_TYPE`] when offered, otherwise the first configured type.
    pub fn default_entity_type(&self) -> &str {
        if self.allows_entity_type(PREFERRED_ENTITY_TYPE) {
            PREFERRED_ENTITY_TYPE
        } else {
            self.entity_types.first().map_or("", String::as_str)
        }
    }

    /// Role for the contact at `index` (zero-based).
    pub fn contact_role(
        &self,
        index: usize,
    ) -> &str {
        self.contact_roles
            .get(index)
            .or_else(|| self.contact_roles.last())
            .map_or("", String::as_str)
    }
}
