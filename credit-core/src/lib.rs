pub mod config;
pub mod masking;
pub mod models;
pub mod reference;
pub mod session;
pub mod validation;
pub mod wizard;

pub use config::{FormConfig, FormConfigError};
pub use models::*;
pub use session::{Session, SessionEvent};
pub use validation::FieldError;
pub use wizard::{BranchFlags, Wizard, WizardError, WizardStep};
