//! Validation for the credit application.
//!
//! [`rules`] holds the field-level predicates; [`sections`] applies them to
//! the parts of a [`CreditApplication`](crate::models::CreditApplication)
//! each wizard step owns.

pub mod rules;
pub mod sections;

pub use rules::{
    RuleResult, RuleValue, day_rule, email_rule, fax_rule, min_items, month_rule,
    non_empty_for_each_key, one_of_required, parses_as_instant, phone_rule, positive_rule,
    required, ssn_rule, year_rule, year_rule_in, zip_rule,
};
pub use sections::{FieldError, validate_application, validate_step};
