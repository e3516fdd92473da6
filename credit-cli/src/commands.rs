//! Command implementations behind `credit-wizard`.
//!
//! Each command returns the text to print so it can be tested without a
//! terminal. File access and parse failures come back as `anyhow` errors
//! carrying the path.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use credit_core::config::FormConfig;
use credit_core::masking::mask_ssn;
use credit_core::models::{CreditApplication, default_application};
use credit_core::reference::{
    SelectOption, country_options, plant_branding, province_options, requires_resale_number,
    state_options,
};
use credit_core::validation::{FieldError, validate_application, validate_step};
use credit_core::wizard::{BranchFlags, Wizard, WizardStep};
use tracing::{debug, info};

/// Loads the deployment config, or the default one when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<FormConfig> {
    match path {
        Some(path) => FormConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => {
            debug!("no config file given, using defaults");
            Ok(FormConfig::default())
        }
    }
}

/// Renders a blank application for `config` as TOML.
pub fn init(
    config: &FormConfig,
    flags: BranchFlags,
) -> Result<String> {
    let mut application = default_application(config);
    application.request_line_of_credit = flags.request_line_of_credit;
    application.request_tax_exempt = flags.request_tax_exempt;
    toml::to_string(&application).context("Failed to serialize application")
}

/// Lists the steps visited for `flags`, with the UI flags at each one.
pub fn walk(flags: BranchFlags) -> String {
    let mut wizard = Wizard::new();
    let mut out = String::new();
    loop {
        let (position, total) = wizard.progress(flags);
        let step = wizard.current_step();
        let _ = writeln!(
            out,
            "{position}/{total} {:<8} {:<22} lock_all={} credit={} tax={}",
            step.as_str(),
            step.title(),
            wizard.lock_all(),
            wizard.is_credit_step(),
            wizard.is_tax_step(),
        );
        if wizard.next(flags) == step {
            break;
        }
    }
    out
}

pub fn load_application(path: &Path) -> Result<CreditApplication> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;
    let application = toml::from_str(&text)
        .with_context(|| format!("Failed to parse application: {}", path.display()))?;
    info!(path = %path.display(), "loaded application");
    Ok(application)
}

/// Validation outcome for one step or the whole application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub scope: String,
    pub errors: Vec<FieldError>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.is_ok() {
            return writeln!(f, "{}: ok", self.scope);
        }
        writeln!(f, "{}: {} problem(s)", self.scope, self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

/// Validates `step`, or every active step when `step` is `None`.
pub fn check(
    application: &CreditApplication,
    config: &FormConfig,
    step: Option<WizardStep>,
) -> CheckReport {
    let (scope, result) = match step {
        Some(step) => (step.to_string(), validate_step(step, application, config)),
        None => (
            "application".to_string(),
            validate_application(application, config),
        ),
    };
    CheckReport {
        scope,
        errors: result.err().unwrap_or_default(),
    }
}

pub fn mask(ssn: &str) -> String {
    mask_ssn(ssn)
}

/// Option lists the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionList {
    States,
    Provinces,
    Countries,
}

/// One `CODE  Name` line per option. States that need a resale number are
/// starred.
pub fn options(list: OptionList) -> String {
    let (entries, mark_resale): (Vec<SelectOption>, bool) = match list {
        OptionList::States => (state_options(), true),
        OptionList::Provinces => (province_options(), false),
        OptionList::Countries => (country_options(), false),
    };
    let mut out = String::new();
    for option in entries {
        let star = if mark_resale && requires_resale_number(&option.value) {
            " *"
        } else {
            ""
        };
        let _ = writeln!(out, "{:<3} {}{star}", option.value, option.label);
    }
    out
}

/// Describes the branding for a plant code, noting when it fell back.
pub fn plant(code: &str) -> String {
    let branding = plant_branding(code);
    let logo = if branding.has_logo() {
        branding.logo
    } else {
        "none"
    };
    let fallback = if branding.code.as_str() == code {
        ""
    } else {
        " (fallback)"
    };
    format!(
        "plant={}{fallback} background={} text={} logo={logo}\n",
        branding.code.as_str(),
        branding.color[0],
        branding.color[1],
    )
}
