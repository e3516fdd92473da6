//! Step-level validation.
//!
//! Each wizard step owns part of the application. [`validate_step`] runs the
//! rules for that part and collects every failure, so the UI can mark all
//! offending fields at once. Steps that are skipped for the current branch
//! answers always pass: their data is kept but not checked.
//!
//! Field paths mirror the model: `company_name`, `owners[0].ssn`,
//! `resale_certificate.effective_date.year`, `resale_numbers`.

use std::fmt;

use super::rules::{
    RuleResult, RuleValue, day_rule, email_rule, fax_rule, min_items, month_rule,
    non_empty_for_each_key, one_of_required, phone_rule, positive_rule, required, ssn_rule,
    year_rule, zip_rule,
};
use crate::config::FormConfig;
use crate::models::{Address, CreditApplication, ResaleCertificate};
use crate::wizard::WizardStep;

/// A failed rule, located by its field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Accumulates rule failures under their paths.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn check(
        &mut self,
        path: impl Into<String>,
        result: RuleResult,
    ) {
        if let Err(message) = result {
            self.errors.push(FieldError {
                path: path.into(),
                message,
            });
        }
    }

    /// Runs `rule` only when the optional field holds something non-blank.
    fn check_if_filled(
        &mut self,
        path: impl Into<String>,
        value: Option<&str>,
        rule: fn(&str) -> RuleResult,
    ) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.check(path, rule(value));
        }
    }

    fn address(
        &mut self,
        prefix: &str,
        address: &Address,
    ) {
        self.check(format!("{prefix}.address"), required(&address.address));
        self.check(format!("{prefix}.city"), required(&address.city));
        self.check(format!("{prefix}.state"), required(&address.state));
        self.check(format!("{prefix}.zip"), zip_rule(&address.zip));
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validates the fields owned by `step`.
///
/// Returns `Ok(())` without checking anything when `step` is skipped for the
/// application's branch answers.
pub fn validate_step(
    step: WizardStep,
    application: &CreditApplication,
    config: &FormConfig,
) -> Result<(), Vec<FieldError>> {
    let mut checks = Checks::default();
    if step.is_reachable(application.branch_flags()) {
        run_step(step, application, config, &mut checks);
    }
    checks.finish()
}

/// Validates every step on the application's active path, in order.
pub fn validate_application(
    application: &CreditApplication,
    config: &FormConfig,
) -> Result<(), Vec<FieldError>> {
    let flags = application.branch_flags();
    let mut checks = Checks::default();
    for step in WizardStep::ALL
        .into_iter()
        .filter(|s| s.is_reachable(flags))
    {
        run_step(step, application, config, &mut checks);
    }
    checks.finish()
}

fn run_step(
    step: WizardStep,
    app: &CreditApplication,
    config: &FormConfig,
    checks: &mut Checks,
) {
    match step {
        WizardStep::Business => business(app, config, checks),
        WizardStep::Credit => credit(app, checks),
        WizardStep::Tax => tax(app, checks),
        WizardStep::Sign => sign(app, checks),
        WizardStep::Review => {}
    }
}

fn business(
    app: &CreditApplication,
    config: &FormConfig,
    checks: &mut Checks,
) {
    checks.check("company_name", required(&app.company_name));
    checks.check("address", required(&app.address));
    checks.check("city", required(&app.city));
    checks.check("state", required(&app.state));
    checks.check("zip", zip_rule(&app.zip));
    checks.check("phone", phone_rule(&app.phone));
    checks.check("fax", fax_rule(app.fax.as_deref().unwrap_or_default()));
    checks.check("email", email_rule(&app.email));

    if config.requires_ein {
        checks.check("ein", required(&app.ein));
    }

    if !config.allows_entity_type(&app.entity_type) {
        let message = if app.entity_type.trim().is_empty() {
            "Required".to_string()
        } else {
            format!("Choose one of: {}", config.entity_types.join(", "))
        };
        checks.check("entity_type", Err(message));
    }

    checks.check("contacts", min_items(1)(app.contacts()));
    for (i, contact) in app.contacts().iter().enumerate() {
        checks.check(format!("contacts[{i}].name"), required(&contact.name));
        checks.check(format!("contacts[{i}].email"), email_rule(&contact.email));
    }

    if app.mailing_different {
        match &app.mailing {
            Some(mailing) => checks.address("mailing", mailing),
            None => checks.check("mailing", required(RuleValue::Absent)),
        }
    }

    checks.check_if_filled("invoice_email", app.invoice_email.as_deref(), email_rule);
    checks.check_if_filled("statement_email", app.statement_email.as_deref(), email_rule);
    checks.check_if_filled(
        "acknowledgement_email",
        app.acknowledgement_email.as_deref(),
        email_rule,
    );
}

fn credit(
    app: &CreditApplication,
    checks: &mut Checks,
) {
    checks.check("credit_amount", positive_rule(app.credit_amount));
    checks.check("credit_disclosure_ack", required(app.credit_disclosure_ack));

    checks.check("owners", min_items(1)(app.owners()));
    for (i, owner) in app.owners().iter().enumerate() {
        checks.check(format!("owners[{i}].name"), required(&owner.name));
        checks.check(format!("owners[{i}].title"), required(&owner.title));
        checks.check(format!("owners[{i}].ssn"), ssn_rule(&owner.ssn));
        checks.check_if_filled(format!("owners[{i}].phone"), owner.phone.as_deref(), phone_rule);
        checks.check_if_filled(format!("owners[{i}].email"), owner.email.as_deref(), email_rule);
    }

    if let Some(bank) = &app.bank {
        checks.check("bank.name", required(&bank.name));
        checks.check("bank.account_no", required(&bank.account_no));
        checks.check_if_filled("bank.phone", bank.phone.as_deref(), phone_rule);
        checks.check("bank.fax", fax_rule(bank.fax.as_deref().unwrap_or_default()));
        checks.check_if_filled("bank.email", bank.email.as_deref(), email_rule);
    }

    let reachable = one_of_required("phone", "email");
    for (i, reference) in app.trade_refs.iter().enumerate() {
        checks.check(format!("trade_refs[{i}].name"), required(&reference.name));
        checks.check(
            format!("trade_refs[{i}]"),
            reachable(reference.phone.as_deref(), reference.email.as_deref()),
        );
        checks.check_if_filled(
            format!("trade_refs[{i}].phone"),
            reference.phone.as_deref(),
            phone_rule,
        );
        checks.check(
            format!("trade_refs[{i}].fax"),
            fax_rule(reference.fax.as_deref().unwrap_or_default()),
        );
        checks.check_if_filled(
            format!("trade_refs[{i}].email"),
            reference.email.as_deref(),
            email_rule,
        );
    }
}

fn tax(
    app: &CreditApplication,
    checks: &mut Checks,
) {
    checks.check("exempt_states", required(app.exempt_states()));
    checks.check(
        "resale_numbers",
        non_empty_for_each_key(app.resale_numbers(), app.required_resale_states()),
    );

    if let Some(certificate) = &app.resale_certificate {
        resale_certificate(certificate, checks);
    }

    if app.requires_ny_st120() {
        let form = &app.ny_st120;
        checks.check("ny_st120.purchaser_name", required(&form.purchaser_name));
        checks.check("ny_st120.purchaser_address", required(&form.purchaser_address));
        checks.check("ny_st120.ny_registration", required(&form.ny_registration));
        checks.check("ny_st120.vendor_name", required(&form.vendor_name));
    }
}

fn resale_certificate(
    certificate: &ResaleCertificate,
    checks: &mut Checks,
) {
    match certificate.effective_date {
        Some(date) => {
            checks.check("resale_certificate.effective_date.day", day_rule(date.day));
            checks.check("resale_certificate.effective_date.month", month_rule(date.month));
            checks.check("resale_certificate.effective_date.year", year_rule(date.year));
        }
        None => checks.check(
            "resale_certificate.effective_date",
            required(RuleValue::Absent),
        ),
    }
    checks.check(
        "resale_certificate.purchaser_name",
        required(certificate.purchaser_name.as_deref()),
    );
}

fn sign(
    app: &CreditApplication,
    checks: &mut Checks,
) {
    checks.check("signers", min_items(1)(app.signers()));
    for (i, signer) in app.signers().iter().enumerate() {
        checks.check(format!("signers[{i}].name"), required(&signer.name));
        checks.check(format!("signers[{i}].title"), required(&signer.title));
        checks.check(format!("signers[{i}].agree"), required(signer.agree));
        checks.check(
            format!("signers[{i}].date"),
            required(RuleValue::Instant(signer.date.as_deref().unwrap_or_default())),
        );
        checks.check(
            format!("signers[{i}].signature_data_url"),
            required(signer.has_signature()),
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Local};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{EffectiveDate, default_application};

    fn paths(result: Result<(), Vec<FieldError>>) -> Vec<String> {
        result.err().unwrap_or_default().into_iter().map(|e| e.path).collect()
    }

    fn message_at(
        result: &Result<(), Vec<FieldError>>,
        path: &str,
    ) -> Option<String> {
        result
            .as_ref()
            .err()?
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.clone())
    }

    /// An application that passes every step with both branches on.
    fn complete() -> CreditApplication {
        let config = FormConfig::default();
        let mut app = default_application(&config);

        app.company_name = "Acme Feed & Grain".to_string();
        app.address = "1 Mill Rd".to_string();
        app.city = "Albany".to_string();
        app.state = "NY".to_string();
        app.zip = "12207".to_string();
        app.phone = "(518) 555-0100".to_string();
        app.email = "office@acme.example".to_string();
        app.ein = "12-3456789".to_string();
        let contact = &mut app.contacts_mut()[0];
        contact.name = "Pat Lee".to_string();
        contact.email = "pat@acme.example".to_string();

        app.credit_amount = Some(dec!(25000));
        app.credit_disclosure_ack = true;
        let owner = &mut app.owners_mut()[0];
        owner.name = "Pat Lee".to_string();
        owner.title = "President".to_string();
        owner.ssn = "123-45-6789".to_string();
        if let Some(bank) = app.bank.as_mut() {
            bank.name = "First Bank".to_string();
            bank.account_no = "000123".to_string();
        }
        for (i, reference) in app.trade_refs.iter_mut().enumerate() {
            reference.name = format!("Supplier {i}");
            reference.phone = Some("800-555-0101".to_string());
        }

        app.set_exempt_states(["NY", "TX"]);
        app.set_resale_number("NY", "NY-998877").unwrap();
        if let Some(cert) = app.resale_certificate.as_mut() {
            cert.purchaser_name = Some("Acme Feed & Grain".to_string());
        }
        app.ny_st120.purchaser_name = "Acme Feed & Grain".to_string();
        app.ny_st120.purchaser_address = "1 Mill Rd".to_string();
        app.ny_st120.ny_registration = "123456".to_string();
        app.ny_st120.vendor_name = "Admore".to_string();

        let signer = &mut app.signers_mut()[0];
        signer.name = "Pat Lee".to_string();
        signer.title = "President".to_string();
        signer.agree = true;
        signer.date = Some("2025-03-14".to_string());
        signer.signature_data_url = Some("data:image/png;base64,iVBOR".to_string());

        app
    }

    // =========================================================================
    // whole-application tests
    // =========================================================================

    #[test]
    fn complete_application_passes() {
        let result = validate_application(&complete(), &FormConfig::default());

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn blank_application_fails_every_active_step() {
        let config = FormConfig::default();
        let app = default_application(&config);

        for step in [WizardStep::Business, WizardStep::Credit, WizardStep::Tax, WizardStep::Sign] {
            assert!(validate_step(step, &app, &config).is_err(), "{step} should fail");
        }
        assert_eq!(validate_step(WizardStep::Review, &app, &config), Ok(()));
    }

    #[test]
    fn skipped_steps_are_not_validated() {
        let config = FormConfig::default();
        let mut app = default_application(&config);
        app.request_line_of_credit = false;
        app.request_tax_exempt = false;

        assert_eq!(validate_step(WizardStep::Credit, &app, &config), Ok(()));
        assert_eq!(validate_step(WizardStep::Tax, &app, &config), Ok(()));

        let all = paths(validate_application(&app, &config));
        assert!(all.iter().all(|p| !p.starts_with("owners") && !p.starts_with("ny_st120")));
    }

    // =========================================================================
    // business step
    // =========================================================================

    #[test]
    fn business_reports_format_errors() {
        let mut app = complete();
        app.zip = "1220".to_string();
        app.phone = "555-0100".to_string();
        app.fax = Some("123".to_string());

        let result = validate_step(WizardStep::Business, &app, &FormConfig::default());

        assert_eq!(paths(result.clone()), vec!["zip", "phone", "fax"]);
        assert_eq!(
            message_at(&result, "zip").as_deref(),
            Some("ZIP 12345 or 12345-6789")
        );
    }

    #[test]
    fn ein_only_required_when_configured() {
        let mut app = complete();
        app.ein.clear();

        let strict = FormConfig::default();
        let lenient = FormConfig {
            requires_ein: false,
            ..FormConfig::default()
        };

        assert_eq!(paths(validate_step(WizardStep::Business, &app, &strict)), vec!["ein"]);
        assert_eq!(validate_step(WizardStep::Business, &app, &lenient), Ok(()));
    }

    #[test]
    fn entity_type_must_be_configured() {
        let mut app = complete();
        app.entity_type = "Branch".to_string();

        let result = validate_step(WizardStep::Business, &app, &FormConfig::default());
        assert_eq!(
            message_at(&result, "entity_type").as_deref(),
            Some("Choose one of: Proprietorship, Partnership, Corporation, LLC")
        );

        let branch = FormConfig::with_branch();
        assert_eq!(validate_step(WizardStep::Business, &app, &branch), Ok(()));
    }

    #[test]
    fn mailing_address_checked_only_when_different() {
        let mut app = complete();
        assert_eq!(
            validate_step(WizardStep::Business, &app, &FormConfig::default()),
            Ok(())
        );

        app.mailing_different = true;
        let result = validate_step(WizardStep::Business, &app, &FormConfig::default());

        assert_eq!(
            paths(result),
            vec!["mailing.address", "mailing.city", "mailing.state", "mailing.zip"]
        );
    }

    #[test]
    fn optional_emails_checked_when_filled() {
        let mut app = complete();
        app.invoice_email = Some("ap at acme".to_string());
        app.statement_email = Some("  ".to_string());

        let result = validate_step(WizardStep::Business, &app, &FormConfig::default());

        assert_eq!(paths(result), vec!["invoice_email"]);
    }

    // =========================================================================
    // credit step
    // =========================================================================

    #[test]
    fn credit_requires_disclosure_checkbox() {
        let mut app = complete();
        app.credit_disclosure_ack = false;

        let result = validate_step(WizardStep::Credit, &app, &FormConfig::default());

        assert_eq!(
            message_at(&result, "credit_disclosure_ack").as_deref(),
            Some("Required")
        );
    }

    #[test]
    fn credit_rejects_negative_amount_and_bad_ssn() {
        let mut app = complete();
        app.credit_amount = Some(dec!(-1));
        app.owners_mut()[0].ssn = "123456789".to_string();

        let result = validate_step(WizardStep::Credit, &app, &FormConfig::default());

        assert_eq!(paths(result.clone()), vec!["credit_amount", "owners[0].ssn"]);
        assert_eq!(
            message_at(&result, "owners[0].ssn").as_deref(),
            Some("SSN 000-00-0000")
        );
    }

    #[test]
    fn unset_credit_amount_passes() {
        let mut app = complete();
        app.credit_amount = None;

        assert_eq!(
            validate_step(WizardStep::Credit, &app, &FormConfig::default()),
            Ok(())
        );
    }

    #[test]
    fn trade_reference_needs_phone_or_email() {
        let mut app = complete();
        app.trade_refs[1].phone = Some(String::new());
        app.trade_refs[2].phone = None;
        app.trade_refs[2].email = Some("orders@supplier.example".to_string());

        let result = validate_step(WizardStep::Credit, &app, &FormConfig::default());

        assert_eq!(paths(result.clone()), vec!["trade_refs[1]"]);
        assert_eq!(
            message_at(&result, "trade_refs[1]").as_deref(),
            Some("Provide phone or email")
        );
    }

    // =========================================================================
    // tax step
    // =========================================================================

    #[test]
    fn tax_requires_resale_number_for_each_required_state() {
        let mut app = complete();
        let mut states: Vec<String> = app.exempt_states().to_vec();
        states.push("CA".to_string());
        app.set_exempt_states(states);

        let result = validate_step(WizardStep::Tax, &app, &FormConfig::default());

        assert_eq!(
            message_at(&result, "resale_numbers").as_deref(),
            Some("Enter value for CA")
        );
    }

    #[test]
    fn tax_requires_at_least_one_state() {
        let mut app = complete();
        app.set_exempt_states(Vec::<String>::new());

        let result = validate_step(WizardStep::Tax, &app, &FormConfig::default());

        assert_eq!(paths(result), vec!["exempt_states"]);
    }

    #[test]
    fn ny_st120_only_checked_with_new_york() {
        let mut app = complete();
        app.ny_st120.vendor_name.clear();

        let result = validate_step(WizardStep::Tax, &app, &FormConfig::default());
        assert_eq!(paths(result), vec!["ny_st120.vendor_name"]);

        app.set_exempt_states(["TX"]);
        assert_eq!(
            validate_step(WizardStep::Tax, &app, &FormConfig::default()),
            Ok(())
        );
    }

    #[test]
    fn effective_date_components_are_range_checked() {
        let year = Local::now().year();
        let mut app = complete();
        if let Some(cert) = app.resale_certificate.as_mut() {
            cert.effective_date = Some(EffectiveDate {
                day: 32,
                month: 0,
                year: year - 19,
            });
        }

        let result = validate_step(WizardStep::Tax, &app, &FormConfig::default());

        assert_eq!(
            message_at(&result, "resale_certificate.effective_date.day").as_deref(),
            Some("Day must be 1–31")
        );
        assert_eq!(
            message_at(&result, "resale_certificate.effective_date.month").as_deref(),
            Some("Month must be 1–12")
        );
        assert_eq!(
            message_at(&result, "resale_certificate.effective_date.year"),
            Some(format!("Year must be between {} and {}", year - 18, year + 1))
        );
    }

    // =========================================================================
    // sign step
    // =========================================================================

    #[test]
    fn signer_must_agree_date_and_sign() {
        let mut app = complete();
        let signer = &mut app.signers_mut()[0];
        signer.agree = false;
        signer.date = Some("someday".to_string());
        signer.signature_data_url = None;

        let result = validate_step(WizardStep::Sign, &app, &FormConfig::default());

        assert_eq!(
            paths(result),
            vec![
                "signers[0].agree",
                "signers[0].date",
                "signers[0].signature_data_url"
            ]
        );
    }

    #[test]
    fn every_signer_is_checked() {
        let mut app = complete();
        app.add_signer().name = "Second".to_string();

        let result = validate_step(WizardStep::Sign, &app, &FormConfig::default());

        let failing: Vec<_> = paths(result);
        assert!(failing.iter().all(|p| p.starts_with("signers[1]")));
        assert!(failing.contains(&"signers[1].title".to_string()));
    }

    #[test]
    fn blank_signature_counts_as_unsigned() {
        let mut app = complete();
        app.signers_mut()[0].signature_data_url = Some("   ".to_string());

        let result = validate_step(WizardStep::Sign, &app, &FormConfig::default());

        assert_eq!(
            message_at(&result, "signers[0].signature_data_url").as_deref(),
            Some("Required")
        );
    }

    #[test]
    fn field_error_display_includes_path() {
        let error = FieldError {
            path: "zip".to_string(),
            message: "ZIP 12345 or 12345-6789".to_string(),
        };

        assert_eq!(error.to_string(), "zip: ZIP 12345 or 12345-6789");
    }
}
