//! A single applicant's form session.
//!
//! [`Session`] owns the application being edited, the wizard position and
//! the deployment config. Every mutation goes through the session, which
//! tells subscribers what changed in the order they subscribed.

use std::fmt;

use tracing::{debug, warn};

use crate::config::FormConfig;
use crate::models::{CreditApplication, ModelError, Owner, Signer, default_application};
use crate::reference::PlantBranding;
use crate::validation::{FieldError, validate_step};
use crate::wizard::{Wizard, WizardError, WizardStep};

/// What a subscriber is told after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Some part of the application was edited.
    FieldChanged,
    /// The wizard moved. Not sent when a move leaves the step unchanged.
    StepChanged { from: WizardStep, to: WizardStep },
}

type Subscriber = Box<dyn FnMut(&SessionEvent)>;

pub struct Session {
    config: FormConfig,
    application: CreditApplication,
    wizard: Wizard,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for Session {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("application", &self.application)
            .field("wizard", &self.wizard)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Session {
    /// Starts a session on a blank application built from `config`.
    pub fn new(config: FormConfig) -> Self {
        let application = default_application(&config);
        Self::resume(config, application)
    }

    /// Continues a saved application from the first step.
    pub fn resume(
        config: FormConfig,
        application: CreditApplication,
    ) -> Self {
        Self {
            config,
            application,
            wizard: Wizard::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn application(&self) -> &CreditApplication {
        &self.application
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn current_step(&self) -> WizardStep {
        self.wizard.current_step()
    }

    pub fn lock_all(&self) -> bool {
        self.wizard.lock_all()
    }

    /// Registers a callback run after every mutation.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SessionEvent) + 'static,
    ) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(
        &mut self,
        event: SessionEvent,
    ) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn field_changed<T>(
        &mut self,
        value: T,
    ) -> T {
        self.notify(SessionEvent::FieldChanged);
        value
    }

    // ── application edits ────────────────────────────────────────────────

    /// Applies an arbitrary edit to the application.
    ///
    /// ```
    /// use credit_core::config::FormConfig;
    /// use credit_core::session::Session;
    ///
    /// let mut session = Session::new(FormConfig::default());
    /// session.set_field(|app| app.company_name = "Acme".to_string());
    ///
    /// assert_eq!(session.application().company_name, "Acme");
    /// ```
    pub fn set_field<R>(
        &mut self,
        edit: impl FnOnce(&mut CreditApplication) -> R,
    ) -> R {
        let result = edit(&mut self.application);
        self.field_changed(result)
    }

    pub fn set_exempt_states<I, S>(
        &mut self,
        codes: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.application.set_exempt_states(codes);
        self.notify(SessionEvent::FieldChanged);
    }

    /// Adds a contact and returns its assigned role.
    pub fn add_contact(&mut self) -> String {
        let role = self.application.add_contact(&self.config).role.clone();
        self.field_changed(role)
    }

    pub fn add_owner(&mut self) -> usize {
        self.application.add_owner(&self.config);
        let count = self.application.owners().len();
        self.field_changed(count)
    }

    pub fn remove_owner(
        &mut self,
        index: usize,
    ) -> Result<Owner, ModelError> {
        let owner = self.application.remove_owner(index)?;
        Ok(self.field_changed(owner))
    }

    pub fn add_signer(&mut self) -> usize {
        self.application.add_signer();
        let count = self.application.signers().len();
        self.field_changed(count)
    }

    pub fn remove_signer(
        &mut self,
        index: usize,
    ) -> Result<Signer, ModelError> {
        let signer = self.application.remove_signer(index)?;
        Ok(self.field_changed(signer))
    }

    // ── navigation ───────────────────────────────────────────────────────

    fn step_moved(
        &mut self,
        from: WizardStep,
    ) -> WizardStep {
        let to = self.wizard.current_step();
        if from != to {
            self.notify(SessionEvent::StepChanged { from, to });
        }
        to
    }

    /// Moves forward without validating.
    pub fn next(&mut self) -> WizardStep {
        let from = self.wizard.current_step();
        self.wizard.next(self.application.branch_flags());
        self.step_moved(from)
    }

    pub fn back(&mut self) -> WizardStep {
        let from = self.wizard.current_step();
        self.wizard.back(self.application.branch_flags());
        self.step_moved(from)
    }

    pub fn set_step(
        &mut self,
        step: WizardStep,
    ) -> Result<(), WizardError> {
        let from = self.wizard.current_step();
        self.wizard.set_step(step, self.application.branch_flags())?;
        self.step_moved(from);
        Ok(())
    }

    /// Validates the current step and moves forward only if it passes.
    ///
    /// # Errors
    ///
    /// Returns every failing field of the current step; the wizard stays put.
    pub fn advance(&mut self) -> Result<WizardStep, Vec<FieldError>> {
        let step = self.wizard.current_step();
        if let Err(errors) = validate_step(step, &self.application, &self.config) {
            warn!(%step, failures = errors.len(), "step has validation errors");
            return Err(errors);
        }
        debug!(%step, "step validated");
        Ok(self.next())
    }

    pub fn set_plant(
        &mut self,
        code: &str,
    ) -> &'static PlantBranding {
        self.wizard.set_plant(code)
    }
}
