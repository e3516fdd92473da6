//! Step machine for the credit application wizard.
//!
//! The steps run in a fixed order, and two of them are optional:
//!
//! ```text
//! Business ─▶ Credit ─▶ Tax ─▶ Sign ─▶ Review
//!             (line of  (tax
//!              credit)   exempt)
//! ```
//!
//! `Credit` is only visited when the applicant requests a line of credit,
//! `Tax` only when they request tax exemption. [`Wizard::next`] and
//! [`Wizard::back`] skip inactive steps; moving past either end is a no-op.
//!
//! Once the applicant reaches `Sign`, [`Wizard::lock_all`] turns on so the UI
//! can make every non-signature field read-only. The wizard only reports the
//! flag; it does not stop anyone from editing the application.
//!
//! ```
//! use credit_core::wizard::{BranchFlags, Wizard, WizardStep};
//!
//! let flags = BranchFlags {
//!     request_line_of_credit: false,
//!     request_tax_exempt: false,
//! };
//! let mut wizard = Wizard::new();
//!
//! assert!(!wizard.lock_all());
//! assert_eq!(wizard.next(flags), WizardStep::Sign);
//! assert!(wizard.lock_all());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::reference::{PlantBranding, PlantCode, plant_branding};

/// One stage of the wizard, in visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Business,
    Credit,
    Tax,
    Sign,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::Business,
        Self::Credit,
        Self::Tax,
        Self::Sign,
        Self::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Credit => "credit",
            Self::Tax => "tax",
            Self::Sign => "sign",
            Self::Review => "review",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business" => Some(Self::Business),
            "credit" => Some(Self::Credit),
            "tax" => Some(Self::Tax),
            "sign" => Some(Self::Sign),
            "review" => Some(Self::Review),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Business => "Business Information",
            Self::Credit => "Credit Application",
            Self::Tax => "Tax Exemption",
            Self::Sign => "Sign",
            Self::Review => "Review & Submit",
        }
    }

    fn position(self) -> usize {
        self as usize
    }

    /// Whether this step is part of the path for the given answers.
    pub fn is_reachable(
        self,
        flags: BranchFlags,
    ) -> bool {
        match self {
            Self::Credit => flags.request_line_of_credit,
            Self::Tax => flags.request_tax_exempt,
            Self::Business | Self::Sign | Self::Review => true,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two answers that decide which optional steps are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchFlags {
    pub request_line_of_credit: bool,
    pub request_tax_exempt: bool,
}

impl BranchFlags {
    pub const ALL_BRANCHES: Self = Self {
        request_line_of_credit: true,
        request_tax_exempt: true,
    };
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step '{0}' is skipped for the current answers")]
    Unreachable(WizardStep),
}

/// Current position in the wizard plus the plant the session is branded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    current: WizardStep,
    plant: PlantCode,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// A wizard on the first step with default branding.
    pub fn new() -> Self {
        Self {
            current: WizardStep::Business,
            plant: PlantCode::Default,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn is_credit_step(&self) -> bool {
        self.current == WizardStep::Credit
    }

    pub fn is_tax_step(&self) -> bool {
        self.current == WizardStep::Tax
    }

    /// `true` on `Sign` and `Review`: everything except the signature block
    /// should be read-only.
    pub fn lock_all(&self) -> bool {
        matches!(self.current, WizardStep::Sign | WizardStep::Review)
    }

    /// Moves to the next reachable step and returns it. Stays put on the
    /// last step.
    pub fn next(
        &mut self,
        flags: BranchFlags,
    ) -> WizardStep {
        let target = WizardStep::ALL[self.current.position() + 1..]
            .iter()
            .copied()
            .find(|step| step.is_reachable(flags));
        self.move_to(target)
    }

    /// Moves to the previous reachable step and returns it. Stays put on
    /// the first step.
    pub fn back(
        &mut self,
        flags: BranchFlags,
    ) -> WizardStep {
        let target = WizardStep::ALL[..self.current.position()]
            .iter()
            .rev()
            .copied()
            .find(|step| step.is_reachable(flags));
        self.move_to(target)
    }

    fn move_to(
        &mut self,
        target: Option<WizardStep>,
    ) -> WizardStep {
        match target {
            Some(step) => {
                debug!(from = %self.current, to = %step, "wizard step changed");
                self.current = step;
            }
            None => trace!(step = %self.current, "wizard already at end of path"),
        }
        self.current
    }

    /// Jumps straight to `step`, as a step header click does.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Unreachable`] if `step` is skipped for `flags`.
    pub fn set_step(
        &mut self,
        step: WizardStep,
        flags: BranchFlags,
    ) -> Result<(), WizardError> {
        if !step.is_reachable(flags) {
            warn!(%step, ?flags, "refusing jump to skipped step");
            return Err(WizardError::Unreachable(step));
        }
        if step != self.current {
            self.move_to(Some(step));
        }
        Ok(())
    }

    /// The steps visited for `flags`, in order.
    pub fn reachable_steps(flags: BranchFlags) -> Vec<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .filter(|step| step.is_reachable(flags))
            .collect()
    }

    /// One-based position of the current step along the active path, and
    /// the path length.
    ///
    /// If the current step has just been switched off, the position counts
    /// the reachable steps before it.
    pub fn progress(
        &self,
        flags: BranchFlags,
    ) -> (usize, usize) {
        let path = Self::reachable_steps(flags);
        let done = path.iter().filter(|s| **s < self.current).count();
        (done + 1, path.len())
    }

    pub fn plant(&self) -> PlantCode {
        self.plant
    }

    pub fn branding(&self) -> &'static PlantBranding {
        self.plant.branding()
    }

    /// Brands the session for an external plant code. Unknown codes fall
    /// back to the default branding.
    pub fn set_plant(
        &mut self,
        code: &str,
    ) -> &'static PlantBranding {
        let branding = plant_branding(code);
        if branding.code == PlantCode::Default && code != PlantCode::Default.as_str() {
            debug!(code, "unknown plant code, using default branding");
        }
        self.plant = branding.code;
        branding
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NO_BRANCHES: BranchFlags = BranchFlags {
        request_line_of_credit: false,
        request_tax_exempt: false,
    };

    const CREDIT_ONLY: BranchFlags = BranchFlags {
        request_line_of_credit: true,
        request_tax_exempt: false,
    };

    const TAX_ONLY: BranchFlags = BranchFlags {
        request_line_of_credit: false,
        request_tax_exempt: true,
    };

    fn walk(flags: BranchFlags) -> Vec<WizardStep> {
        let mut wizard = Wizard::new();
        let mut visited = vec![wizard.current_step()];
        while wizard.current_step() != WizardStep::Review {
            visited.push(wizard.next(flags));
        }
        visited
    }

    // =========================================================================
    // WizardStep tests
    // =========================================================================

    #[test]
    fn parse_round_trips_every_step() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::parse(step.as_str()), Some(step));
        }
        assert_eq!(WizardStep::parse("Business"), None);
    }

    #[test]
    fn display_uses_identifier() {
        assert_eq!(WizardStep::Tax.to_string(), "tax");
    }

    // =========================================================================
    // next / back tests
    // =========================================================================

    #[test]
    fn starts_on_business() {
        let wizard = Wizard::new();

        assert_eq!(wizard.current_step(), WizardStep::Business);
        assert!(!wizard.lock_all());
    }

    #[test]
    fn next_skips_both_branches_when_off() {
        let mut wizard = Wizard::new();

        assert_eq!(wizard.next(NO_BRANCHES), WizardStep::Sign);
        assert!(wizard.lock_all());
    }

    #[test]
    fn walk_visits_every_step_with_all_branches() {
        assert_eq!(walk(BranchFlags::ALL_BRANCHES), WizardStep::ALL.to_vec());
    }

    #[test]
    fn walk_skips_inactive_branch() {
        use WizardStep::*;

        assert_eq!(walk(CREDIT_ONLY), vec![Business, Credit, Sign, Review]);
        assert_eq!(walk(TAX_ONLY), vec![Business, Tax, Sign, Review]);
    }

    #[test]
    fn back_returns_to_previous_reachable_step() {
        let mut wizard = Wizard::new();
        wizard.next(TAX_ONLY);
        wizard.next(TAX_ONLY);
        assert_eq!(wizard.current_step(), WizardStep::Sign);

        assert_eq!(wizard.back(TAX_ONLY), WizardStep::Tax);
        assert_eq!(wizard.back(TAX_ONLY), WizardStep::Business);
    }

    #[test]
    fn back_from_first_step_is_noop() {
        let mut wizard = Wizard::new();

        assert_eq!(wizard.back(BranchFlags::ALL_BRANCHES), WizardStep::Business);
        assert_eq!(wizard.current_step(), WizardStep::Business);
    }

    #[test]
    fn set_step_to_current_step_stays_put() {
        let mut wizard = Wizard::new();
        wizard.set_step(WizardStep::Tax, BranchFlags::ALL_BRANCHES).unwrap();

        assert_eq!(wizard.set_step(WizardStep::Tax, BranchFlags::ALL_BRANCHES), Ok(()));
        assert_eq!(wizard.current_step(), WizardStep::Tax);

        // Still refused once the branch is off, even while sitting on it.
        assert_eq!(
            wizard.set_step(WizardStep::Tax, NO_BRANCHES),
            Err(WizardError::Unreachable(WizardStep::Tax))
        );
    }

    #[test]
    fn next_from_review_is_noop() {
        let mut wizard = Wizard::new();
        wizard.set_step(WizardStep::Review, NO_BRANCHES).unwrap();

        assert_eq!(wizard.next(NO_BRANCHES), WizardStep::Review);
        assert_eq!(wizard.current_step(), WizardStep::Review);
    }

    #[test]
    fn leaving_a_branch_switched_off_mid_step() {
        let mut wizard = Wizard::new();
        wizard.next(BranchFlags::ALL_BRANCHES);
        assert!(wizard.is_credit_step());

        // Applicant unticks "line of credit" while on the credit step.
        assert_eq!(wizard.next(TAX_ONLY), WizardStep::Tax);
        assert_eq!(wizard.back(TAX_ONLY), WizardStep::Business);
    }

    // =========================================================================
    // derived flag tests
    // =========================================================================

    #[test]
    fn derived_flags_follow_current_step() {
        let mut wizard = Wizard::new();
        let expected = [
            (WizardStep::Business, false, false, false),
            (WizardStep::Credit, true, false, false),
            (WizardStep::Tax, false, true, false),
            (WizardStep::Sign, false, false, true),
            (WizardStep::Review, false, false, true),
        ];

        for (step, credit, tax, locked) in expected {
            wizard.set_step(step, BranchFlags::ALL_BRANCHES).unwrap();
            assert_eq!(
                (wizard.is_credit_step(), wizard.is_tax_step(), wizard.lock_all()),
                (credit, tax, locked),
                "flags on {step}"
            );
        }
    }

    // =========================================================================
    // set_step / progress tests
    // =========================================================================

    #[test]
    fn set_step_refuses_skipped_step() {
        let mut wizard = Wizard::new();

        assert_eq!(
            wizard.set_step(WizardStep::Credit, TAX_ONLY),
            Err(WizardError::Unreachable(WizardStep::Credit))
        );
        assert_eq!(wizard.current_step(), WizardStep::Business);
    }

    #[test]
    fn reachable_steps_lists_path() {
        assert_eq!(
            Wizard::reachable_steps(NO_BRANCHES),
            vec![WizardStep::Business, WizardStep::Sign, WizardStep::Review]
        );
    }

    #[test]
    fn progress_counts_along_active_path() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.progress(CREDIT_ONLY), (1, 4));

        wizard.next(CREDIT_ONLY);
        wizard.next(CREDIT_ONLY);
        assert_eq!(wizard.current_step(), WizardStep::Sign);
        assert_eq!(wizard.progress(CREDIT_ONLY), (3, 4));
        assert_eq!(wizard.progress(BranchFlags::ALL_BRANCHES), (4, 5));
    }

    // =========================================================================
    // plant tests
    // =========================================================================

    #[test]
    fn set_plant_records_known_plant() {
        let mut wizard = Wizard::new();

        let branding = wizard.set_plant("amc");

        assert_eq!(branding.logo, "AMC.jpg");
        assert_eq!(wizard.plant(), PlantCode::Amc);
    }

    #[test]
    fn set_plant_falls_back_for_unknown_code() {
        let mut wizard = Wizard::new();
        wizard.set_plant("admore");

        wizard.set_plant("nowhere");

        assert_eq!(wizard.plant(), PlantCode::Default);
        assert_eq!(wizard.branding().color, ["bg-blue", "text-white"]);
    }
}
