pub mod family;
pub mod flow;
pub mod submit;
pub mod terms;
pub mod validate;

use chrono::NaiveDate;

use crate::api::members::MemberMatch;
use crate::models::{BillingCycle, Gender, LegalAcceptance, PaymentMethod, Tariff};
use crate::services::banking::ResolvedBank;

pub use family::FamilyGroupBuilder;
pub use flow::{FlowVariant, WizardStep};
pub use validate::StepError;

#[derive(Debug, Clone, Default)]
pub struct PersonalForm {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
    pub medical_notes: String,
    pub emergency_contact: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,
}

/// Login credentials collected in the public flow.
#[derive(Debug, Clone, Default)]
pub struct AccountForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct TariffSelection {
    pub tariff: Option<Tariff>,
    pub start_date: Option<NaiveDate>,
    pub billing_cycle: Option<BillingCycle>,
    pub payment_method: Option<PaymentMethod>,
    pub admission_fee_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct BankForm {
    /// Raw IBAN input; resolution happens through the bank service.
    pub iban_input: String,
    /// Set once the backend validated the IBAN; BIC and bank name are
    /// read-only from then on.
    pub resolved: Option<ResolvedBank>,
    pub account_holder: String,
}

#[derive(Debug, Clone)]
pub struct LegalForm {
    pub terms: LegalAcceptance,
    pub privacy: LegalAcceptance,
    pub sepa_authorization: LegalAcceptance,
    /// Requested start of service before the 14-day withdrawal period ends.
    pub immediate_start: bool,
    /// Explicit acknowledgment that immediate start curtails the
    /// withdrawal right.
    pub withdrawal_acknowledged: bool,
}

impl Default for LegalForm {
    fn default() -> Self {
        Self {
            terms: LegalAcceptance::declined(),
            privacy: LegalAcceptance::declined(),
            sepa_authorization: LegalAcceptance::declined(),
            immediate_start: false,
            withdrawal_acknowledged: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateDecision {
    /// Register regardless of the match.
    ContinueAnyway,
    /// Abort and open the existing record instead.
    EditExisting,
}

/// Outcome of the duplicate check as far as submission is concerned.
///
/// A confirmed match blocks submission until the user decides; a failed
/// check never blocks (fails open).
#[derive(Debug, Clone, Default)]
pub enum DuplicateGate {
    #[default]
    Unchecked,
    Cleared,
    /// Check could not run; shown inline, does not block.
    Unavailable(String),
    Matched {
        existing: MemberMatch,
        decision: Option<DuplicateDecision>,
    },
}

impl DuplicateGate {
    pub fn blocks_submission(&self) -> bool {
        matches!(self, DuplicateGate::Matched { decision: None, .. })
    }
}

/// All state of one running registration wizard.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub variant: FlowVariant,
    step: WizardStep,
    /// Date used for age computation, normally today.
    pub reference_date: NaiveDate,
    pub personal: PersonalForm,
    pub contact: ContactForm,
    pub account: AccountForm,
    pub family: FamilyGroupBuilder,
    pub tariff: TariffSelection,
    pub bank: BankForm,
    pub legal: LegalForm,
    pub duplicate: DuplicateGate,
}

impl WizardState {
    pub fn new(variant: FlowVariant, reference_date: NaiveDate) -> Self {
        Self {
            variant,
            step: variant.first_step(),
            reference_date,
            personal: PersonalForm::default(),
            contact: ContactForm::default(),
            account: AccountForm::default(),
            family: FamilyGroupBuilder::new(),
            tariff: TariffSelection::default(),
            bank: BankForm::default(),
            legal: LegalForm::default(),
            duplicate: DuplicateGate::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn display_step(&self) -> usize {
        self.step.display_number(self.variant).unwrap_or(1)
    }

    pub fn total_steps(&self) -> usize {
        self.variant.total_steps()
    }

    /// Validates the current step and moves forward. Advancement past the
    /// last step is a no-op.
    pub fn advance(&mut self) -> Result<(), StepError> {
        validate::validate(self, self.step)?;
        let next = self.step.next(self.variant);
        if next != self.step {
            self.enter_step(next);
        }
        Ok(())
    }

    /// Moves back without validation; a step back never loses entered data.
    pub fn back(&mut self) {
        let prev = self.step.prev(self.variant);
        if prev != self.step {
            self.enter_step(prev);
        }
    }

    fn enter_step(&mut self, step: WizardStep) {
        self.step = step;
        // Transient sub-form state does not survive a step change.
        self.family.reset_transient();
    }

    pub fn primary_age(&self) -> Option<u32> {
        self.personal
            .birthdate
            .map(|b| crate::models::member::age_on(b, self.reference_date))
    }

    pub fn primary_is_minor(&self) -> bool {
        self.primary_age()
            .map(|age| age < crate::models::member::ADULT_AGE)
            .unwrap_or(false)
    }

    /// Email the primary member can be reached under, used for duplicate
    /// email checks against family members.
    pub fn primary_email(&self) -> Option<&str> {
        let contact = self.contact.email.trim();
        if !contact.is_empty() {
            return Some(contact);
        }
        let account = self.account.email.trim();
        if !account.is_empty() {
            return Some(account);
        }
        None
    }

    /// Records the outcome of a duplicate check. An already decided match is
    /// not reopened by a later identical result.
    pub fn record_duplicate_match(&mut self, existing: MemberMatch) {
        if let DuplicateGate::Matched {
            decision: Some(_), ..
        } = self.duplicate
        {
            return;
        }
        self.duplicate = DuplicateGate::Matched {
            existing,
            decision: None,
        };
    }

    pub fn record_duplicate_cleared(&mut self) {
        if !matches!(self.duplicate, DuplicateGate::Matched { .. }) {
            self.duplicate = DuplicateGate::Cleared;
        }
    }

    pub fn record_duplicate_unavailable(&mut self, message: String) {
        if !matches!(self.duplicate, DuplicateGate::Matched { .. }) {
            self.duplicate = DuplicateGate::Unavailable(message);
        }
    }

    /// Resolves a blocking duplicate match with an explicit user choice.
    pub fn decide_duplicate(&mut self, choice: DuplicateDecision) {
        if let DuplicateGate::Matched { decision, .. } = &mut self.duplicate {
            *decision = Some(choice);
        }
    }
}
