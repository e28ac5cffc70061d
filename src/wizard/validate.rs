use thiserror::Error;

use crate::models::PaymentMethod;
use crate::wizard::{FlowVariant, WizardState, WizardStep};

/// First failing field of a step check; advancement is blocked until the
/// whole checklist passes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct StepError {
    pub field: &'static str,
    pub message: String,
}

fn fail(field: &'static str, message: &str) -> Result<(), StepError> {
    Err(StepError {
        field,
        message: message.to_string(),
    })
}

fn require(value: &str, field: &'static str, message: &str) -> Result<(), StepError> {
    if value.trim().is_empty() {
        fail(field, message)
    } else {
        Ok(())
    }
}

/// Runs the checklist for one step. Stateless; re-run on every advance.
pub fn validate(state: &WizardState, step: WizardStep) -> Result<(), StepError> {
    match step {
        WizardStep::Personal => personal(state),
        WizardStep::Contact => contact(state),
        WizardStep::Account => account(state),
        WizardStep::Family => family(state),
        WizardStep::Tariff => tariff(state),
        WizardStep::Bank => bank(state),
        WizardStep::Legal => legal(state),
        WizardStep::Summary => summary(state),
    }
}

/// Validates every step of the variant's sequence, for submission.
pub fn validate_all(state: &WizardState) -> Result<(), StepError> {
    for step in state.variant.sequence() {
        validate(state, *step)?;
    }
    Ok(())
}

fn personal(state: &WizardState) -> Result<(), StepError> {
    let form = &state.personal;
    require(&form.first_name, "first_name", "First name is required")?;
    require(&form.last_name, "last_name", "Last name is required")?;
    if form.birthdate.is_none() {
        return fail("birthdate", "Date of birth is required");
    }
    if form.gender.is_none() {
        return fail("gender", "Gender is required");
    }

    // Members under 18 cannot contract on their own.
    if state.primary_is_minor() {
        require(
            &form.guardian_name,
            "guardian_name",
            "A guardian name is required for members under 18",
        )?;
        require(
            &form.guardian_phone,
            "guardian_phone",
            "A guardian phone number is required for members under 18",
        )?;
    }
    Ok(())
}

fn contact(state: &WizardState) -> Result<(), StepError> {
    let form = &state.contact;
    require(&form.street, "street", "Street is required")?;
    require(&form.postal_code, "postal_code", "Postal code is required")?;
    require(&form.city, "city", "City is required")?;

    // The public flow collects the email on the account step instead.
    if state.variant == FlowVariant::AdminPanel {
        require(&form.email, "email", "Email address is required")?;
    }
    Ok(())
}

fn account(state: &WizardState) -> Result<(), StepError> {
    let form = &state.account;
    if form.email.trim().is_empty() && form.username.trim().is_empty() {
        return fail("email", "An email address or a username is required");
    }
    if form.password.trim().len() < 8 {
        return fail("password", "Password needs at least 8 characters");
    }
    Ok(())
}

fn family(state: &WizardState) -> Result<(), StepError> {
    if state.family.add_in_progress {
        return fail(
            "family",
            "Finish or discard the family member currently being added",
        );
    }
    Ok(())
}

fn tariff(state: &WizardState) -> Result<(), StepError> {
    let selection = &state.tariff;
    let Some(tariff) = &selection.tariff else {
        return fail("tariff", "A tariff must be selected");
    };
    if tariff.archived {
        return fail("tariff", "This tariff is no longer offered");
    }
    if let Some(age) = state.primary_age() {
        if !tariff.eligible_for_age(age) {
            return fail("tariff", "The selected tariff is not available for this age");
        }
    }
    if selection.start_date.is_none() {
        return fail("start_date", "A contract start date is required");
    }
    if selection.billing_cycle.is_none() {
        return fail("billing_cycle", "A billing cycle must be selected");
    }
    if selection.payment_method.is_none() {
        return fail("payment_method", "A payment method must be selected");
    }
    Ok(())
}

fn bank(state: &WizardState) -> Result<(), StepError> {
    if state.tariff.payment_method != Some(PaymentMethod::DirectDebit) {
        return Ok(());
    }
    if state.bank.resolved.is_none() {
        return fail("iban", "A validated IBAN is required for direct debit");
    }
    require(
        &state.bank.account_holder,
        "account_holder",
        "The account holder is required",
    )
}

fn legal(state: &WizardState) -> Result<(), StepError> {
    let form = &state.legal;
    if !form.terms.accepted {
        return fail("terms", "The terms and conditions must be accepted");
    }
    if !form.privacy.accepted {
        return fail("privacy", "The privacy policy must be accepted");
    }
    if state.tariff.payment_method == Some(PaymentMethod::DirectDebit)
        && !form.sepa_authorization.accepted
    {
        return fail(
            "sepa_authorization",
            "The SEPA direct-debit authorization must be accepted",
        );
    }
    if form.immediate_start && !form.withdrawal_acknowledged {
        return fail(
            "withdrawal_acknowledged",
            "Immediate start requires acknowledging the curtailed withdrawal right",
        );
    }
    Ok(())
}

fn summary(state: &WizardState) -> Result<(), StepError> {
    // The admin flow has no dedicated legal step; acceptances are collected
    // on the summary screen and checked here for both flows.
    legal(state)?;

    if state.primary_is_minor()
        && (state.personal.guardian_name.trim().is_empty()
            || state.personal.guardian_phone.trim().is_empty())
    {
        return fail(
            "guardian_name",
            "Guardian data is required for members under 18",
        );
    }

    if state.duplicate.blocks_submission() {
        return fail(
            "duplicate",
            "A possible duplicate was found; choose to continue or edit the existing member",
        );
    }
    Ok(())
}
