use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Deserialize;

use crate::api::members::DuplicateQuery;
use crate::api::ApiClient;
use crate::cli::format;
use crate::events::EventBus;
use crate::models::{BillingCycle, Gender, LegalAcceptance, PaymentMethod, Tariff};
use crate::services::banking::BankResolver;
use crate::services::duplicates::{DuplicateDetector, DuplicateStatus};
use crate::wizard::family::FamilyDraft;
use crate::wizard::submit;
use crate::wizard::{DuplicateDecision, FlowVariant, WizardState, WizardStep};

/// Drives the registration wizard over a JSON application file: validates
/// every step, runs the duplicate check, resolves bank data, then submits.
#[derive(Args, Debug)]
pub struct Register {
    /// Application file, see `Application` for the schema
    #[clap(long)]
    pub file: PathBuf,
    /// Use the public self-registration flow instead of the admin one
    #[clap(long)]
    pub public: bool,
    /// Register even if the duplicate check finds an existing member
    #[clap(long)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
struct Application {
    personal: PersonalSection,
    contact: ContactSection,
    #[serde(default)]
    account: Option<AccountSection>,
    #[serde(default)]
    family: Vec<FamilySection>,
    contract: ContractSection,
    #[serde(default)]
    bank: Option<BankSection>,
    legal: LegalSection,
}

#[derive(Debug, Deserialize)]
struct PersonalSection {
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
    gender: Gender,
    #[serde(default)]
    guardian_name: String,
    #[serde(default)]
    guardian_phone: String,
    #[serde(default)]
    guardian_email: String,
    #[serde(default)]
    medical_notes: String,
    #[serde(default)]
    emergency_contact: String,
}

#[derive(Debug, Deserialize)]
struct ContactSection {
    street: String,
    postal_code: String,
    city: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct AccountSection {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct FamilySection {
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
    gender: Gender,
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    tariff: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContractSection {
    /// Tariff name as listed in the catalog.
    tariff: String,
    start_date: NaiveDate,
    billing_cycle: BillingCycle,
    payment_method: PaymentMethod,
    #[serde(default)]
    admission_fee_cents: i64,
}

#[derive(Debug, Deserialize)]
struct BankSection {
    #[serde(default)]
    iban: String,
    #[serde(default)]
    kto: String,
    #[serde(default)]
    blz: String,
    account_holder: String,
}

#[derive(Debug, Deserialize)]
struct LegalSection {
    terms_version: String,
    privacy_version: String,
    #[serde(default)]
    sepa_version: Option<String>,
    #[serde(default)]
    immediate_start: bool,
    #[serde(default)]
    withdrawal_acknowledged: bool,
}

impl Register {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let raw = std::fs::read_to_string(&self.file)
            .with_context(|| format!("reading {}", self.file.display()))?;
        let application: Application =
            serde_json::from_str(&raw).context("parsing application file")?;

        let variant = if self.public {
            FlowVariant::PublicRegistration
        } else {
            FlowVariant::AdminPanel
        };

        let catalog = if self.public {
            client.list_public_tariffs().await?
        } else {
            client.list_tariffs().await?
        };

        let mut state = WizardState::new(variant, Utc::now().date_naive());
        fill_forms(&mut state, &application, &catalog)?;

        run_duplicate_check(client, &mut state, self.force).await?;
        resolve_bank(client, &mut state, application.bank.as_ref()).await?;

        // Walk the flow front to back; each advance validates its step. The
        // public flow persists every completed step server-side, as the
        // self-registration form does, so an abandoned application can be
        // resumed.
        while !state.step().is_last(variant) {
            let step = state.step();
            state
                .advance()
                .map_err(|e| anyhow!("step {:?} incomplete: {}", step, e))?;
            if self.public {
                if let Some((number, body)) = public_step_snapshot(&state, step) {
                    client.submit_public_step(number, &body).await?;
                }
            }
        }

        let payload = submit::assemble(&state)?;
        println!(
            "Submitting {:?} registration for {} {} ({} family members)",
            variant, payload.member.first_name, payload.member.last_name, payload.family.len()
        );
        println!(
            "Contract: {} to {}, cancel by {}, {} per cycle",
            payload.contract.start_date,
            payload.contract.end_date,
            payload.contract.cancellation_deadline,
            format::euros(payload.contract.amount_per_cycle_cents)
        );

        let receipt = submit::submit(&state, client, bus).await?;
        println!("Registered member {}.", receipt.member_id);
        for id in &receipt.family_member_ids {
            println!("Registered family member {}.", id);
        }
        Ok(())
    }
}

/// Body posted to `/public/register/step{n}` for a completed step. Steps
/// without an endpoint of their own (contact, legal) travel with a later
/// one; see [`WizardStep::public_endpoint_step`].
fn public_step_snapshot(
    state: &WizardState,
    completed: WizardStep,
) -> Option<(u8, serde_json::Value)> {
    let number = completed.public_endpoint_step()?;
    let body = match completed {
        WizardStep::Personal => serde_json::json!({
            "first_name": state.personal.first_name,
            "last_name": state.personal.last_name,
            "birthdate": state.personal.birthdate,
            "gender": state.personal.gender,
        }),
        WizardStep::Account => serde_json::json!({
            "address": {
                "street": state.contact.street,
                "postal_code": state.contact.postal_code,
                "city": state.contact.city,
            },
            "phone": state.contact.phone,
            "email": state.primary_email(),
            "account": {
                "email": state.account.email,
                "username": state.account.username,
            },
        }),
        WizardStep::Family => serde_json::json!({
            "family": state.family.members(),
        }),
        WizardStep::Tariff => serde_json::json!({
            "tariff_id": state.tariff.tariff.as_ref().map(|t| t.id),
            "start_date": state.tariff.start_date,
            "billing_cycle": state.tariff.billing_cycle,
            "payment_method": state.tariff.payment_method,
        }),
        WizardStep::Bank => serde_json::json!({
            "bank": state.bank.resolved,
            "account_holder": state.bank.account_holder,
        }),
        _ => return None,
    };
    Some((number, body))
}

fn fill_forms(
    state: &mut WizardState,
    application: &Application,
    catalog: &[Tariff],
) -> Result<()> {
    let personal = &application.personal;
    state.personal.first_name = personal.first_name.clone();
    state.personal.last_name = personal.last_name.clone();
    state.personal.birthdate = Some(personal.birthdate);
    state.personal.gender = Some(personal.gender);
    state.personal.guardian_name = personal.guardian_name.clone();
    state.personal.guardian_phone = personal.guardian_phone.clone();
    state.personal.guardian_email = personal.guardian_email.clone();
    state.personal.medical_notes = personal.medical_notes.clone();
    state.personal.emergency_contact = personal.emergency_contact.clone();

    let contact = &application.contact;
    state.contact.street = contact.street.clone();
    state.contact.postal_code = contact.postal_code.clone();
    state.contact.city = contact.city.clone();
    state.contact.phone = contact.phone.clone();
    state.contact.email = contact.email.clone();

    if let Some(account) = &application.account {
        state.account.email = account.email.clone();
        state.account.username = account.username.clone();
        state.account.password = account.password.clone();
    }

    let contract = &application.contract;
    state.tariff.tariff = Some(find_tariff(catalog, &contract.tariff)?.clone());
    state.tariff.start_date = Some(contract.start_date);
    state.tariff.billing_cycle = Some(contract.billing_cycle);
    state.tariff.payment_method = Some(contract.payment_method);
    state.tariff.admission_fee_cents = contract.admission_fee_cents;

    let primary_email = state.primary_email().map(|e| e.to_string());
    for member in &application.family {
        let tariff = member
            .tariff
            .as_deref()
            .map(|name| find_tariff(catalog, name))
            .transpose()?;
        state
            .family
            .add(
                FamilyDraft {
                    first_name: member.first_name.clone(),
                    last_name: member.last_name.clone(),
                    birthdate: Some(member.birthdate),
                    gender: Some(member.gender),
                    email: member.email.clone(),
                    username: member.username.clone(),
                    tariff: tariff.cloned(),
                },
                primary_email.as_deref(),
            )
            .map_err(|e| anyhow!("family member {}: {}", member.first_name, e))?;
    }

    let legal = &application.legal;
    state.legal.terms = LegalAcceptance::accepted(&legal.terms_version);
    state.legal.privacy = LegalAcceptance::accepted(&legal.privacy_version);
    if let Some(version) = &legal.sepa_version {
        state.legal.sepa_authorization = LegalAcceptance::accepted(version);
    }
    state.legal.immediate_start = legal.immediate_start;
    state.legal.withdrawal_acknowledged = legal.withdrawal_acknowledged;

    Ok(())
}

fn find_tariff<'a>(catalog: &'a [Tariff], name: &str) -> Result<&'a Tariff> {
    catalog
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("tariff {:?} not found in catalog", name))
}

async fn run_duplicate_check(
    client: &ApiClient,
    state: &mut WizardState,
    force: bool,
) -> Result<()> {
    let (Some(birthdate), Some(gender)) = (state.personal.birthdate, state.personal.gender) else {
        return Ok(());
    };

    let detector = DuplicateDetector::new(client.clone());
    let query = DuplicateQuery {
        first_name: state.personal.first_name.clone(),
        last_name: state.personal.last_name.clone(),
        birthdate,
        gender,
    };

    match detector.check_now(&query).await {
        DuplicateStatus::Match(existing) => {
            state.record_duplicate_match(existing.clone());
            if force {
                println!(
                    "Possible duplicate of {} {} ({}), continuing as requested.",
                    existing.first_name, existing.last_name, existing.id
                );
                state.decide_duplicate(DuplicateDecision::ContinueAnyway);
            } else {
                bail!(
                    "possible duplicate of {} {} ({}); re-run with --force to register anyway",
                    existing.first_name,
                    existing.last_name,
                    existing.id
                );
            }
        }
        DuplicateStatus::NoMatch => state.record_duplicate_cleared(),
        DuplicateStatus::Unavailable(message) => {
            // Fails open.
            println!("Duplicate check unavailable ({}), continuing.", message);
            state.record_duplicate_unavailable(message);
        }
        DuplicateStatus::Idle | DuplicateStatus::Pending => {}
    }
    Ok(())
}

async fn resolve_bank(
    client: &ApiClient,
    state: &mut WizardState,
    bank: Option<&BankSection>,
) -> Result<()> {
    let Some(bank) = bank else {
        return Ok(());
    };

    let resolver = BankResolver::new(client.clone());
    let resolved = if !bank.iban.trim().is_empty() {
        resolver
            .resolve_iban(&bank.iban)
            .await?
            .ok_or_else(|| anyhow!("IBAN {:?} is too short", bank.iban))?
    } else if !bank.kto.trim().is_empty() {
        resolver.resolve_account(&bank.kto, &bank.blz).await?
    } else {
        return Ok(());
    };

    if let Some(name) = &resolved.bank_name {
        println!("Bank: {}", name);
    }
    state.bank.iban_input = resolved.iban.clone();
    state.bank.resolved = Some(resolved);
    state.bank.account_holder = bank.account_holder.clone();
    Ok(())
}
