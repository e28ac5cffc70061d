use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::api::registration::RegistrationReceipt;
use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::events::{AppEvent, EventBus};
use crate::models::{Address, BillingCycle, Gender, Guardian, LegalAcceptance, PaymentMethod};
use crate::wizard::{family, terms, validate, FlowVariant, WizardState};

/// One request body carrying the whole registration: primary member,
/// family members, contract terms and legal flags.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPayload {
    /// Audit tag: `admin_panel` or `public_registration`.
    pub source: &'static str,
    pub member: MemberPayload,
    pub family: Vec<FamilyMemberPayload>,
    pub contract: ContractPayload,
    pub legal: LegalPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberPayload {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian: Option<Guardian>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankPayload {
    pub iban: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    pub account_holder: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyMemberPayload {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariff_id: Option<Uuid>,
    /// 1-based family position; the primary member is position 1.
    pub position: usize,
    pub discount_percent: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractPayload {
    pub tariff_id: Uuid,
    pub billing_cycle: BillingCycle,
    pub payment_method: PaymentMethod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cancellation_deadline: NaiveDate,
    pub minimum_term_months: u32,
    pub notice_period_months: u32,
    pub price_cents: i64,
    pub admission_fee_cents: i64,
    pub amount_per_cycle_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegalPayload {
    pub terms: LegalAcceptance,
    pub privacy: LegalAcceptance,
    pub sepa_authorization: LegalAcceptance,
    pub immediate_start: bool,
    pub withdrawal_acknowledged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
}

/// Merges the wizard state into one request body. Every step of the flow is
/// re-validated first; an undecided duplicate match or missing acceptances
/// refuse assembly.
pub fn assemble(state: &WizardState) -> Result<RegistrationPayload> {
    validate::validate_all(state).map_err(|e| AppError::Validation(e.to_string()))?;

    let tariff = state
        .tariff
        .tariff
        .as_ref()
        .ok_or_else(|| AppError::Validation("no tariff selected".to_string()))?;
    let start_date = state
        .tariff
        .start_date
        .ok_or_else(|| AppError::Validation("no start date".to_string()))?;
    let billing_cycle = state
        .tariff
        .billing_cycle
        .ok_or_else(|| AppError::Validation("no billing cycle".to_string()))?;
    let payment_method = state
        .tariff
        .payment_method
        .ok_or_else(|| AppError::Validation("no payment method".to_string()))?;
    let birthdate = state
        .personal
        .birthdate
        .ok_or_else(|| AppError::Validation("no birthdate".to_string()))?;
    let gender = state
        .personal
        .gender
        .ok_or_else(|| AppError::Validation("no gender".to_string()))?;

    let end_date = terms::end_date(start_date, tariff.minimum_term_months)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let cancellation_deadline =
        terms::cancellation_deadline(end_date, tariff.notice_period_months)
            .map_err(|e| AppError::Validation(e.to_string()))?;

    let contract = ContractPayload {
        tariff_id: tariff.id,
        billing_cycle,
        payment_method,
        start_date,
        end_date,
        cancellation_deadline,
        minimum_term_months: tariff.minimum_term_months,
        notice_period_months: tariff.notice_period_months,
        price_cents: tariff.price_cents,
        admission_fee_cents: state.tariff.admission_fee_cents,
        amount_per_cycle_cents: terms::amount_per_cycle_cents(tariff.price_cents, billing_cycle),
    };

    let family = state
        .family
        .members()
        .iter()
        .enumerate()
        .map(|(index, member)| {
            let discount = state.family.discount_for_index(index);
            FamilyMemberPayload {
                first_name: member.first_name.clone(),
                last_name: member.last_name.clone(),
                birthdate: member.birthdate,
                gender: member.gender,
                email: member.email.clone(),
                username: member.username.clone(),
                tariff_id: member.tariff.as_ref().map(|t| t.id),
                position: index + 2,
                discount_percent: discount,
                discounted_price_cents: member
                    .tariff
                    .as_ref()
                    .map(|t| family::discounted_price_cents(t.price_cents, discount)),
            }
        })
        .collect();

    let guardian = if state.personal.guardian_name.trim().is_empty() {
        None
    } else {
        Some(Guardian {
            name: state.personal.guardian_name.trim().to_string(),
            phone: state.personal.guardian_phone.trim().to_string(),
            email: optional(&state.personal.guardian_email),
        })
    };

    let bank = state.bank.resolved.as_ref().map(|resolved| BankPayload {
        iban: resolved.iban.clone(),
        bic: resolved.bic.clone(),
        bank_name: resolved.bank_name.clone(),
        account_holder: state.bank.account_holder.trim().to_string(),
    });

    let account = match state.variant {
        FlowVariant::AdminPanel => None,
        FlowVariant::PublicRegistration => Some(AccountPayload {
            email: optional(&state.account.email),
            username: optional(&state.account.username),
            password: state.account.password.clone(),
        }),
    };

    Ok(RegistrationPayload {
        source: state.variant.source_tag(),
        member: MemberPayload {
            first_name: state.personal.first_name.trim().to_string(),
            last_name: state.personal.last_name.trim().to_string(),
            birthdate,
            gender,
            address: Address {
                street: state.contact.street.trim().to_string(),
                postal_code: state.contact.postal_code.trim().to_string(),
                city: state.contact.city.trim().to_string(),
            },
            phone: optional(&state.contact.phone),
            email: state.primary_email().map(|e| e.to_string()),
            guardian,
            medical_notes: optional(&state.personal.medical_notes),
            emergency_contact: optional(&state.personal.emergency_contact),
            bank,
        },
        family,
        contract,
        legal: LegalPayload {
            terms: state.legal.terms.clone(),
            privacy: state.legal.privacy.clone(),
            sepa_authorization: state.legal.sepa_authorization.clone(),
            immediate_start: state.legal.immediate_start,
            withdrawal_acknowledged: state.legal.withdrawal_acknowledged,
        },
        account,
    })
}

/// Assembles and submits the registration, then notifies other views.
///
/// Backend failures come back verbatim as [`AppError::Backend`].
pub async fn submit(
    state: &WizardState,
    client: &ApiClient,
    bus: &EventBus,
) -> Result<RegistrationReceipt> {
    let payload = assemble(state)?;

    let receipt = match state.variant {
        FlowVariant::AdminPanel => client.submit_admin_registration(&payload).await?,
        FlowVariant::PublicRegistration => client.submit_public_registration(&payload).await?,
    };

    tracing::info!(
        member_id = %receipt.member_id,
        family_members = receipt.family_member_ids.len(),
        source = payload.source,
        "Registration submitted"
    );

    bus.publish(AppEvent::MembersChanged);
    bus.publish(AppEvent::ContractsChanged);
    // Direct-debit registrations create a mandate server-side.
    if payload.contract.payment_method == PaymentMethod::DirectDebit {
        bus.publish(AppEvent::MandatesChanged);
    }

    Ok(receipt)
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Tariff};
    use crate::wizard::family::FamilyDraft;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tariff(price: i64, term: u32, notice: u32) -> Tariff {
        Tariff {
            id: Uuid::new_v4(),
            name: "Standard".to_string(),
            price_cents: price,
            billing_cycle: BillingCycle::Monthly,
            minimum_term_months: term,
            notice_period_months: notice,
            age_group: None,
            archived: false,
        }
    }

    fn filled_state(variant: FlowVariant) -> WizardState {
        let mut state = WizardState::new(variant, date(2026, 8, 25));
        state.personal.first_name = "Kenji".to_string();
        state.personal.last_name = "Sato".to_string();
        state.personal.birthdate = Some(date(1990, 3, 2));
        state.personal.gender = Some(Gender::Male);
        state.contact.street = "Hauptstr. 1".to_string();
        state.contact.postal_code = "10115".to_string();
        state.contact.city = "Berlin".to_string();
        state.contact.email = "kenji@example.org".to_string();
        state.account.email = "kenji@example.org".to_string();
        state.account.password = "correct horse".to_string();
        state.tariff.tariff = Some(tariff(4999, 24, 3));
        state.tariff.start_date = Some(date(2025, 1, 15));
        state.tariff.billing_cycle = Some(BillingCycle::Monthly);
        state.tariff.payment_method = Some(PaymentMethod::BankTransfer);
        state.legal.terms = LegalAcceptance::accepted("2026-01");
        state.legal.privacy = LegalAcceptance::accepted("2026-01");
        state
    }

    #[test]
    fn test_assemble_derives_contract_dates() {
        let payload = assemble(&filled_state(FlowVariant::AdminPanel)).unwrap();
        assert_eq!(payload.contract.start_date, date(2025, 1, 15));
        assert_eq!(payload.contract.end_date, date(2027, 1, 15));
        assert_eq!(payload.contract.cancellation_deadline, date(2026, 10, 15));
    }

    #[test]
    fn test_assemble_tags_flow_source() {
        let admin = assemble(&filled_state(FlowVariant::AdminPanel)).unwrap();
        assert_eq!(admin.source, "admin_panel");
        assert!(admin.account.is_none());

        let public = assemble(&filled_state(FlowVariant::PublicRegistration)).unwrap();
        assert_eq!(public.source, "public_registration");
        assert!(public.account.is_some());
    }

    #[test]
    fn test_assemble_applies_family_discounts() {
        let mut state = filled_state(FlowVariant::AdminPanel);
        for (name, email) in [("Aiko", "aiko@x.org"), ("Ben", "ben@x.org"), ("Chie", "chie@x.org")]
        {
            state
                .family
                .add(
                    FamilyDraft {
                        first_name: name.to_string(),
                        last_name: "Sato".to_string(),
                        birthdate: Some(date(2012, 5, 1)),
                        gender: Some(Gender::Diverse),
                        email: email.to_string(),
                        username: String::new(),
                        tariff: Some(tariff(2000, 12, 1)),
                    },
                    Some("kenji@example.org"),
                )
                .unwrap();
        }

        let payload = assemble(&state).unwrap();
        let tiers: Vec<u32> = payload.family.iter().map(|f| f.discount_percent).collect();
        assert_eq!(tiers, vec![10, 15, 20]);
        assert_eq!(payload.family[0].position, 2);
        assert_eq!(payload.family[0].discounted_price_cents, Some(1800));
        assert_eq!(payload.family[2].discounted_price_cents, Some(1600));
    }

    #[test]
    fn test_assemble_refuses_undecided_duplicate() {
        let mut state = filled_state(FlowVariant::AdminPanel);
        state.record_duplicate_match(crate::api::members::MemberMatch {
            id: Uuid::new_v4(),
            first_name: "Kenji".to_string(),
            last_name: "Sato".to_string(),
            birthdate: date(1990, 3, 2),
            archived: false,
        });
        assert!(matches!(
            assemble(&state),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_assemble_refuses_missing_acceptances() {
        let mut state = filled_state(FlowVariant::AdminPanel);
        state.legal.privacy = LegalAcceptance::declined();
        assert!(matches!(assemble(&state), Err(AppError::Validation(_))));
    }
}
