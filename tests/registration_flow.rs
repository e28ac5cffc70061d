use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dojoadmin::api::ApiClient;
use dojoadmin::error::AppError;
use dojoadmin::events::{AppEvent, EventBus};
use dojoadmin::models::{BillingCycle, Gender, LegalAcceptance, PaymentMethod, Tariff};
use dojoadmin::services::banking::ResolvedBank;
use dojoadmin::wizard::{submit, FlowVariant, WizardState, WizardStep};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tariff() -> Tariff {
    Tariff {
        id: Uuid::new_v4(),
        name: "Standard".to_string(),
        price_cents: 4999,
        billing_cycle: BillingCycle::Monthly,
        minimum_term_months: 24,
        notice_period_months: 3,
        age_group: None,
        archived: false,
    }
}

fn filled_public_state() -> WizardState {
    let mut state = WizardState::new(FlowVariant::PublicRegistration, date(2026, 8, 25));
    state.personal.first_name = "Kenji".to_string();
    state.personal.last_name = "Sato".to_string();
    state.personal.birthdate = Some(date(1990, 3, 2));
    state.personal.gender = Some(Gender::Male);
    state.contact.street = "Hauptstr. 1".to_string();
    state.contact.postal_code = "10115".to_string();
    state.contact.city = "Berlin".to_string();
    state.account.email = "kenji@example.org".to_string();
    state.account.password = "correct horse battery".to_string();
    state.tariff.tariff = Some(tariff());
    state.tariff.start_date = Some(date(2026, 9, 1));
    state.tariff.billing_cycle = Some(BillingCycle::Yearly);
    state.tariff.payment_method = Some(PaymentMethod::DirectDebit);
    state.bank.resolved = Some(ResolvedBank {
        iban: "DE89370400440532013000".to_string(),
        bic: Some("DEUTDEBBXXX".to_string()),
        bank_name: Some("Deutsche Bank Berlin".to_string()),
    });
    state.bank.account_holder = "Kenji Sato".to_string();
    state.legal.terms = LegalAcceptance::accepted("2026-01");
    state.legal.privacy = LegalAcceptance::accepted("2026-01");
    state.legal.sepa_authorization = LegalAcceptance::accepted("2026-01");
    state
}

#[test]
fn test_public_flow_walks_all_eight_steps() {
    let mut state = filled_public_state();
    let mut display_numbers = vec![state.display_step()];

    while !state.step().is_last(FlowVariant::PublicRegistration) {
        state.advance().unwrap();
        display_numbers.push(state.display_step());
    }

    assert_eq!(display_numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(state.step(), WizardStep::Summary);

    // Advancing past the summary validates but stays put.
    state.advance().unwrap();
    assert_eq!(state.step(), WizardStep::Summary);
}

#[tokio::test]
async fn test_submission_posts_final_public_step_and_notifies_views() {
    let server = MockServer::start().await;
    let member_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/public/register/step6"))
        .and(body_partial_json(json!({
            "source": "public_registration",
            "contract": {
                "start_date": "2026-09-01",
                "end_date": "2028-09-01",
                "cancellation_deadline": "2028-06-01",
                "amount_per_cycle_cents": 53989
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"member_id": member_id, "family_member_ids": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), None, None);
    let bus = EventBus::new();
    let mut events = bus.subscribe();

    let state = filled_public_state();
    let receipt = submit::submit(&state, &client, &bus).await.unwrap();

    assert_eq!(receipt.member_id, member_id);
    assert_eq!(events.recv().await.unwrap(), AppEvent::MembersChanged);
    assert_eq!(events.recv().await.unwrap(), AppEvent::ContractsChanged);
    // Direct debit: the backend opened a mandate alongside the contract.
    assert_eq!(events.recv().await.unwrap(), AppEvent::MandatesChanged);
}

#[tokio::test]
async fn test_admin_flow_posts_to_member_collection() {
    let server = MockServer::start().await;
    let member_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/mitglieder"))
        .and(body_partial_json(json!({"source": "admin_panel"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"member_id": member_id}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), None, None);
    let bus = EventBus::new();

    let mut state = filled_public_state();
    state.variant = FlowVariant::AdminPanel;
    state.contact.email = "kenji@example.org".to_string();

    let receipt = submit::submit(&state, &client, &bus).await.unwrap();
    assert_eq!(receipt.member_id, member_id);
    assert!(receipt.family_member_ids.is_empty());
}

#[tokio::test]
async fn test_backend_rejection_surfaces_message_and_skips_events() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/public/register/step6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "E-Mail-Adresse bereits vergeben"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), None, None);
    let bus = EventBus::new();
    let mut events = bus.subscribe();

    let err = submit::submit(&filled_public_state(), &client, &bus)
        .await
        .unwrap_err();
    match err {
        AppError::Backend(message) => assert_eq!(message, "E-Mail-Adresse bereits vergeben"),
        other => panic!("expected backend error, got {:?}", other),
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_submission_is_refused_locally_before_any_request() {
    // No mock server at all: a validation failure must never hit the wire.
    let client = ApiClient::with_base_url("http://127.0.0.1:9", None, None);
    let bus = EventBus::new();

    let mut state = filled_public_state();
    state.legal.terms = LegalAcceptance::declined();

    let err = submit::submit(&state, &client, &bus).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
