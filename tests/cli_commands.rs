use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dojoadmin::api::ApiClient;
use dojoadmin::cli::commands::attendance::CheckIn;
use dojoadmin::cli::commands::contracts::{ListContracts, ShowContract};
use dojoadmin::cli::commands::members::{ArchiveMembers, UpdateMember};
use dojoadmin::cli::commands::Register;
use dojoadmin::events::{AppEvent, EventBus};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(&server.uri(), None, Some("berlin-mitte".to_string()))
}

fn member_json(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "first_name": "Kenji",
        "last_name": "Sato",
        "birthdate": "1990-03-02",
        "gender": "male",
        "address": {"street": "Hauptstr. 1", "postal_code": "10115", "city": "Berlin"},
        "phone": null,
        "email": "kenji@example.org",
        "guardian": null,
        "medical_notes": null,
        "emergency_contact": null,
        "bank": null,
        "active": true,
        "archived": false,
        "created_at": "2026-01-01T10:00:00Z",
        "updated_at": "2026-01-01T10:00:00Z"
    })
}

fn contract_json(id: Uuid, member_id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "member_id": member_id,
        "tariff_id": Uuid::new_v4(),
        "billing_cycle": "monthly",
        "payment_method": "direct_debit",
        "start_date": "2026-09-01",
        "end_date": "2028-09-01",
        "minimum_term_months": 24,
        "notice_period_months": 3,
        "price_cents": 4999,
        "admission_fee_cents": 0,
        "terms": {"accepted": true, "version": "2026-01"},
        "privacy": {"accepted": true, "version": "2026-01"},
        "sepa_authorization": {"accepted": true, "version": "2026-01"},
        "immediate_start": {"accepted": false, "version": null},
        "created_at": "2026-08-25T10:00:00Z",
        "updated_at": "2026-08-25T10:00:00Z"
    })
}

#[tokio::test]
async fn test_archive_command_notifies_member_views() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/mitglieder/archivieren"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"archived": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut events = bus.subscribe();

    ArchiveMembers { ids: vec![id] }
        .run(&client(&server), &bus)
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap(), AppEvent::MembersChanged);
}

#[tokio::test]
async fn test_update_command_sends_changed_fields_and_notifies() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path(format!("/mitglieder/{}", id)))
        .and(body_partial_json(json!({"email": "neu@example.org", "active": false})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": member_json(id)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut events = bus.subscribe();

    UpdateMember {
        id,
        email: Some("neu@example.org".to_string()),
        phone: None,
        medical_notes: None,
        emergency_contact: None,
        active: Some(false),
    }
    .run(&client(&server), &bus)
    .await
    .unwrap();
    assert_eq!(events.recv().await.unwrap(), AppEvent::MembersChanged);
}

#[tokio::test]
async fn test_checkin_command_notifies_attendance_views() {
    let server = MockServer::start().await;
    let member = Uuid::new_v4();
    let class = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/anwesenheit/checkin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": Uuid::new_v4(),
                "member_id": member,
                "class_id": class,
                "date": "2026-08-25",
                "status": "present",
                "checked_in_at": "2026-08-25T18:00:00Z",
                "checked_out_at": null,
                "note": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut events = bus.subscribe();

    CheckIn { member, class }
        .run(&client(&server), &bus)
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap(), AppEvent::AttendanceChanged);
}

#[tokio::test]
async fn test_contract_list_filters_by_member() {
    let server = MockServer::start().await;
    let member_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/vertraege"))
        .and(query_param("mitglied", member_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [contract_json(Uuid::new_v4(), member_id)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    ListContracts {
        member: Some(member_id),
    }
    .run(&client(&server))
    .await
    .unwrap();
}

#[tokio::test]
async fn test_contract_show_fetches_single_contract() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/vertraege/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": contract_json(id, Uuid::new_v4())
        })))
        .expect(1)
        .mount(&server)
        .await;

    ShowContract { id }.run(&client(&server)).await.unwrap();
}

#[tokio::test]
async fn test_public_register_persists_every_intermediate_step() {
    let server = MockServer::start().await;
    let tariff_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/public/tarife"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": tariff_id,
                "name": "Standard",
                "price_cents": 4999,
                "billing_cycle": "monthly",
                "minimum_term_months": 24,
                "notice_period_months": 3,
                "age_group": null,
                "archived": false
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mitglieder/duplikate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/banken/validate-iban"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"valid": true, "bic": "DEUTDEBBXXX", "bank_name": "Deutsche Bank Berlin"}
        })))
        .mount(&server)
        .await;

    // One call per intermediate endpoint; step 2 carries contact + account.
    for step in 1..=5 {
        Mock::given(method("POST"))
            .and(path(format!("/public/register/step{}", step)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"step": step, "ok": true}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/public/register/step6"))
        .and(body_partial_json(json!({"source": "public_registration"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"member_id": member_id, "family_member_ids": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let application = json!({
        "personal": {
            "first_name": "Kenji",
            "last_name": "Sato",
            "birthdate": "1990-03-02",
            "gender": "male"
        },
        "contact": {"street": "Hauptstr. 1", "postal_code": "10115", "city": "Berlin"},
        "account": {"email": "kenji@example.org", "password": "correct horse battery"},
        "contract": {
            "tariff": "Standard",
            "start_date": "2030-01-01",
            "billing_cycle": "monthly",
            "payment_method": "direct_debit"
        },
        "bank": {"iban": "DE89370400440532013000", "account_holder": "Kenji Sato"},
        "legal": {
            "terms_version": "2026-01",
            "privacy_version": "2026-01",
            "sepa_version": "2026-01"
        }
    });
    let file = std::env::temp_dir().join(format!("dojoadmin-application-{}.json", Uuid::new_v4()));
    std::fs::write(&file, serde_json::to_vec_pretty(&application).unwrap()).unwrap();

    let bus = EventBus::new();
    let mut events = bus.subscribe();

    let result = Register {
        file: file.clone(),
        public: true,
        force: false,
    }
    .run(&client(&server), &bus)
    .await;
    std::fs::remove_file(&file).ok();
    result.unwrap();

    assert_eq!(events.recv().await.unwrap(), AppEvent::MembersChanged);
    assert_eq!(events.recv().await.unwrap(), AppEvent::ContractsChanged);
    assert_eq!(events.recv().await.unwrap(), AppEvent::MandatesChanged);
}
