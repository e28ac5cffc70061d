use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::Result;
use crate::models::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Serialize)]
struct CheckInRequest {
    member_id: Uuid,
    class_id: Uuid,
    date: NaiveDate,
    checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct CheckOutRequest {
    checked_out_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct StatusRequest<'a> {
    status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

impl ApiClient {
    pub async fn list_attendance(
        &self,
        class_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.get_json(&format!("/anwesenheit/{}/{}", class_id, date))
            .await
    }

    pub async fn check_in(&self, member_id: Uuid, class_id: Uuid) -> Result<AttendanceRecord> {
        let now = Utc::now();
        self.post_json(
            "/anwesenheit/checkin",
            &CheckInRequest {
                member_id,
                class_id,
                date: now.date_naive(),
                checked_in_at: now,
            },
        )
        .await
    }

    pub async fn check_out(&self, record_id: Uuid) -> Result<AttendanceRecord> {
        self.post_json(
            &format!("/anwesenheit/{}/checkout", record_id),
            &CheckOutRequest {
                checked_out_at: Utc::now(),
            },
        )
        .await
    }

    pub async fn set_attendance_status(
        &self,
        record_id: Uuid,
        status: AttendanceStatus,
        note: Option<&str>,
    ) -> Result<AttendanceRecord> {
        self.put_json(
            &format!("/anwesenheit/{}", record_id),
            &StatusRequest { status, note },
        )
        .await
    }
}
