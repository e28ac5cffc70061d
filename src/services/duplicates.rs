use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::members::{DuplicateQuery, MemberMatch};
use crate::api::ApiClient;

/// Quiet period after the last keystroke before the remote check fires.
pub const DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Default)]
pub enum DuplicateStatus {
    #[default]
    Idle,
    Pending,
    NoMatch,
    Match(MemberMatch),
    /// The check could not run. Shown inline; never blocks the flow.
    Unavailable(String),
}

/// Debounced duplicate lookup against existing member records.
///
/// Each `schedule` call cancels the previous pending check, so only the
/// state after the fields stabilized reaches the backend. Observers watch
/// the status channel.
pub struct DuplicateDetector {
    api: ApiClient,
    delay: Duration,
    tx: watch::Sender<DuplicateStatus>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DuplicateDetector {
    pub fn new(api: ApiClient) -> Self {
        Self::with_delay(api, DEBOUNCE)
    }

    pub fn with_delay(api: ApiClient, delay: Duration) -> Self {
        let (tx, _) = watch::channel(DuplicateStatus::Idle);
        Self {
            api,
            delay,
            tx,
            pending: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DuplicateStatus> {
        self.tx.subscribe()
    }

    /// Schedules a check after the debounce period, replacing any check
    /// still pending.
    pub fn schedule(&self, query: DuplicateQuery) {
        let api = self.api.clone();
        let delay = self.delay;
        let tx = self.tx.clone();

        // Pending goes out before the task exists, so a zero-delay check
        // can never have its result overwritten.
        let _ = self.tx.send(DuplicateStatus::Pending);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let status = run_check(&api, &query).await;
            let _ = tx.send(status);
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Runs the check immediately, without debouncing. Used by batch flows.
    pub async fn check_now(&self, query: &DuplicateQuery) -> DuplicateStatus {
        run_check(&self.api, query).await
    }
}

async fn run_check(api: &ApiClient, query: &DuplicateQuery) -> DuplicateStatus {
    match api.find_duplicates(query).await {
        Ok(matches) => match matches.into_iter().next() {
            Some(existing) => {
                tracing::info!(
                    existing_id = %existing.id,
                    "Duplicate check found an existing member"
                );
                DuplicateStatus::Match(existing)
            }
            None => DuplicateStatus::NoMatch,
        },
        // Fails open; shown inline, never blocks the flow.
        Err(e) => {
            tracing::warn!(error = %e, "Duplicate check unavailable");
            DuplicateStatus::Unavailable(e.to_string())
        }
    }
}
