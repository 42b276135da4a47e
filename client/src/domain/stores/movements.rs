//! Daily supervisor movement sheet and its Telegram report.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{
    Activity, EntityId, Failure, StoreCore, SyncSlot, decode_echo, decode_list,
};
use crate::domain::{MovementDraft, StoreError, SupervisorDay, SupervisorMovement};

const BY_DATE_PATH: &str = "operations/by-date/";
const MOVEMENTS_PATH: &str = "operations/movements/";
const REPORT_PATH: &str = "operations/send-report/";
const FETCH_FAILED: &str = "Failed to fetch movements for the selected date.";
const SAVE_FAILED: &str = "Failed to save movement.";

/// Every supervisor with their movement record for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementSheet {
    /// Day the sheet was loaded for; `None` before the first load.
    pub date: Option<NaiveDate>,
    /// Supervisors in server order.
    pub supervisors: Vec<SupervisorDay>,
}

/// Holds the movement sheet of the selected day.
pub struct MovementStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    sheet: SyncSlot<MovementSheet>,
}

impl<T: ?Sized, N: ?Sized> MovementStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            sheet: SyncSlot::new(MovementSheet::default()),
        }
    }

    /// Sheet from the latest [`Self::fetch_by_date`].
    pub fn sheet(&self) -> MovementSheet {
        self.sheet.get()
    }

    /// Whether an action is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }
}

impl<T, N> MovementStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load the sheet for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with
    /// `Failed to fetch movements for the selected date.`.
    pub async fn fetch_by_date(&self, date: NaiveDate) -> Result<MovementSheet, StoreError> {
        self.core
            .load(
                &self.activity,
                &self.sheet,
                ApiRequest::get(BY_DATE_PATH).with_query("date", iso(date)),
                Failure::fixed(FETCH_FAILED),
                |response| {
                    decode_list(response, FETCH_FAILED).map(|supervisors| MovementSheet {
                        date: Some(date),
                        supervisors,
                    })
                },
            )
            .await
    }

    /// Record a movement, then reload the sheet for its date.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary (one
    /// record per supervisor and day), or `Failed to save movement.`.
    pub async fn create(
        &self,
        draft: &MovementDraft,
    ) -> Result<Option<SupervisorMovement>, StoreError> {
        self.save(ApiRequest::post(MOVEMENTS_PATH, self.body(draft)?), draft.date, "Movement saved.")
            .await
    }

    /// Replace a movement, then reload the sheet for its date.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary, or
    /// `Failed to save movement.`.
    pub async fn update(
        &self,
        id: EntityId,
        draft: &MovementDraft,
    ) -> Result<Option<SupervisorMovement>, StoreError> {
        self.save(
            ApiRequest::patch(movement_path(id), self.body(draft)?),
            draft.date,
            "Movement updated.",
        )
        .await
    }

    /// Delete a movement, then reload the sheet for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to delete movement.`.
    pub async fn remove(&self, id: EntityId, date: NaiveDate) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        self.core
            .send(
                &self.activity,
                ApiRequest::delete(movement_path(id)),
                Failure::fixed("Failed to delete movement."),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Success", "Movement entry deleted."));
        self.refetch(date).await;
        Ok(())
    }

    /// Ask the server to send the PDF movement report for `date` to the
    /// alert and report Telegram groups.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the server's `error` text (for example a
    /// missing Telegram group), or `Failed to send report.`.
    pub async fn send_report(&self, date: NaiveDate) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        self.core
            .send(
                &self.activity,
                ApiRequest::post(REPORT_PATH, json!({ "date": iso(date) })),
                Failure::detailed("Failed to send report."),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Success", "Report sent successfully."));
        Ok(())
    }

    async fn save(
        &self,
        request: ApiRequest,
        date: NaiveDate,
        success: &str,
    ) -> Result<Option<SupervisorMovement>, StoreError> {
        let _busy = self.activity.begin();
        let response = self
            .core
            .send(&self.activity, request, Failure::detailed(SAVE_FAILED))
            .await?;
        self.core.notify(NoticeDraft::success("Success", success));
        self.refetch(date).await;
        Ok(decode_echo(response))
    }

    fn body(&self, draft: &MovementDraft) -> Result<serde_json::Value, StoreError> {
        serde_json::to_value(draft).map_err(|error| {
            debug!(%error, "movement did not serialise");
            let store_error = StoreError::decode(SAVE_FAILED);
            self.core.fail(&self.activity, &store_error, "Error");
            store_error
        })
    }

    async fn refetch(&self, date: NaiveDate) {
        if let Err(error) = self.fetch_by_date(date).await {
            debug!(message = error.message(), %date, "movement refetch failed");
        }
    }
}

fn movement_path(id: EntityId) -> String {
    format!("{MOVEMENTS_PATH}{id}/")
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ApiResponse, HttpMethod, MockNotifier, MockTransport, NoticeId, NoticeKind,
        RequestBody, TransportError,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
    }

    fn sheet_body() -> serde_json::Value {
        json!([
            {
                "id": 3,
                "name": "A. Kumar",
                "designation": "SSE/Signal",
                "depot_display": "KGP",
                "movement": {
                    "id": 70,
                    "date": "2024-05-01",
                    "supervisor": 3,
                    "location": "Panskura",
                    "on_leave": false,
                    "leave_from": null,
                    "leave_to": null,
                    "look_after": null,
                    "purpose": "Point failure"
                }
            },
            {"id": 4, "name": "B. Das", "designation": "JE/Signal", "movement": null}
        ])
    }

    fn is_sheet_request(request: &ApiRequest) -> bool {
        request.method == HttpMethod::Get
            && request.path == BY_DATE_PATH
            && request.query == vec![("date".to_owned(), "2024-05-01".to_owned())]
    }

    fn success_notifier(message: &'static str) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(move |draft| draft.kind == NoticeKind::Success && draft.message == message)
            .times(1)
            .returning(|_| NoticeId::new(1));
        notifier
    }

    #[rstest]
    #[tokio::test]
    async fn the_sheet_lists_every_supervisor_for_the_day(day: NaiveDate) {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(is_sheet_request)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(sheet_body())));
        let store = MovementStore::new(Arc::new(transport), Arc::new(MockNotifier::new()));

        let sheet = store.fetch_by_date(day).await.expect("fetch succeeds");

        assert_eq!(sheet.date, Some(day));
        assert_eq!(sheet.supervisors.len(), 2);
        assert_eq!(
            sheet.supervisors[0].movement.as_ref().map(|m| m.location.as_str()),
            Some("Panskura")
        );
        assert!(sheet.supervisors[1].movement.is_none());
        assert_eq!(store.sheet(), sheet);
    }

    #[rstest]
    #[case::create(None, HttpMethod::Post, MOVEMENTS_PATH, "Movement saved.")]
    #[case::update(Some(70), HttpMethod::Patch, "operations/movements/70/", "Movement updated.")]
    #[tokio::test]
    async fn saving_refetches_the_sheet_for_the_movement_date(
        day: NaiveDate,
        #[case] id: Option<EntityId>,
        #[case] method: HttpMethod,
        #[case] path: &'static str,
        #[case] message: &'static str,
    ) {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(move |request| {
                request.method == method
                    && request.path == path
                    && matches!(&request.body, RequestBody::Json(body)
                        if body["date"] == json!("2024-05-01") && body["location"] == json!("Mecheda"))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"id": 70, "date": "2024-05-01", "supervisor": 3}))));
        transport
            .expect_send()
            .withf(is_sheet_request)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(sheet_body())));
        let store = MovementStore::new(Arc::new(transport), Arc::new(success_notifier(message)));
        let draft = MovementDraft::on_duty(day, 3, "Mecheda");

        let saved = match id {
            Some(id) => store.update(id, &draft).await,
            None => store.create(&draft).await,
        }
        .expect("save succeeds");

        assert_eq!(saved.map(|movement| movement.id), Some(70));
        assert_eq!(store.sheet().supervisors.len(), 2);
        assert!(!store.is_busy());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_movements_surface_the_validation_message(day: NaiveDate) {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Post)
            .times(1)
            .returning(|_| {
                Err(TransportError::status(
                    400_u16,
                    r#"{"non_field_errors": ["The fields date, supervisor must make a unique set."]}"#,
                ))
            });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Error)
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = MovementStore::new(Arc::new(transport), Arc::new(notifier));

        let error = store
            .create(&MovementDraft::on_duty(day, 3, "Mecheda"))
            .await
            .expect_err("duplicate is rejected");

        assert!(error.message().contains("unique set"));
        assert_eq!(store.sheet(), MovementSheet::default());
    }

    #[rstest]
    #[tokio::test]
    async fn remove_refetches_the_given_date(day: NaiveDate) {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Delete && request.path == "operations/movements/70/"
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::no_content()));
        transport
            .expect_send()
            .withf(is_sheet_request)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(sheet_body())));
        let store = MovementStore::new(
            Arc::new(transport),
            Arc::new(success_notifier("Movement entry deleted.")),
        );

        store.remove(70, day).await.expect("remove succeeds");

        assert_eq!(store.sheet().date, Some(day));
    }

    #[rstest]
    #[tokio::test]
    async fn report_failures_carry_the_server_error(day: NaiveDate) {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.path == REPORT_PATH
                    && request.body == RequestBody::Json(json!({"date": "2024-05-01"}))
            })
            .times(1)
            .returning(|_| {
                Err(TransportError::status(
                    500_u16,
                    r#"{"error": "A required Telegram group (alert or reports) is not configured."}"#,
                ))
            });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Error)
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = MovementStore::new(Arc::new(transport), Arc::new(notifier));

        let error = store.send_report(day).await.expect_err("report fails");

        assert!(error.message().starts_with("A required Telegram group"));
        assert_eq!(store.last_error().as_deref(), Some(error.message()));
    }
}
