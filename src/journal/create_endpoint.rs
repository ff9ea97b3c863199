//! Defines the endpoint for creating a new journal entry.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    journal::{JournalEntry, create_journal_entry, request::JournalEntryRequest},
};

/// The state needed to create a journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryState {
    /// The database connection for managing journal entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateJournalEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a journal entry, responds with the created
/// entry and its newly assigned transaction ID.
pub async fn create_journal_entry_endpoint(
    State(state): State<CreateJournalEntryState>,
    body: Result<Json<JournalEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JournalEntry>), Error> {
    let Json(request) = body?;
    let new_entry = request.into_new_entry()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let entry = create_journal_entry(&new_entry, &connection)?;
    tracing::info!("Created journal entry {} ({})", entry.trans_id, entry.id);

    Ok((StatusCode::CREATED, Json(entry)))
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::COOKIE};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        build_router, endpoints,
        test_utils::{get_test_app_state, get_test_server, log_in},
    };

    fn entry_body(description: &str) -> Value {
        json!({
            "date": "2025-05-20",
            "description": description,
            "lines": [
                {"account_number": 5000, "account_name": "Rent", "debit": 1500.0},
                {"account_number": 1000, "account_name": "Cash", "credit": 1500.0},
            ],
        })
    }

    #[tokio::test]
    async fn can_create_journal_entry() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::JOURNAL)
            .add_cookie(cookie)
            .json(&entry_body("May rent"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let entry = response.json::<Value>();
        assert_eq!(entry["trans_id"], 1);
        assert_eq!(entry["date"], "2025-05-20");
        assert_eq!(entry["description"], "May rent");
        assert_eq!(entry["attachments"], json!([]));
        assert_eq!(entry["lines"][0]["debit"], 1500.0);
        assert_eq!(entry["lines"][0]["credit"], 0.0);
        assert_eq!(entry["lines"][1]["account"], Value::Null);
    }

    #[tokio::test]
    async fn trans_ids_count_up_from_one() {
        let server = get_test_server();
        let cookie = log_in(&server).await;
        let mut trans_ids = Vec::new();

        for i in 0..4 {
            let entry = server
                .post(endpoints::JOURNAL)
                .add_cookie(cookie.clone())
                .json(&entry_body(&format!("Entry {i}")))
                .await
                .json::<Value>();
            trans_ids.push(entry["trans_id"].as_i64());
        }

        assert_eq!(trans_ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_get_distinct_sequential_trans_ids() {
        const ENTRY_COUNT: i64 = 40;
        let state = get_test_app_state();
        let test_server =
            TestServer::new(build_router(state.clone())).expect("Could not create test server.");
        let cookie = log_in(&test_server).await.stripped().to_string();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind test listener.");
        let url = format!("http://{}{}", listener.local_addr().unwrap(), endpoints::JOURNAL);
        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..ENTRY_COUNT {
            let request = client
                .post(&url)
                .header(COOKIE, &cookie)
                .json(&entry_body(&format!("Entry {i}")));
            tasks.spawn(async move {
                let response = request.send().await.unwrap();
                assert_eq!(response.status(), StatusCode::CREATED);
                response.json::<Value>().await.unwrap()["trans_id"].as_i64()
            });
        }

        let mut trans_ids = tasks
            .join_all()
            .await
            .into_iter()
            .collect::<Option<Vec<i64>>>()
            .unwrap();
        trans_ids.sort_unstable();

        assert_eq!(trans_ids, (1..=ENTRY_COUNT).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn client_trans_id_is_ignored() {
        let server = get_test_server();
        let cookie = log_in(&server).await;
        let mut body = entry_body("Sneaky");
        body["trans_id"] = json!(99);

        let response = server
            .post(endpoints::JOURNAL)
            .add_cookie(cookie)
            .json(&body)
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["trans_id"], 1);
    }

    #[tokio::test]
    async fn entry_without_lines_is_bad_request() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::JOURNAL)
            .add_cookie(cookie)
            .json(&json!({"date": "2025-05-20", "description": "Empty", "lines": []}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "validation failed",
            "fields": [{"field": "lines", "message": "must have at least one line"}],
        }));
    }

    #[tokio::test]
    async fn requires_session() {
        let server = get_test_server();

        let response = server
            .post(endpoints::JOURNAL)
            .json(&entry_body("May rent"))
            .await;

        response.assert_status_unauthorized();
    }
}
