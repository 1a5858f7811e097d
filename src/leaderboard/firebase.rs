//! Firebase Realtime Database client (REST)
//!
//! Records live under `{db}/scores`. Pushes use the server timestamp
//! placeholder; reads ask for the highest scores and sort them locally, since
//! the REST API returns an unordered JSON object.

use serde_json::{Map, Value, json};

use super::{LeaderboardError, ScoreRecord};

pub fn scores_url(db_url: &str) -> String {
    format!("{}/scores.json", db_url.trim_end_matches('/'))
}

/// Top-`limit` query by score
pub fn top_query_url(db_url: &str, limit: usize) -> String {
    format!(
        "{}?orderBy=%22score%22&limitToLast={}",
        scores_url(db_url),
        limit
    )
}

/// Body for a new record; the server fills in `timestamp`
pub fn push_body(name: &str, score: u64) -> Value {
    json!({
        "name": name,
        "score": score,
        "timestamp": { ".sv": "timestamp" },
    })
}

/// Decode a `/scores` snapshot into records, lowest score first.
/// Children that aren't score records are skipped.
pub fn parse_scores_snapshot(body: &str) -> Result<Vec<ScoreRecord>, LeaderboardError> {
    let children: Option<Map<String, Value>> = serde_json::from_str(body)?;
    let Some(children) = children else {
        return Ok(Vec::new());
    };

    // Keys are push ids, chronological, so ties keep submission order
    let mut records: Vec<ScoreRecord> = children
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed score {}: {}", key, e);
                None
            }
        })
        .collect();
    records.sort_by_key(|r| r.score);
    Ok(records)
}

#[cfg(target_arch = "wasm32")]
mod client {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::super::{Leaderboard, LeaderboardError, ScoreRecord};
    use super::{parse_scores_snapshot, push_body, scores_url, top_query_url};

    /// Leaderboard backed by a Firebase Realtime Database
    #[derive(Debug, Clone)]
    pub struct FirebaseLeaderboard {
        db_url: Option<String>,
    }

    impl FirebaseLeaderboard {
        /// Without a database URL every call fails with `NotConfigured`
        pub fn new(db_url: Option<String>) -> Self {
            Self { db_url }
        }

        fn db_url(&self) -> Result<&str, LeaderboardError> {
            self.db_url.as_deref().ok_or(LeaderboardError::NotConfigured)
        }
    }

    fn transport(e: JsValue) -> LeaderboardError {
        LeaderboardError::Transport(format!("{:?}", e))
    }

    /// Send a request and return the response body
    async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, LeaderboardError> {
        let window = web_sys::window()
            .ok_or_else(|| LeaderboardError::Transport("no window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(transport)?;
        }

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let resp: Response = resp_value.dyn_into().map_err(transport)?;
        if !resp.ok() {
            return Err(LeaderboardError::Status(resp.status()));
        }

        let text = JsFuture::from(resp.text().map_err(transport)?)
            .await
            .map_err(transport)?;
        Ok(text.as_string().unwrap_or_default())
    }

    impl Leaderboard for FirebaseLeaderboard {
        async fn push(&self, name: &str, score: u64) -> Result<(), LeaderboardError> {
            let body = push_body(name, score).to_string();
            send("POST", &scores_url(self.db_url()?), Some(body)).await?;
            Ok(())
        }

        async fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
            let body = send("GET", &top_query_url(self.db_url()?, limit), None).await?;
            let mut records = parse_scores_snapshot(&body)?;
            // Server already limits; keep the guarantee if it doesn't
            let skip = records.len().saturating_sub(limit);
            Ok(records.split_off(skip))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use client::FirebaseLeaderboard;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            scores_url("https://demo.firebaseio.com/"),
            "https://demo.firebaseio.com/scores.json"
        );
        assert_eq!(
            top_query_url("https://demo.firebaseio.com", 10),
            "https://demo.firebaseio.com/scores.json?orderBy=%22score%22&limitToLast=10"
        );
    }

    #[test]
    fn test_push_body_uses_server_timestamp() {
        let body = push_body("ann", 120);
        assert_eq!(body["name"], "ann");
        assert_eq!(body["score"], 120);
        assert_eq!(body["timestamp"][".sv"], "timestamp");
    }

    #[test]
    fn test_null_snapshot_is_empty() {
        assert!(parse_scores_snapshot("null").unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_sorted_ascending() {
        let body = r#"{
            "-Nb": {"name": "bob", "score": 90, "timestamp": 1700000000500},
            "-Na": {"name": "ann", "score": 30, "timestamp": 1700000000000},
            "-Nc": {"name": "cat", "score": 50}
        }"#;
        let records = parse_scores_snapshot(body).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ann", "cat", "bob"]);
        assert_eq!(records[0].timestamp, 1_700_000_000_000.0);
        assert_eq!(records[1].timestamp, 0.0);
    }

    #[test]
    fn test_malformed_children_skipped() {
        let body = r#"{"-Na": {"name": "ann", "score": 30}, "-Nb": "junk"}"#;
        let records = parse_scores_snapshot(body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_non_object_body_is_decode_error() {
        assert!(matches!(
            parse_scores_snapshot("[1,2"),
            Err(LeaderboardError::Decode(_))
        ));
    }
}
