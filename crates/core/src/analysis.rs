//! Remote analysis client.
//!
//! One JSON POST per screenshot. The request runs on its own thread with a
//! current-thread tokio runtime so the UI loop never blocks; the result
//! comes back over a channel as an [`AnalysisOutcome`] tagged with the
//! submission's sequence number. Only the newest submission is applied.

use crate::config::Config;
use crate::error::{AppError, Result};
use chrono::{DateTime, Local};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

/// Header carrying the workflow API key (`X-Workflow-Api-Key`).
pub const API_KEY_HEADER: &str = "x-workflow-api-key";

/// JSON body of an analysis request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub user_name: String,
    pub user_id: String,
    pub file_name: String,
    /// PNG data URL.
    pub data: String,
}

impl AnalysisRequest {
    /// Builds a request for `data`, taking the user from `config`.
    pub fn new(config: &Config, data: String, at: DateTime<Local>) -> Self {
        Self {
            user_name: config.username.clone(),
            user_id: config.user_id.clone(),
            file_name: format!("analysis_{}.png", at.format("%Y%m%d_%H%M%S")),
            data,
        }
    }
}

/// HTTP client bound to one endpoint and key.
#[derive(Clone, Debug)]
pub struct AnalysisClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl AnalysisClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("exam-shot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.trim().to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| AppError::config(format!("API key is not a valid header value: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    /// Builds the POST without sending it.
    pub fn build_request(&self, body: &AnalysisRequest) -> Result<reqwest::Request> {
        let request = self
            .client
            .post(&self.api_url)
            .headers(self.headers()?)
            .json(body)
            .build()?;
        Ok(request)
    }

    /// Sends the request and parses the body as JSON.
    ///
    /// The status code is logged but not judged: error bodies are handed to
    /// the renderer like any other response.
    pub async fn analyze(&self, body: &AnalysisRequest) -> Result<Value> {
        tracing::info!("Sending API request for file: {}", body.file_name);
        let request = self.build_request(body)?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        tracing::info!("API response status: {}", status);

        let text = response.text().await?;
        parse_body(status, &text)
    }
}

/// Interprets a response body. A JSON body is returned whatever the status
/// so the renderer can show it; otherwise a failed status is an API error
/// and a successful one an invalid response.
fn parse_body(status: StatusCode, text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            if !status.is_success() {
                tracing::warn!("API returned {}: {}", status, value);
            }
            Ok(value)
        }
        Err(_) if !status.is_success() => {
            let snippet: String = text.trim().chars().take(200).collect();
            Err(AppError::api(format!("HTTP {}: {}", status, snippet)))
        }
        Err(e) => Err(AppError::InvalidResponse(format!(
            "HTTP {} with non-JSON body: {}",
            status, e
        ))),
    }
}

/// What the background task hands back to the UI.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisOutcome {
    Completed(Value),
    Failed(String),
}

impl From<Result<Value>> for AnalysisOutcome {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => AnalysisOutcome::Completed(value),
            Err(e) => {
                tracing::error!("API request failed: {}", e);
                AnalysisOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Runs analysis jobs in the background and keeps only the latest result.
pub struct AnalysisDispatcher {
    next_seq: u64,
    pending: Option<u64>,
    tx: Sender<(u64, AnalysisOutcome)>,
    rx: Receiver<(u64, AnalysisOutcome)>,
}

impl Default for AnalysisDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            next_seq: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Runs `job` on a new thread and returns its sequence number.
    ///
    /// `waker` is called after the outcome is posted.
    pub fn submit_with<F>(&mut self, job: F, waker: impl Fn() + Send + 'static) -> u64
    where
        F: FnOnce() -> Result<Value> + Send + 'static,
    {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending = Some(seq);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("analysis-{}", seq))
            .spawn(move || {
                let outcome = AnalysisOutcome::from(job());
                if tx.send((seq, outcome)).is_ok() {
                    waker();
                }
            });

        if let Err(e) = spawned {
            let outcome = AnalysisOutcome::Failed(format!("Failed to start analysis task: {}", e));
            let _ = self.tx.send((seq, outcome));
        }
        seq
    }

    /// Sends `request` with `client` on a background runtime.
    pub fn submit(
        &mut self,
        client: AnalysisClient,
        request: AnalysisRequest,
        waker: impl Fn() + Send + 'static,
    ) -> u64 {
        self.submit_with(
            move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(client.analyze(&request))
            },
            waker,
        )
    }

    /// Returns the outcome of the latest submission once it has arrived.
    /// Outcomes of superseded submissions are discarded.
    pub fn drain(&mut self) -> Option<AnalysisOutcome> {
        let mut latest = None;
        while let Ok((seq, outcome)) = self.rx.try_recv() {
            if Some(seq) == self.pending {
                self.pending = None;
                latest = Some(outcome);
            } else {
                tracing::info!("Dropping stale analysis response #{}", seq);
            }
        }
        latest
    }

    /// A submission is still waiting for its outcome.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}
