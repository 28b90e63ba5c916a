//! Shared online score board: fetched and submitted in the background, best effort.

use http_body_util::{BodyExt, Empty};
use hyper::Uri;
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

const SCORES_PATH: &str = "/tetrisscore";
const SUBMIT_PATH: &str = "/tetris";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid score service url: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),
    #[error("score service request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("reading score service response failed: {0}")]
    Body(#[from] hyper::Error),
    #[error("score service answered {0}")]
    Status(hyper::StatusCode),
    #[error("malformed score board: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Player name to best score, as published by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    scores: HashMap<String, i64>,
}

impl ScoreBoard {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.scores.get(name).copied()
    }

    /// Entries ordered by score, highest first; equal scores by name.
    pub fn ranking(&self) -> Vec<(&str, i64)> {
        let mut entries: Vec<_> = self
            .scores
            .iter()
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ScoreBoard {
    fn from_iter<T: IntoIterator<Item = (S, i64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }
}

/// Remote score store.
pub trait ScoreService: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<ScoreBoard, RemoteError>> + Send;
    fn submit(
        &self,
        user: &str,
        score: u32,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Plain HTTP/1 GET client for the score service.
#[derive(Debug, Clone)]
pub struct HttpScoreService {
    client: Client<HttpConnector, Empty<Bytes>>,
    base_url: String,
}

impl HttpScoreService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn uri(&self, path_and_query: &str) -> Result<Uri, RemoteError> {
        Ok(format!("{}{}", self.base_url, path_and_query).parse()?)
    }
}

impl ScoreService for HttpScoreService {
    async fn fetch(&self) -> Result<ScoreBoard, RemoteError> {
        let response = self.client.get(self.uri(SCORES_PATH)?).await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let body = response.into_body().collect().await?.to_bytes();
        Ok(ScoreBoard::from_json(&body)?)
    }

    async fn submit(&self, user: &str, score: u32) -> Result<(), RemoteError> {
        let query = format!(
            "{SUBMIT_PATH}?user={}&score={score}",
            encode_query_value(user)
        );
        // The body is never read; only transport failures count.
        self.client.get(self.uri(&query)?).await?;
        Ok(())
    }
}

/// Everything outside the RFC 3986 unreserved set.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Background worker around a [`ScoreService`].
///
/// Requests run as detached tasks on an owned runtime; the game loop never
/// waits on them. Each successful fetch is sent back whole and swapped in by
/// [`Leaderboard::poll`], so readers only ever see a complete board. Failures
/// are dropped and the previous board stays.
pub struct Leaderboard<S: ScoreService> {
    runtime: Runtime,
    service: Arc<S>,
    settle: Duration,
    updates_tx: mpsc::UnboundedSender<ScoreBoard>,
    updates_rx: mpsc::UnboundedReceiver<ScoreBoard>,
    board: ScoreBoard,
}

impl<S: ScoreService> Leaderboard<S> {
    /// `settle` is how long to wait after a submission before re-fetching.
    pub fn new(service: S, settle: Duration) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            service: Arc::new(service),
            settle,
            updates_tx,
            updates_rx,
            board: ScoreBoard::default(),
        })
    }

    /// Latest complete board (empty until the first fetch lands).
    pub const fn board(&self) -> &ScoreBoard {
        &self.board
    }

    /// Swap in the newest board delivered since the last call. Returns whether it changed.
    pub fn poll(&mut self) -> bool {
        let mut latest = None;
        while let Ok(board) = self.updates_rx.try_recv() {
            latest = Some(board);
        }
        match latest {
            Some(board) => {
                self.board = board;
                true
            }
            None => false,
        }
    }

    /// Fetch the board in the background.
    pub fn refresh(&self) {
        let service = Arc::clone(&self.service);
        let tx = self.updates_tx.clone();
        self.runtime.spawn(async move {
            if let Ok(board) = service.fetch().await {
                let _ = tx.send(board);
            }
        });
    }

    /// Record a score in the background, then re-fetch after the settle delay.
    /// Nothing is re-fetched if the submission fails.
    pub fn submit(&self, user: &str, score: u32) {
        let service = Arc::clone(&self.service);
        let tx = self.updates_tx.clone();
        let user = user.to_string();
        let settle = self.settle;
        self.runtime.spawn(async move {
            if service.submit(&user, score).await.is_err() {
                return;
            }
            tokio::time::sleep(settle).await;
            if let Ok(board) = service.fetch().await {
                let _ = tx.send(board);
            }
        });
    }
}
