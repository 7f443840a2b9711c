use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{multipart, Client, StatusCode};
use serde_json::Value;
use shared::{domain::StatusSnapshot, protocol::server_error_message};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

mod render;

pub use render::{
    StatusBoard, UploadBanner, UploadPhase, GENERIC_UPLOAD_ERROR, NO_ACTIVE_ENTRY,
    NO_UPCOMING_ENTRY, PENDING_TEXT, READ_ERROR, SUCCESS_TEXT,
};

/// A schedule file picked by the user, ready to upload.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshSignal;

/// Handle the upload side uses to ask the poller for an immediate refresh,
/// bypassing its timer.
#[derive(Clone)]
pub struct RefreshHandle(mpsc::UnboundedSender<RefreshSignal>);

impl RefreshHandle {
    pub fn request_refresh(&self) {
        let _ = self.0.send(RefreshSignal);
    }
}

pub fn refresh_channel() -> (RefreshHandle, mpsc::UnboundedReceiver<RefreshSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RefreshHandle(tx), rx)
}

/// Where rendered state goes after every update. The two components own
/// disjoint surfaces, so a sink never observes a torn update.
pub trait BoardSink: Send + Sync {
    fn board_updated(&self, board: &StatusBoard);
    fn banner_updated(&self, banner: &UploadBanner);
}

impl<T: BoardSink + ?Sized> BoardSink for std::sync::Arc<T> {
    fn board_updated(&self, board: &StatusBoard) {
        (**self).board_updated(board);
    }

    fn banner_updated(&self, banner: &UploadBanner) {
        (**self).banner_updated(banner);
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("status request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status endpoint returned {status}")]
    Failed { status: StatusCode },
    #[error("malformed status payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("server rejected upload: {message}")]
    Rejected { message: String },
    #[error("upload failed with status {status}")]
    Failed { status: StatusCode },
    #[error("upload response was not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UploadError {
    /// Banner text for a failed upload. Only a parsed server rejection is
    /// shown verbatim; every other failure collapses to the generic message.
    fn banner_message(&self) -> &str {
        match self {
            UploadError::Rejected { message } => message,
            _ => GENERIC_UPLOAD_ERROR,
        }
    }
}

/// HTTP transport for the schedule endpoints: status fetch, multipart
/// schedule upload, and the download the server exposes next to them.
#[derive(Clone)]
pub struct BoardClient {
    http: Client,
    base_url: String,
}

impl BoardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).with_context(|| format!("invalid server url '{base_url}'"))?;
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
        let response = self
            .http
            .get(format!("{}/status", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Failed { status });
        }
        serde_json::from_slice(&body).map_err(FetchError::Malformed)
    }

    /// Sends the file as a single multipart part named `file`. Success means
    /// a 2xx status and a body that parses as JSON; the body is not
    /// inspected beyond that.
    pub async fn upload_schedule(&self, file: SelectedFile) -> Result<(), UploadError> {
        let part = multipart::Part::bytes(file.bytes).file_name(file.name);
        let form = multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            serde_json::from_slice::<Value>(&body).map_err(UploadError::Malformed)?;
            return Ok(());
        }
        match server_error_message(&body) {
            Some(message) => Err(UploadError::Rejected { message }),
            None => Err(UploadError::Failed { status }),
        }
    }

    /// Fetches the schedule file currently held by the server.
    pub async fn download_schedule(&self) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(format!("{}/download", self.base_url))
            .send()
            .await
            .context("download request failed")?;
        let status = response.status();
        let body = response.bytes().await.context("download request failed")?;
        if !status.is_success() {
            return Err(match server_error_message(&body) {
                Some(message) => anyhow!("server refused download: {message}"),
                None => anyhow!("download failed with status {status}"),
            });
        }
        Ok(body.to_vec())
    }
}

/// Owns the board surface; every `refresh` replaces it wholesale.
pub struct StatusPoller<S: BoardSink> {
    client: BoardClient,
    board: StatusBoard,
    sink: S,
}

impl<S: BoardSink> StatusPoller<S> {
    pub fn new(client: BoardClient, sink: S) -> Self {
        Self {
            client,
            board: StatusBoard::default(),
            sink,
        }
    }

    /// Fetches one snapshot and re-renders both slots and the indicator.
    /// Idempotent; any failure blanks the whole surface rather than leaving
    /// one slot stale.
    pub async fn refresh(&mut self) {
        match self.client.fetch_status().await {
            Ok(snapshot) => {
                debug!(
                    current = snapshot.current.is_some(),
                    next = snapshot.next.is_some(),
                    "status refreshed"
                );
                self.board.render_snapshot(&snapshot);
            }
            Err(err) => {
                warn!(error = %err, "status refresh failed");
                self.board.render_failure();
            }
        }
        self.sink.board_updated(&self.board);
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }
}

/// Owns the banner surface and the upload lifecycle: one request per
/// submitted file, banner pending before the request, finalized to success
/// or error when it resolves.
pub struct UploadController<S: BoardSink> {
    client: BoardClient,
    banner: UploadBanner,
    refresh: RefreshHandle,
    sink: S,
}

impl<S: BoardSink> UploadController<S> {
    pub fn new(client: BoardClient, refresh: RefreshHandle, sink: S) -> Self {
        Self {
            client,
            banner: UploadBanner::default(),
            refresh,
            sink,
        }
    }

    /// Uploads the given file, if any. `None` (cancelled picker, empty drop)
    /// is a no-op: no request, banner untouched. A successful upload also
    /// asks the poller for an immediate refresh. Failures are terminal, no
    /// retry.
    pub async fn submit_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            return;
        };

        self.banner.set_pending();
        self.sink.banner_updated(&self.banner);

        match self.client.upload_schedule(file).await {
            Ok(()) => {
                info!("schedule file replaced");
                self.banner.set_success();
                self.refresh.request_refresh();
            }
            Err(err) => {
                warn!(error = %err, "schedule upload failed");
                self.banner.set_error(err.banner_message());
            }
        }
        self.sink.banner_updated(&self.banner);
    }

    pub fn banner(&self) -> &UploadBanner {
        &self.banner
    }
}

/// Drives the poller: one refresh at startup, then on every tick of the
/// fixed interval or whenever an upload reports success, whichever comes
/// first. Refreshes are serialized by this loop, so a slow response can
/// never overwrite a newer one. Returns once every `RefreshHandle` is gone.
pub async fn run_poll_loop<S: BoardSink>(
    mut poller: StatusPoller<S>,
    mut refresh_rx: mpsc::UnboundedReceiver<RefreshSignal>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poller.refresh().await;
            }
            signal = refresh_rx.recv() => match signal {
                Some(RefreshSignal) => {
                    debug!("out-of-band refresh requested");
                    poller.refresh().await;
                }
                None => {
                    debug!("refresh channel closed, stopping poll loop");
                    return;
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
