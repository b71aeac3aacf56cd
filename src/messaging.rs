// WHY: Two one-way channels cross the component boundary: commands coming in
// from a toolbar, and open-search requests going out to a tab dispatcher

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Command sent by an external trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    ScanPage,
    ClearHighlights,
}

impl Command {
    /// Parse a JSON command; unknown or malformed messages yield `None`
    pub fn parse(message: &str) -> Option<Self> {
        serde_json::from_str(message).ok()
    }
}

/// Reply to a `Command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Scanned { count: usize },
    Cleared,
}

/// Toolbar text for a command reply; `None` means the page never answered
pub fn status_line(response: Option<&Response>) -> String {
    match response {
        Some(Response::Scanned { count }) => {
            format!("Scan complete — flagged {count} sentence(s).")
        }
        Some(Response::Cleared) => "Highlights cleared.".to_string(),
        None => "Extension not active on this page (content script not loaded).".to_string(),
    }
}

/// Request for the dispatcher to open a new top-level browsing context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SearchRequest {
    OpenSearch { url: String },
}

/// Best-effort acknowledgment of a `SearchRequest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

struct Envelope {
    request: SearchRequest,
    ack: oneshot::Sender<Ack>,
}

/// Sending half held by the annotator
#[derive(Clone)]
pub struct SearchChannel {
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Receiving half consumed by a `SearchDispatcher`
pub struct SearchInbox {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl SearchChannel {
    pub fn new() -> (Self, SearchInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, SearchInbox { rx })
    }

    /// Send without waiting; the returned receiver may be dropped.
    ///
    /// Returns `None` when the dispatcher is gone.
    pub fn send(&self, request: SearchRequest) -> Option<oneshot::Receiver<Ack>> {
        let (ack, ack_rx) = oneshot::channel();
        match self.tx.send(Envelope { request, ack }) {
            Ok(()) => Some(ack_rx),
            Err(_) => {
                warn!("Search dispatcher is not running; request dropped");
                None
            }
        }
    }
}

/// Opens tabs on behalf of the dispatcher
pub trait TabOpener: Send {
    fn open_tab(&mut self, url: &str) -> Result<()>;
}

/// Opener that only records the navigation in the log
#[derive(Debug, Default)]
pub struct LoggingOpener;

impl TabOpener for LoggingOpener {
    fn open_tab(&mut self, url: &str) -> Result<()> {
        info!(url, "Open search tab");
        Ok(())
    }
}

/// Serves `SearchRequest`s until every `SearchChannel` is dropped
pub struct SearchDispatcher<O: TabOpener> {
    inbox: SearchInbox,
    opener: O,
}

impl<O: TabOpener> SearchDispatcher<O> {
    pub fn new(inbox: SearchInbox, opener: O) -> Self {
        Self { inbox, opener }
    }

    /// Run the dispatch loop, returning the number of tabs requested
    pub async fn run(mut self) -> usize {
        let mut served = 0;

        while let Some(Envelope { request, ack }) = self.inbox.rx.recv().await {
            let SearchRequest::OpenSearch { url } = request;
            if url.is_empty() {
                debug!("Ignoring open-search request without url");
                continue;
            }

            let ok = match self.opener.open_tab(&url) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to open search tab {}: {:#}", url, e);
                    false
                }
            };
            served += 1;
            // Sender may have dropped its receiver; acks are best effort
            let _ = ack.send(Ack { ok });
        }

        debug!("Search dispatcher stopped after {} requests", served);
        served
    }
}
