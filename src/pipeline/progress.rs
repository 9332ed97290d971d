//! Progress notifications for running pipelines.
//!
//! A caller that wants status text while a query runs passes a
//! `ProgressSender`; the pipeline reports each state it enters and its final
//! outcome. Sending never blocks and a dropped receiver is ignored.

use std::fmt;
use tokio::sync::mpsc;

/// Sending half of a progress channel.
pub type ProgressSender = mpsc::UnboundedSender<Progress>;

/// Receiving half of a progress channel.
pub type ProgressReceiver = mpsc::UnboundedReceiver<Progress>;

/// Steps of one invocation, visited strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Connecting,
    Executing,
    ColumnScan,
    RowLoop,
    Completed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Executing => "executing",
            Self::ColumnScan => "column scan",
            Self::RowLoop => "row loop",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A progress notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The invocation has started.
    Working,
    /// The invocation entered a new state.
    State(PipelineState),
    /// Rows decoded so far.
    RowsDecoded(usize),
    /// The invocation succeeded with this many graphics.
    Finished { graphics: usize },
    /// The invocation failed with this message.
    Failed(String),
}

impl Progress {
    /// Returns the status-line text for this notification.
    ///
    /// Successful completion clears the status line.
    pub fn status_text(&self) -> String {
        match self {
            Self::Working => "Working...".to_string(),
            Self::State(state) => format!("Working... ({state})"),
            Self::RowsDecoded(n) => format!("Working... ({n} rows)"),
            Self::Finished { .. } => String::new(),
            Self::Failed(message) => message.clone(),
        }
    }

    /// Returns true for the last notification of an invocation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed(_))
    }
}

/// Optional progress sink used inside one invocation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reporter<'a> {
    sender: Option<&'a ProgressSender>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(sender: Option<&'a ProgressSender>) -> Self {
        Self { sender }
    }

    pub(crate) fn send(&self, progress: Progress) {
        if let Some(sender) = self.sender {
            // The caller may have stopped listening.
            let _ = sender.send(progress);
        }
    }
}
