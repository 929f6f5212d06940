//! Clipboard export.
//!
//! A copy tries an ordered list of strategies and stops at the first success.
//! Rich strategies write HTML and plain text as one entry; the selection
//! fallback mounts the fragment off-screen and runs the host's copy command.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;

use crate::markup::{to_html, to_plain_text};
use crate::render::SignatureModel;

/// Both representations of the signature, written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub html: String,
    pub plain: String,
}

impl ClipboardPayload {
    pub fn new(html: impl Into<String>, plain: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            plain: plain.into(),
        }
    }

    pub fn from_model(model: &SignatureModel) -> Self {
        Self::new(to_html(model), to_plain_text(model))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("no clipboard is available")]
    NotAvailable,
    #[error("copy failed: {0}")]
    CommandFailed(String),
}

impl CopyError {
    /// Short text for a status line.
    pub fn status_message(&self) -> &'static str {
        match self {
            CopyError::NotAvailable => "Copying is not supported here",
            CopyError::CommandFailed(_) => "Could not copy the signature",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    Failed(CopyError),
}

impl CopyStatus {
    pub fn message(&self) -> &'static str {
        match self {
            CopyStatus::Copied => "Signature copied",
            CopyStatus::Failed(err) => err.status_message(),
        }
    }
}

impl From<Result<(), CopyError>> for CopyStatus {
    fn from(result: Result<(), CopyError>) -> Self {
        match result {
            Ok(()) => CopyStatus::Copied,
            Err(err) => CopyStatus::Failed(err),
        }
    }
}

/// One way of getting a payload onto the system clipboard.
#[async_trait(?Send)]
pub trait ClipboardStrategy {
    fn name(&self) -> &'static str;

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), CopyError>;
}

/// Ordered strategy chain.
#[derive(Default)]
pub struct ClipboardExporter {
    strategies: Vec<Box<dyn ClipboardStrategy>>,
}

impl ClipboardExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: impl ClipboardStrategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    pub fn push(&mut self, strategy: impl ClipboardStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Try each strategy in order. Fails with the last error, or
    /// `NotAvailable` when there is nothing to try.
    pub async fn copy(&self, html: &str, plain: &str) -> Result<(), CopyError> {
        let payload = ClipboardPayload::new(html, plain);
        let mut last = CopyError::NotAvailable;
        for strategy in &self.strategies {
            match strategy.write(&payload).await {
                Ok(()) => {
                    tracing::debug!("signature copied via {}", strategy.name());
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!("{} clipboard failed: {err}", strategy.name());
                    last = err;
                }
            }
        }
        Err(last)
    }

    pub async fn copy_model(&self, model: &SignatureModel) -> Result<(), CopyError> {
        let payload = ClipboardPayload::from_model(model);
        self.copy(&payload.html, &payload.plain).await
    }
}

/// Document-level operations the selection fallback needs.
pub trait SelectionHost {
    fn is_available(&self) -> bool {
        true
    }

    /// Attach `html` in a detached, off-screen container.
    fn mount(&self, html: &str) -> Result<(), CopyError>;

    /// Select everything inside the mounted container.
    fn select_contents(&self) -> Result<(), CopyError>;

    /// Run the synchronous copy command on the current selection.
    fn exec_copy(&self) -> Result<(), CopyError>;

    fn clear_selection(&self);

    fn unmount(&self);
}

/// Clears the selection and removes the container when dropped.
struct Mounted<'a, H: SelectionHost>(&'a H);

impl<H: SelectionHost> Drop for Mounted<'_, H> {
    fn drop(&mut self) {
        self.0.clear_selection();
        self.0.unmount();
    }
}

/// Legacy copy through a selected, off-screen copy of the fragment.
pub struct SelectionCopy<H> {
    host: H,
}

impl<H: SelectionHost> SelectionCopy<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn copy_now(&self, html: &str) -> Result<(), CopyError> {
        if !self.host.is_available() {
            return Err(CopyError::NotAvailable);
        }
        self.host.mount(html)?;
        let _mounted = Mounted(&self.host);
        self.host.select_contents()?;
        self.host.exec_copy()
    }
}

#[async_trait(?Send)]
impl<H: SelectionHost> ClipboardStrategy for SelectionCopy<H> {
    fn name(&self) -> &'static str {
        "selection"
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), CopyError> {
        self.copy_now(&payload.html)
    }
}

/// Process-local clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<ClipboardPayload>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<ClipboardPayload> {
        self.contents.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ClipboardStrategy for MemoryClipboard {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), CopyError> {
        *self.contents.borrow_mut() = Some(payload.clone());
        Ok(())
    }
}
