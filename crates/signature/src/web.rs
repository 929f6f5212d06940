//! Browser adapters, compiled with the `web` feature.
//!
//! Each adapter checks for its browser capability on every call, so a build
//! running outside a page degrades to no-ops instead of failing.

use std::cell::RefCell;

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use settings::{SnapshotStore, StoreError, StoreKind};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, DomException, HtmlDocument, HtmlElement, Storage};

use crate::clipboard::{ClipboardPayload, ClipboardStrategy, CopyError, SelectionHost};
use crate::url_state::{LocationError, LocationHost};

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| err.dyn_ref::<DomException>().map(|e| e.message()))
        .unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable(StoreKind::Browser))
    }
}

fn storage_error(err: JsValue, needed: usize) -> StoreError {
    match err.dyn_ref::<DomException>() {
        Some(ex) if ex.name() == "QuotaExceededError" => StoreError::QuotaExceeded { needed },
        _ => StoreError::Other(describe(&err)),
    }
}

impl SnapshotStore for LocalStorage {
    fn kind(&self) -> StoreKind {
        StoreKind::Browser
    }

    fn is_available(&self) -> bool {
        self.storage().is_ok()
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Other(describe(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| storage_error(e, key.len() + value.len()))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Other(describe(&e)))
    }
}

/// `window.location` plus `history.replaceState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

impl LocationHost for BrowserLocation {
    fn is_available(&self) -> bool {
        web_sys::window().is_some()
    }

    fn path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn query(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .map(|s| s.trim_start_matches('?').to_string())
            .unwrap_or_default()
    }

    fn replace(&mut self, url: &str) -> Result<(), LocationError> {
        let window = web_sys::window().ok_or(LocationError::Unavailable)?;
        let history = window
            .history()
            .map_err(|e| LocationError::Rejected(describe(&e)))?;
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|e| LocationError::Rejected(describe(&e)))
    }
}

/// `navigator.clipboard.write` with a two-type `ClipboardItem`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncClipboard;

impl AsyncClipboard {
    fn blob(content: &str, mime: &str) -> Result<Blob, JsValue> {
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        Blob::new_with_str_sequence_and_options(&Array::of1(&JsValue::from_str(content)), &options)
    }

    async fn write_item(payload: &ClipboardPayload) -> Result<(), CopyError> {
        let window = web_sys::window().ok_or(CopyError::NotAvailable)?;
        let clipboard = Reflect::get(&window.navigator(), &"clipboard".into())
            .ok()
            .filter(|c| !c.is_undefined())
            .ok_or(CopyError::NotAvailable)?;
        let write = Reflect::get(&clipboard, &"write".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(CopyError::NotAvailable)?;
        let item_ctor = Reflect::get(&window, &"ClipboardItem".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(CopyError::NotAvailable)?;

        let failed = |e: JsValue| CopyError::CommandFailed(describe(&e));
        let parts = Object::new();
        Reflect::set(&parts, &"text/html".into(), &Self::blob(&payload.html, "text/html").map_err(failed)?)
            .map_err(failed)?;
        Reflect::set(&parts, &"text/plain".into(), &Self::blob(&payload.plain, "text/plain").map_err(failed)?)
            .map_err(failed)?;

        let item = Reflect::construct(&item_ctor, &Array::of1(&parts)).map_err(failed)?;
        let promise: Promise = write
            .call1(&clipboard, &Array::of1(&item))
            .and_then(|p| p.dyn_into::<Promise>())
            .map_err(failed)?;
        JsFuture::from(promise).await.map(|_| ()).map_err(failed)
    }
}

#[async_trait(?Send)]
impl ClipboardStrategy for AsyncClipboard {
    fn name(&self) -> &'static str {
        "async-clipboard"
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), CopyError> {
        Self::write_item(payload).await
    }
}

/// Off-screen `div`, a `Range` over it and `document.execCommand("copy")`.
#[derive(Debug, Default)]
pub struct DomSelectionHost {
    container: RefCell<Option<HtmlElement>>,
}

impl DomSelectionHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn document() -> Result<web_sys::Document, CopyError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or(CopyError::NotAvailable)
    }
}

fn dom_error(err: JsValue) -> CopyError {
    CopyError::CommandFailed(describe(&err))
}

impl SelectionHost for DomSelectionHost {
    fn is_available(&self) -> bool {
        Self::document().is_ok_and(|d| d.body().is_some())
    }

    fn mount(&self, html: &str) -> Result<(), CopyError> {
        let document = Self::document()?;
        let body = document.body().ok_or(CopyError::NotAvailable)?;
        let container: HtmlElement = document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into()
            .map_err(|_| CopyError::CommandFailed("container is not an element".into()))?;

        let style = container.style();
        style.set_property("position", "fixed").map_err(dom_error)?;
        style.set_property("left", "-9999px").map_err(dom_error)?;
        container.set_text_content(None);
        container.set_inner_html(html);

        body.append_child(&container).map_err(dom_error)?;
        *self.container.borrow_mut() = Some(container);
        Ok(())
    }

    fn select_contents(&self) -> Result<(), CopyError> {
        let document = Self::document()?;
        let container = self.container.borrow();
        let container = container.as_ref().ok_or(CopyError::NotAvailable)?;

        let range = document.create_range().map_err(dom_error)?;
        range.select_node_contents(container).map_err(dom_error)?;

        let selection = web_sys::window()
            .and_then(|w| w.get_selection().ok().flatten())
            .ok_or(CopyError::NotAvailable)?;
        selection.remove_all_ranges().map_err(dom_error)?;
        selection.add_range(&range).map_err(dom_error)
    }

    fn exec_copy(&self) -> Result<(), CopyError> {
        let document: HtmlDocument = Self::document()?
            .dyn_into()
            .map_err(|_| CopyError::NotAvailable)?;
        match document.exec_command("copy").map_err(dom_error)? {
            true => Ok(()),
            false => Err(CopyError::CommandFailed("copy command was rejected".into())),
        }
    }

    fn clear_selection(&self) {
        if let Some(selection) = web_sys::window().and_then(|w| w.get_selection().ok().flatten()) {
            let _ = selection.remove_all_ranges();
        }
    }

    fn unmount(&self) {
        if let Some(container) = self.container.borrow_mut().take() {
            container.remove();
        }
    }
}
