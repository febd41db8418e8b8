use tokio::sync::watch;

use crate::{
    foundation::error::{PlaqueError, PlaqueResult},
    layout::engine::LayoutVariant,
};

/// Locale used until something dispatches [`Action::SetLocale`].
pub const DEFAULT_LOCALE: &str = "en";

/// Session-wide UI state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppState {
    pub is_document_ready: bool,
    pub show_preview: bool,
    pub selected_variant: Option<LayoutVariant>,
    pub locale: String,
    pub is_busy: bool,
    pub busy_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            is_document_ready: false,
            show_preview: false,
            selected_variant: None,
            locale: DEFAULT_LOCALE.to_string(),
            is_busy: false,
            busy_message: String::new(),
        }
    }
}

/// State transitions. Serialized as `{"type": "SET_BUSY", "payload": true}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetDocumentReady(bool),
    SetShowPreview(bool),
    SetSelectedVariant(Option<LayoutVariant>),
    SetLocale(String),
    SetBusy(bool),
    SetBusyMessage(String),
    /// Back to defaults, keeping the locale.
    Reset,
    /// Any type this build does not know. Reduces to the unchanged state.
    #[serde(other)]
    Unknown,
}

/// Pure reducer.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::SetDocumentReady(v) => next.is_document_ready = v,
        Action::SetShowPreview(v) => next.show_preview = v,
        Action::SetSelectedVariant(v) => next.selected_variant = v,
        Action::SetLocale(code) => next.locale = code,
        Action::SetBusy(v) => next.is_busy = v,
        Action::SetBusyMessage(msg) => next.busy_message = msg,
        Action::Reset => {
            next = AppState {
                locale: state.locale.clone(),
                ..AppState::default()
            }
        }
        Action::Unknown => {}
    }
    next
}

/// Single-writer state container; readers subscribe instead of polling.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<AppState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Apply `action` and return the resulting state. Subscribers are only woken on change.
    pub fn dispatch(&self, action: Action) -> AppState {
        tracing::trace!(?action, "dispatch");
        let mut out = None;
        self.tx.send_if_modified(|cur| {
            let next = reduce(cur, action);
            let changed = next != *cur;
            *cur = next.clone();
            out = Some(next);
            changed
        });
        out.unwrap_or_else(|| self.state())
    }

    /// Decode a serialized action and dispatch it.
    pub fn dispatch_json(&self, raw: &str) -> PlaqueResult<AppState> {
        let action: Action = serde_json::from_str(raw)
            .map_err(|e| PlaqueError::validation(format!("malformed action: {e}")))?;
        Ok(self.dispatch(action))
    }

    pub fn state(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Reader handle. Dropping it detaches the reader; later updates are simply not delivered.
#[derive(Debug)]
pub struct StateSubscription {
    rx: watch::Receiver<AppState>,
}

impl StateSubscription {
    pub fn current(&self) -> AppState {
        self.rx.borrow().clone()
    }

    /// The latest state if it changed since the last look, without waiting.
    pub fn take_changed(&mut self) -> Option<AppState> {
        if self.rx.has_changed().ok()? {
            Some(self.rx.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<AppState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until `pred` holds, checking the current state first.
    pub async fn wait_for(&mut self, pred: impl FnMut(&AppState) -> bool) -> Option<AppState> {
        self.rx.wait_for(pred).await.ok().map(|s| s.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
