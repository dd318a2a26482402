//! Form routes, mode resolution and an in-memory router.
//!
//! Form pages live under `<collection>/new` and `<collection>/<id>/edit`.
//! The first segment after the collection decides the form [`Mode`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::NavigationError;

/// Literal segment that selects the creation form.
pub const NEW_SEGMENT: &str = "new";
pub const EDIT_SEGMENT: &str = "edit";

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit,
}

impl Mode {
    /// `"new"` selects [`Mode::Create`]; anything else is taken as an identifier.
    pub fn resolve(first_segment: &str) -> Self {
        if first_segment == NEW_SEGMENT {
            Mode::Create
        } else {
            Mode::Edit
        }
    }
}

/// Route parameters extracted from a path.
pub type ParamMap = HashMap<String, String>;

/// A parsed form location such as `entries/3/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRoute {
    pub collection: String,
    /// Segments after the collection, e.g. `["3", "edit"]` or `["new"]`.
    pub segments: Vec<String>,
    pub params: ParamMap,
}

impl FormRoute {
    pub fn parse(path: &str) -> Result<Self, NavigationError> {
        let parts: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();

        let mut params = ParamMap::new();
        match parts.as_slice() {
            [_, NEW_SEGMENT] => {}
            [_, id, EDIT_SEGMENT] if *id != NEW_SEGMENT => {
                params.insert("id".to_string(), (*id).to_string());
            }
            _ => return Err(NavigationError::InvalidRoute(path.to_string())),
        }

        Ok(Self {
            collection: parts[0].to_string(),
            segments: parts[1..].iter().map(|part| part.to_string()).collect(),
            params,
        })
    }

    pub fn first_segment(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    pub fn mode(&self) -> Mode {
        Mode::resolve(self.first_segment())
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.segments.join("/"))
    }

    /// Channel yielding this route's parameters; further values may be sent
    /// through the returned sender to emulate a parameter change.
    pub fn param_channel(&self) -> (watch::Sender<ParamMap>, watch::Receiver<ParamMap>) {
        watch::channel(self.params.clone())
    }
}

/// Path of the edit form for a persisted record.
pub fn edit_path(collection: &str, id: i64) -> String {
    format!("{collection}/{id}/{EDIT_SEGMENT}")
}

/// Options accepted by [`Navigator::navigate_by_url`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationExtras {
    /// Change the active location without recording it in history.
    pub skip_location_change: bool,
}

/// Routing capability consumed by form controllers.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_by_url(
        &self,
        url: &str,
        extras: NavigationExtras,
    ) -> Result<bool, NavigationError>;

    async fn navigate(&self, commands: &[String]) -> Result<bool, NavigationError>;
}

/// Leaves the current page and re-enters the edit form of `id`, forcing the
/// form to be rebuilt from the persisted record. The second navigation only
/// starts once the first one has completed.
pub async fn reload_into_edit(
    navigator: &dyn Navigator,
    collection: &str,
    id: i64,
) -> Result<(), NavigationError> {
    navigator
        .navigate_by_url(
            collection,
            NavigationExtras {
                skip_location_change: true,
            },
        )
        .await?;
    navigator
        .navigate(&[
            collection.to_string(),
            id.to_string(),
            EDIT_SEGMENT.to_string(),
        ])
        .await?;
    Ok(())
}

#[derive(Debug, Default)]
struct RouterState {
    current: Option<String>,
    history: Vec<String>,
    visited: Vec<String>,
}

/// In-memory router. `history` holds recorded locations; `visited` holds
/// every activation, including ones that skipped the location change.
#[derive(Debug, Default)]
pub struct Router {
    state: Mutex<RouterState>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_url(&self) -> Option<String> {
        self.lock().current.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn activate(&self, url: String, record: bool) {
        tracing::debug!(%url, record, "navigating");
        let mut state = self.lock();
        state.visited.push(url.clone());
        if record {
            state.history.push(url.clone());
        }
        state.current = Some(url);
    }
}

fn normalize(url: &str) -> Result<String, NavigationError> {
    let trimmed = url.trim().trim_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(str::is_empty) {
        return Err(NavigationError::InvalidRoute(url.to_string()));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl Navigator for Router {
    async fn navigate_by_url(
        &self,
        url: &str,
        extras: NavigationExtras,
    ) -> Result<bool, NavigationError> {
        let url = normalize(url)?;
        self.activate(url, !extras.skip_location_change);
        Ok(true)
    }

    async fn navigate(&self, commands: &[String]) -> Result<bool, NavigationError> {
        let url = normalize(&commands.join("/"))?;
        self.activate(url, true);
        Ok(true)
    }
}
