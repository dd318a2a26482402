//! Option lists fetched once for selection controls.

use std::sync::Arc;

use crate::domain::{Identifiable, NamedEntity};
use crate::errors::ControllerError;
use crate::services::ResourceService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: i64,
    pub text: String,
}

/// All records of a related collection, as select options.
pub struct ReferenceList<T> {
    service: Arc<dyn ResourceService<T>>,
    options: Vec<SelectOption>,
}

impl<T> ReferenceList<T>
where
    T: Identifiable + NamedEntity + Send + Sync + 'static,
{
    pub fn new(service: Arc<dyn ResourceService<T>>) -> Self {
        Self {
            service,
            options: Vec::new(),
        }
    }

    /// Fetches the full list. On failure the options stay empty and the
    /// error is returned to the caller; nothing is shown to the user.
    pub async fn load(&mut self) -> Result<(), ControllerError> {
        match self.service.get_all().await {
            Ok(records) => {
                self.options = records
                    .iter()
                    .filter_map(|record| {
                        record.id().map(|id| SelectOption {
                            value: id,
                            text: record.name().to_string(),
                        })
                    })
                    .collect();
                tracing::debug!(count = self.options.len(), "reference options loaded");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "reference options unavailable");
                Err(ControllerError::ReferenceData(err))
            }
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn text_for(&self, value: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.text.as_str())
    }
}
