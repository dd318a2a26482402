use std::sync::Arc;

use tokio::sync::watch;

use crate::controller::loader::switch_to_latest;
use crate::controller::submit::{DispatchGuard, SubmitFailure, SubmitOutcome, SubmitState};
use crate::controller::FormResource;
use crate::errors::{ControllerError, NavigationError, ServiceError};
use crate::forms::FormGroup;
use crate::navigation::{self, FormRoute, Mode, Navigator, ParamMap};
use crate::notify::{Notifier, ERROR_MESSAGE, LOAD_FAILURE_MESSAGE, SUCCESS_MESSAGE};
use crate::services::{ResourceService, ServiceResult};

/// Side-effect capabilities shared by every form on a page.
#[derive(Clone)]
pub struct FormContext {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl FormContext {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            notifier,
            navigator,
        }
    }
}

/// Create/edit form for one record of type `R`.
pub struct ResourceForm<R: FormResource> {
    route: FormRoute,
    mode: Mode,
    form: FormGroup,
    resource: R,
    state: SubmitState,
    server_error_messages: Option<Vec<String>>,
    service: Arc<dyn ResourceService<R>>,
    context: FormContext,
}

impl<R: FormResource> ResourceForm<R> {
    /// Resolves the mode from `route` and builds an empty form.
    pub fn new(route: FormRoute, service: Arc<dyn ResourceService<R>>, context: FormContext) -> Self {
        let mode = route.mode();
        tracing::debug!(route = %route.path(), ?mode, "building {} form", R::COLLECTION);
        Self {
            mode,
            form: FormGroup::new(R::build_schema()),
            resource: R::default(),
            state: SubmitState::Idle,
            server_error_messages: None,
            route,
            service,
            context,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn route(&self) -> &FormRoute {
        &self.route
    }

    pub fn form(&self) -> &FormGroup {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormGroup {
        &mut self.form
    }

    /// Last record loaded from the backend (default in create mode).
    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.form.is_valid()
    }

    pub fn server_error_messages(&self) -> Option<&[String]> {
        self.server_error_messages.as_deref()
    }

    pub fn page_title(&self) -> String {
        match self.mode {
            Mode::Create => R::NEW_TITLE.to_string(),
            Mode::Edit => format!("{}{}", R::EDIT_TITLE_PREFIX, self.resource.name()),
        }
    }

    /// Loads the record named by the route's own parameters.
    pub async fn init(&mut self) -> Result<(), ControllerError> {
        let (sender, params) = self.route.param_channel();
        drop(sender);
        self.load(params).await
    }

    /// Loads the record for each parameter value received on `params`, keeping
    /// only the newest fetch. Does nothing in create mode. A failed fetch
    /// raises an alert and ends loading.
    pub async fn load(&mut self, params: watch::Receiver<ParamMap>) -> Result<(), ControllerError> {
        if self.mode == Mode::Create {
            return Ok(());
        }

        let service = Arc::clone(&self.service);
        let fetch = move |params: ParamMap| {
            let service = Arc::clone(&service);
            let id = params.get("id").cloned().unwrap_or_default();
            async move {
                let result = service.get_by_id(&id).await;
                (id, result)
            }
        };

        switch_to_latest(params, fetch, |(id, result): (String, ServiceResult<R>)| {
            self.apply_loaded(&id, result)
        })
        .await
    }

    fn apply_loaded(&mut self, id: &str, result: ServiceResult<R>) -> Result<(), ControllerError> {
        match result {
            Ok(resource) => {
                self.form.patch_from(&resource)?;
                self.resource = resource;
                tracing::debug!(collection = R::COLLECTION, id, "record loaded into form");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(collection = R::COLLECTION, id, error = %err, "record load failed");
                self.context.notifier.alert(LOAD_FAILURE_MESSAGE);
                Err(ControllerError::Load(err))
            }
        }
    }

    /// Validates, then creates or updates the record depending on the mode.
    ///
    /// Taking `&mut self` rules out overlapping submits. Cancelling the
    /// returned future mid-dispatch leaves the previous state in place.
    pub async fn submit(&mut self) -> Result<SubmitOutcome<R>, ControllerError> {
        if let Err(errors) = self.form.validate() {
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let resource: R = self.form.overlay()?;
        let service = Arc::clone(&self.service);
        let result = {
            let _dispatching = DispatchGuard::enter(&mut self.state);
            match self.mode {
                Mode::Create => service.create(resource).await,
                Mode::Edit => service.update(resource).await,
            }
        };

        match result {
            Ok(saved) => self.actions_for_success(saved).await,
            Err(err) => Ok(self.actions_for_error(err)),
        }
    }

    async fn actions_for_success(&mut self, saved: R) -> Result<SubmitOutcome<R>, ControllerError> {
        self.state = SubmitState::Succeeded;
        self.server_error_messages = None;
        self.context.notifier.success(SUCCESS_MESSAGE);

        let id = saved.id().ok_or_else(|| {
            NavigationError::InvalidRoute(format!("{}/<unsaved>/edit", R::COLLECTION))
        })?;
        tracing::info!(path = %navigation::edit_path(R::COLLECTION, id), "record saved");
        navigation::reload_into_edit(self.context.navigator.as_ref(), R::COLLECTION, id).await?;
        Ok(SubmitOutcome::Saved(saved))
    }

    fn actions_for_error(&mut self, err: ServiceError) -> SubmitOutcome<R> {
        self.context.notifier.error(ERROR_MESSAGE);
        self.state = SubmitState::Failed;

        let failure = SubmitFailure::classify(&err);
        tracing::warn!(collection = R::COLLECTION, error = %err, ?failure, "submit failed");
        self.server_error_messages = Some(failure.messages());
        SubmitOutcome::Failed(failure)
    }
}
