//! Shell state and command dispatch.

use std::sync::Arc;

use strsim::levenshtein;
use tokio::runtime::{Builder, Runtime};

use crate::cli::{commands, output, CliError, CommandError, LoopControl};
use crate::cli::output::ConsoleNotifier;
use crate::config::{Config, ConfigManager};
use crate::controller::{CategoryForm, EntryFormPage, FormContext, ResourceForm};
use crate::navigation::{FormRoute, NavigationExtras, Navigator, Router};
use crate::services::{CategoryService, EntryService, InMemoryApi, CATEGORIES, ENTRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// The form currently shown by the shell.
pub(crate) enum Page {
    Category(CategoryForm),
    Entry(EntryFormPage),
}

pub(crate) const COMMANDS: [&str; 10] = [
    "help", "list", "open", "set", "fill", "show", "submit", "version", "exit", "quit",
];

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub(crate) config: Config,
    pub(crate) runtime: Runtime,
    pub(crate) categories: Arc<CategoryService>,
    pub(crate) entries: Arc<EntryService>,
    pub(crate) router: Arc<Router>,
    pub(crate) page: Option<Page>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let runtime = Builder::new_current_thread().enable_time().build()?;

        let api = Arc::new(InMemoryApi::seeded().with_delay(config.api_delay()));
        let categories = Arc::new(CategoryService::categories(Arc::clone(&api)));
        let entries = Arc::new(EntryService::new(
            Arc::clone(&api),
            Arc::clone(&categories) as _,
        ));
        tracing::debug!(locale = %config.locale, "shell context ready");

        Ok(Self {
            mode,
            running: true,
            config,
            runtime,
            categories,
            entries,
            router: Arc::new(Router::new()),
            page: None,
        })
    }

    pub fn prompt(&self) -> String {
        match self.router.current_url() {
            Some(url) => format!("finance:{url}> "),
            None => "finance> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.to_vec()
    }

    fn form_context(&self) -> FormContext {
        FormContext::new(Arc::new(ConsoleNotifier), Arc::clone(&self.router) as _)
    }

    /// Navigates to `path` and builds the form page for it.
    pub(crate) fn open(&mut self, path: &str) -> Result<(), CommandError> {
        let route = FormRoute::parse(path)?;
        let router = Arc::clone(&self.router);
        self.runtime
            .block_on(router.navigate_by_url(&route.path(), NavigationExtras::default()))?;
        self.activate(route)
    }

    /// Rebuilds the page for the router's current location, as happens after
    /// a successful submit.
    pub(crate) fn reopen_current(&mut self) -> Result<(), CommandError> {
        let url = self.router.current_url().ok_or(CommandError::NoPage)?;
        let route = FormRoute::parse(&url)?;
        self.activate(route)
    }

    fn activate(&mut self, route: FormRoute) -> Result<(), CommandError> {
        let context = self.form_context();
        let loaded = match route.collection.as_str() {
            CATEGORIES => {
                let mut form: CategoryForm =
                    ResourceForm::new(route, Arc::clone(&self.categories) as _, context);
                let result = self.runtime.block_on(form.init());
                self.page = Some(Page::Category(form));
                result
            }
            ENTRIES => {
                let mut page = EntryFormPage::new(
                    route,
                    Arc::clone(&self.entries) as _,
                    Arc::clone(&self.categories) as _,
                    context,
                );
                let result = self.runtime.block_on(page.init());
                self.page = Some(Page::Entry(page));
                result
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown collection `{other}`. Use `{CATEGORIES}` or `{ENTRIES}`."
                )))
            }
        };
        // The page stays open after a load failure; the alert was already shown.
        loaded?;
        commands::show(self)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let result = match command {
            "help" => commands::help(),
            "list" => commands::list(self, args),
            "open" => match args {
                [path] => self.open(path),
                _ => Err(CommandError::InvalidArguments(
                    "Usage: open <collection>/new | open <collection>/<id>/edit".into(),
                )),
            },
            "set" => commands::set(self, args),
            "fill" => commands::fill(self),
            "show" => commands::show(self),
            "submit" => commands::submit(self),
            "version" => commands::version(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            _ => {
                self.suggest_command(raw);
                Ok(())
            }
        };
        result.map(|()| LoopControl::Continue)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = COMMANDS
            .iter()
            .map(|name| (levenshtein(name, &input.to_lowercase()), *name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        output::error(&err);
        if matches!(err, CommandError::InvalidArguments(_)) {
            output::info("Type `help` for usage details.");
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        crate::cli::prompts::confirm("Exit shell?")
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }
}
