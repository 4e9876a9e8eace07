use tracing::{info, warn};

use crate::bootstrap::{bootstrap, BootOutcome, BootState};
use crate::forms::{
    self, delete_prompt, delete_row, row_actions_enabled, AuthFailure, CategoryDraft, Draft,
    LoginDraft, RegisterDraft, ResourceForm, TransactionDraft,
};
use crate::guard::{Access, Navigator, Route};
use crate::ledger::Ledger;
use crate::models::{Category, Transaction};
use crate::session::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
    Alert,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
            Self::Alert => write!(f, "ALERT"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: String },
    DeleteCategory { id: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) boot: BootState,
    pub(crate) nav: Navigator,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) alert: Option<String>,

    // Form focus, shared by whichever form the current screen shows
    pub(crate) field_index: usize,

    // Login / Register
    pub(crate) login: LoginDraft,
    pub(crate) register: RegisterDraft,

    // Home
    pub(crate) ledger: Ledger,
    pub(crate) transaction_form: ResourceForm<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Categories
    pub(crate) category_form: ResourceForm<Category>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            boot: BootState::Loading,
            nav: Navigator::new(Route::Home),
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            alert: None,

            field_index: 0,

            login: LoginDraft::default(),
            register: RegisterDraft::default(),

            ledger: Ledger::new(),
            transaction_form: ResourceForm::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            category_form: ResourceForm::new(),
            category_index: 0,
            category_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn screen(&self) -> Route {
        self.nav.current()
    }

    pub(crate) fn is_auth_screen(&self) -> bool {
        matches!(self.screen(), Route::Login | Route::Register)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn show_alert(&mut self, msg: impl Into<String>) {
        self.alert = Some(msg.into());
        self.input_mode = InputMode::Alert;
    }

    pub(crate) fn dismiss_alert(&mut self) {
        self.alert = None;
        self.input_mode = self.resting_mode();
    }

    /// Auth screens are nothing but a form, so they rest in editing mode.
    fn resting_mode(&self) -> InputMode {
        if self.is_auth_screen() {
            InputMode::Editing
        } else {
            InputMode::Normal
        }
    }

    // ── Boot and navigation ───────────────────────────────────

    /// Validate the persisted token, then let the guards place the user.
    pub(crate) fn finish_boot(&mut self, ctx: &mut AppContext) {
        match bootstrap(ctx) {
            BootOutcome::SignedIn => {
                let name = ctx.session().user().map(|u| u.full_name()).unwrap_or_default();
                self.set_status(format!("Welcome back, {name}"));
            }
            BootOutcome::Expired => self.set_status("Session expired. Please sign in again"),
            BootOutcome::Unreachable => {
                self.set_status("Could not reach the server. Please sign in again")
            }
            BootOutcome::Anonymous => {}
        }
        self.boot = BootState::Ready;
        let access = self.nav.resolve(self.boot, ctx.has_credentials());
        self.entered_screen(ctx, access);
    }

    pub(crate) fn navigate(&mut self, ctx: &mut AppContext, route: Route) {
        let access = self.nav.navigate(route, self.boot, ctx.has_credentials());
        self.entered_screen(ctx, access);
    }

    pub(crate) fn back(&mut self, ctx: &mut AppContext) {
        let access = self.nav.back(self.boot, ctx.has_credentials());
        self.entered_screen(ctx, access);
    }

    /// Step through the tabs visible in the current sign-in state.
    pub(crate) fn cycle_tab(&mut self, ctx: &mut AppContext, delta: isize) {
        let tabs = Route::tabs(ctx.has_credentials());
        let idx = tabs.iter().position(|r| *r == self.screen()).unwrap_or(0) as isize;
        let next = (idx + delta).rem_euclid(tabs.len() as isize) as usize;
        self.navigate(ctx, tabs[next]);
    }

    fn entered_screen(&mut self, ctx: &mut AppContext, access: Access) {
        if let Access::Redirect(target) = access {
            info!("Redirected to {}", target.path());
        }
        self.field_index = 0;
        self.input_mode = self.resting_mode();
        if access != Access::Pending {
            self.refresh(ctx);
        }
    }

    /// Re-fetch whatever the current screen shows.
    pub(crate) fn refresh(&mut self, ctx: &mut AppContext) {
        match self.screen() {
            Route::Home => {
                if let Err(e) = self.ledger.refresh(ctx) {
                    warn!("Failed to load transactions: {e}");
                    self.set_status(format!("Could not load transactions: {e}"));
                }
                self.clamp_cursors(ctx);
            }
            Route::Categories => {
                if let Err(e) = ctx.reload_profile() {
                    warn!("Failed to reload categories: {e}");
                    self.set_status(format!("Could not load categories: {e}"));
                }
                self.clamp_cursors(ctx);
            }
            Route::Login | Route::Register => {}
        }
    }

    fn clamp_cursors(&mut self, ctx: &AppContext) {
        let txns = self.ledger.len();
        if self.transaction_index >= txns {
            self.transaction_index = txns.saturating_sub(1);
        }
        self.transaction_scroll = self.transaction_scroll.min(self.transaction_index);

        let cats = ctx.categories().len();
        if self.category_index >= cats {
            self.category_index = cats.saturating_sub(1);
        }
        self.category_scroll = self.category_scroll.min(self.category_index);
    }

    // ── Auth ──────────────────────────────────────────────────

    fn submit_login(&mut self, ctx: &mut AppContext) {
        match forms::login(ctx, &self.login) {
            Ok(()) => {
                self.login = LoginDraft::default();
                let name = ctx.session().user().map(|u| u.full_name()).unwrap_or_default();
                self.set_status(format!("Signed in as {name}"));
                self.navigate(ctx, Route::Home);
            }
            Err(AuthFailure::Invalid(msg)) => self.set_status(msg),
            Err(e) => {
                self.login.password.clear();
                self.show_alert(e.to_string());
            }
        }
    }

    fn submit_register(&mut self, ctx: &mut AppContext) {
        match forms::register(ctx, &self.register) {
            Ok(()) => {
                self.login = LoginDraft {
                    email: self.register.email.trim().to_string(),
                    password: String::new(),
                };
                self.register = RegisterDraft::default();
                self.navigate(ctx, Route::Login);
                self.field_index = 1;
                self.set_status("Account created. Please sign in");
            }
            Err(AuthFailure::Invalid(msg)) => self.set_status(msg),
            Err(e) => self.show_alert(e.to_string()),
        }
    }

    pub(crate) fn log_out(&mut self, ctx: &mut AppContext) {
        forms::log_out(ctx);
        self.ledger.clear();
        self.transaction_form.cancel();
        self.category_form.cancel();
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.category_index = 0;
        self.category_scroll = 0;
        self.navigate(ctx, Route::Login);
        self.set_status("Signed out");
    }

    // ── Forms ─────────────────────────────────────────────────

    pub(crate) fn field_labels(&self) -> &'static [&'static str] {
        match self.screen() {
            Route::Home => TransactionDraft::labels(),
            Route::Categories => CategoryDraft::labels(),
            Route::Login => LoginDraft::labels(),
            Route::Register => RegisterDraft::labels(),
        }
    }

    pub(crate) fn focused_field_mut(&mut self) -> Option<&mut String> {
        let i = self.field_index;
        match self.screen() {
            Route::Home => self.transaction_form.draft_mut().field_mut(i),
            Route::Categories => self.category_form.draft_mut().field_mut(i),
            Route::Login => self.login.field_mut(i),
            Route::Register => self.register.field_mut(i),
        }
    }

    pub(crate) fn next_field(&mut self) {
        let n = self.field_labels().len();
        if n > 0 {
            self.field_index = (self.field_index + 1) % n;
        }
    }

    pub(crate) fn prev_field(&mut self) {
        let n = self.field_labels().len();
        if n > 0 {
            self.field_index = (self.field_index + n - 1) % n;
        }
    }

    /// The category icon field is a choice; Left/Right step through it.
    pub(crate) fn cycle_choice(&mut self) -> bool {
        if self.screen() == Route::Categories && self.field_index == 1 {
            self.category_form.draft_mut().cycle_icon();
            return true;
        }
        false
    }

    fn form_is_editing(&self) -> bool {
        match self.screen() {
            Route::Home => self.transaction_form.is_editing(),
            Route::Categories => self.category_form.is_editing(),
            Route::Login | Route::Register => false,
        }
    }

    /// Focus the form. A fresh entry is refused while an edit is in progress;
    /// `resume` re-enters whatever the form holds.
    pub(crate) fn open_form(&mut self, resume: bool) {
        if !resume && self.form_is_editing() {
            self.set_status("Finish or cancel the current edit first (x)");
            return;
        }
        self.field_index = 0;
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn submit_form(&mut self, ctx: &mut AppContext) {
        match self.screen() {
            Route::Home => {
                let outcome = self.transaction_form.submit(ctx);
                if outcome.is_saved() {
                    self.set_status("Transaction saved");
                    self.after_save(ctx);
                } else if let Some(err) = self.transaction_form.error() {
                    self.status_message = err.to_string();
                }
            }
            Route::Categories => {
                let outcome = self.category_form.submit(ctx);
                if outcome.is_saved() {
                    self.set_status("Category saved");
                    self.after_save(ctx);
                } else if let Some(err) = self.category_form.error() {
                    self.status_message = err.to_string();
                }
            }
            Route::Login => self.submit_login(ctx),
            Route::Register => self.submit_register(ctx),
        }
    }

    fn after_save(&mut self, ctx: &mut AppContext) {
        self.field_index = 0;
        self.input_mode = InputMode::Normal;
        self.refresh(ctx);
    }

    /// Leave the form on this screen, discarding an edit in progress.
    pub(crate) fn cancel_edit(&mut self) {
        let editing = match self.screen() {
            Route::Home => {
                let was = self.transaction_form.is_editing();
                self.transaction_form.cancel();
                was
            }
            Route::Categories => {
                let was = self.category_form.is_editing();
                self.category_form.cancel();
                was
            }
            Route::Login | Route::Register => false,
        };
        self.field_index = 0;
        self.input_mode = InputMode::Normal;
        if editing {
            self.set_status("Edit cancelled");
        }
    }

    // ── Rows ──────────────────────────────────────────────────

    pub(crate) fn row_count(&self, ctx: &AppContext) -> usize {
        match self.screen() {
            Route::Home => self.ledger.len(),
            Route::Categories => ctx.categories().len(),
            Route::Login | Route::Register => 0,
        }
    }

    pub(crate) fn row_cursor(&mut self) -> Option<(&mut usize, &mut usize)> {
        match self.screen() {
            Route::Home => Some((&mut self.transaction_index, &mut self.transaction_scroll)),
            Route::Categories => Some((&mut self.category_index, &mut self.category_scroll)),
            Route::Login | Route::Register => None,
        }
    }

    fn row_actions_allowed(&mut self) -> bool {
        let allowed = match self.screen() {
            Route::Home => row_actions_enabled(&self.transaction_form),
            Route::Categories => row_actions_enabled(&self.category_form),
            Route::Login | Route::Register => false,
        };
        if !allowed && !self.is_auth_screen() {
            self.set_status("Finish or cancel the current edit first (x)");
        }
        allowed
    }

    /// Hand the selected row to the form on this screen.
    pub(crate) fn edit_selected(&mut self, ctx: &AppContext) {
        if !self.row_actions_allowed() {
            return;
        }
        let started = match self.screen() {
            Route::Home => match self.ledger.get(self.transaction_index).cloned() {
                Some(txn) => self.transaction_form.begin_edit(&txn, ctx.categories()),
                None => false,
            },
            Route::Categories => match ctx.categories().get(self.category_index).cloned() {
                Some(cat) => self.category_form.begin_edit(&cat, ctx.categories()),
                None => false,
            },
            Route::Login | Route::Register => false,
        };
        if started {
            self.field_index = 0;
            self.input_mode = InputMode::Editing;
        }
    }

    /// Ask before deleting the selected row.
    pub(crate) fn request_delete(&mut self, ctx: &AppContext) {
        if !self.row_actions_allowed() {
            return;
        }
        let (action, prompt) = match self.screen() {
            Route::Home => {
                let id = self
                    .ledger
                    .get(self.transaction_index)
                    .and_then(|t| t.id.clone());
                (
                    id.map(|id| PendingAction::DeleteTransaction { id }),
                    delete_prompt::<Transaction>(),
                )
            }
            Route::Categories => {
                let id = ctx
                    .categories()
                    .get(self.category_index)
                    .and_then(|c| c.id.clone());
                (
                    id.map(|id| PendingAction::DeleteCategory { id }),
                    delete_prompt::<Category>(),
                )
            }
            Route::Login | Route::Register => return,
        };
        if let Some(action) = action {
            self.pending_action = Some(action);
            self.confirm_message = prompt;
            self.input_mode = InputMode::Confirm;
        }
    }

    pub(crate) fn confirm_pending(&mut self, ctx: &mut AppContext) {
        self.input_mode = InputMode::Normal;
        let Some(action) = self.pending_action.take() else {
            return;
        };
        let result = match &action {
            PendingAction::DeleteTransaction { id } => delete_row::<Transaction>(ctx, id),
            PendingAction::DeleteCategory { id } => delete_row::<Category>(ctx, id),
        };
        match result {
            Ok(()) => {
                self.set_status("Deleted");
                self.refresh(ctx);
            }
            Err(e) => self.set_status(format!("Could not delete: {e}")),
        }
    }

    pub(crate) fn cancel_pending(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.set_status("Cancelled");
    }
}
