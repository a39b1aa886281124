//! The admin workflows: login, listing, create, edit and delete.
//!
//! A [`Dashboard`] owns the session and all form state. Front ends send it
//! [`Command`]s and render the [`Screen`] snapshots it publishes after every
//! state change. Failures never escape a workflow; they end up in a banner.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::api::{ApiError, Booking, BookingApi, BookingDraft};
use crate::notify::{BannerTarget, Banners, Notifier};
use crate::session::Session;
use crate::view::{render, ListScope, ListState, TableBody};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this booking?";

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    Refresh,
    Create(BookingDraft),
    StartEdit(String),
    /// Submits the edit form for whichever booking `StartEdit` selected last.
    SubmitEdit(BookingDraft),
    CancelEdit,
    Delete(String),
}

/// Form values plus a counter bumped whenever the workflow rewrites them, so
/// a front end knows when to overwrite its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState<T> {
    pub values: T,
    pub epoch: u64,
}

impl<T: Default> FormState<T> {
    fn fill(&mut self, values: T) {
        self.values = values;
        self.epoch += 1;
    }

    fn reset(&mut self) {
        self.fill(T::default());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub visible: bool,
    pub booking_id: Option<String>,
    pub form: FormState<BookingDraft>,
}

impl EditForm {
    fn close(&mut self) {
        self.visible = false;
        self.booking_id = None;
        self.form.reset();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub signed_in: bool,
    pub table: TableBody,
    /// Bumped after every login attempt; the login form clears itself.
    pub login_epoch: u64,
    pub create: FormState<BookingDraft>,
    pub edit: EditForm,
}

struct Messages {
    success: &'static str,
    failure: &'static str,
    network: &'static str,
    signed_out: &'static str,
    /// When false, `failure` is shown even if the server explained itself.
    use_server_message: bool,
}

const LOGIN: Messages = Messages {
    success: "Logged in successfully!",
    failure: "Invalid credentials",
    network: "Failed to login. Please check your network.",
    signed_out: "Invalid credentials",
    use_server_message: true,
};

const CREATE: Messages = Messages {
    success: "Booking created successfully!",
    failure: "Failed to create booking.",
    network: "Error creating booking. Please check your network.",
    signed_out: "Please log in to create bookings.",
    use_server_message: true,
};

const LOAD_EDIT: Messages = Messages {
    success: "",
    failure: "Failed to fetch booking details for editing.",
    network: "Failed to fetch booking details for editing.",
    signed_out: "Please log in to edit bookings.",
    use_server_message: false,
};

const UPDATE: Messages = Messages {
    success: "Booking updated successfully!",
    failure: "Failed to update booking.",
    network: "Error updating booking. Please check your network.",
    signed_out: "Please log in to update bookings.",
    use_server_message: true,
};

const DELETE: Messages = Messages {
    success: "Booking deleted successfully!",
    failure: "Failed to delete booking.",
    network: "Error deleting booking. Please check your network.",
    signed_out: "Please log in to delete bookings.",
    use_server_message: true,
};

pub struct Dashboard<A, C> {
    api: A,
    confirm: C,
    session: Session,
    list: ListState,
    login_epoch: u64,
    create: FormState<BookingDraft>,
    edit: EditForm,
    notifier: Notifier,
    screen: watch::Sender<Screen>,
}

impl<A: BookingApi, C: Confirm> Dashboard<A, C> {
    pub fn new(api: A, session: Session, confirm: C) -> Self {
        Self::with_notifier(api, session, confirm, Notifier::new())
    }

    pub fn with_notifier(api: A, session: Session, confirm: C, notifier: Notifier) -> Self {
        let initial = Screen {
            signed_in: session.is_authenticated(),
            table: render(&ListState::SignedOut, ListScope::Admin),
            login_epoch: 0,
            create: FormState::default(),
            edit: EditForm::default(),
        };
        let (screen, _) = watch::channel(initial);
        Self {
            api,
            confirm,
            session,
            list: ListState::SignedOut,
            login_epoch: 0,
            create: FormState::default(),
            edit: EditForm::default(),
            notifier,
            screen,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.screen.subscribe()
    }

    pub fn banners(&self) -> watch::Receiver<Banners> {
        self.notifier.subscribe()
    }

    pub fn screen(&self) -> Screen {
        Screen {
            signed_in: self.session.is_authenticated(),
            table: render(&self.list, ListScope::Admin),
            login_epoch: self.login_epoch,
            create: self.create.clone(),
            edit: self.edit.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn publish(&self) {
        self.screen.send_replace(self.screen());
    }

    /// Loads the list right away when a previous session was restored.
    pub async fn start(&mut self) {
        if self.session.is_authenticated() {
            self.refresh().await;
        } else {
            self.publish();
        }
    }

    /// Handles commands one at a time until every sender is gone.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.start().await;
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        log::debug!("command channel closed, dashboard stopped");
    }

    pub async fn handle(&mut self, command: Command) {
        log::debug!("handling {:?}", command);
        match command {
            Command::Login { username, password } => self.login(&username, &password).await,
            Command::Logout => self.logout(),
            Command::Refresh => self.refresh().await,
            Command::Create(draft) => self.create(draft).await,
            Command::StartEdit(id) => self.start_edit(id).await,
            Command::SubmitEdit(draft) => self.submit_edit(draft).await,
            Command::CancelEdit => {
                self.edit.close();
                self.publish();
            }
            Command::Delete(id) => self.delete(id).await,
        }
    }

    fn report(&self, target: BannerTarget, messages: &Messages, err: ApiError) {
        log::debug!("{:?} failed: {}", target, err);
        let text = match &err {
            ApiError::Validation(message) => message.clone(),
            ApiError::NotAuthenticated => messages.signed_out.to_string(),
            e if e.is_transport() => messages.network.to_string(),
            e if messages.use_server_message => {
                e.server_message().unwrap_or(messages.failure).to_string()
            }
            _ => messages.failure.to_string(),
        };
        self.notifier.error(target, text);
    }

    async fn login(&mut self, username: &str, password: &str) {
        let result = self.session.login(&self.api, username, password).await;
        // Blank fields are rejected before any request and stay in the form.
        if !matches!(result, Err(ApiError::Validation(_))) {
            self.login_epoch += 1;
        }
        match result {
            Ok(()) => {
                self.notifier.success(BannerTarget::Login, LOGIN.success);
                self.refresh().await;
            }
            Err(e) => {
                self.report(BannerTarget::Login, &LOGIN, e);
                self.publish();
            }
        }
    }

    fn logout(&mut self) {
        self.session.logout();
        self.list = ListState::SignedOut;
        self.edit.close();
        self.login_epoch += 1;
        self.publish();
    }

    /// Shows the loading placeholder, then whatever the server returns. A
    /// failed fetch discards the previous rows.
    pub async fn refresh(&mut self) {
        let token = match self.session.bearer() {
            Ok(token) => token.to_string(),
            Err(_) => {
                self.list = ListState::SignedOut;
                self.publish();
                return;
            }
        };

        self.list = ListState::Loading;
        self.publish();

        self.list = match self.api.admin_bookings(&token).await {
            Ok(bookings) => {
                log::info!("loaded {} bookings", bookings.len());
                ListState::Loaded(bookings)
            }
            Err(e) => {
                log::warn!("failed to load bookings: {}", e);
                ListState::Failed
            }
        };
        self.publish();
    }

    async fn create(&mut self, draft: BookingDraft) {
        self.create.values = draft.clone();
        match self.send_create(&draft).await {
            Ok(()) => {
                self.notifier.success(BannerTarget::Create, CREATE.success);
                self.create.reset();
                self.refresh().await;
            }
            Err(e) => {
                self.report(BannerTarget::Create, &CREATE, e);
                self.publish();
            }
        }
    }

    async fn send_create(&self, draft: &BookingDraft) -> Result<(), ApiError> {
        draft.validate()?;
        let token = self.session.bearer()?;
        self.api.create_booking(token, draft).await
    }

    async fn start_edit(&mut self, id: String) {
        match self.fetch_booking(&id).await {
            Ok(booking) => {
                self.edit.visible = true;
                self.edit.booking_id = Some(id);
                self.edit.form.fill(BookingDraft::from(&booking));
                self.publish();
            }
            Err(e) => self.report(BannerTarget::Edit, &LOAD_EDIT, e),
        }
    }

    async fn fetch_booking(&self, id: &str) -> Result<Booking, ApiError> {
        let token = self.session.bearer()?;
        self.api.booking(token, id).await
    }

    async fn submit_edit(&mut self, draft: BookingDraft) {
        let Some(id) = self.edit.booking_id.clone() else {
            self.notifier.error(BannerTarget::Edit, "No booking selected for editing.");
            return;
        };

        self.edit.form.values = draft.clone();
        match self.send_update(&id, &draft).await {
            Ok(()) => {
                self.notifier.success(BannerTarget::Edit, UPDATE.success);
                self.edit.close();
                self.refresh().await;
            }
            Err(e) => {
                self.report(BannerTarget::Edit, &UPDATE, e);
                self.publish();
            }
        }
    }

    async fn send_update(&self, id: &str, draft: &BookingDraft) -> Result<(), ApiError> {
        draft.validate()?;
        let token = self.session.bearer()?;
        self.api.update_booking(token, id, draft).await
    }

    async fn delete(&mut self, id: String) {
        if !self.session.is_authenticated() {
            self.report(BannerTarget::Edit, &DELETE, ApiError::NotAuthenticated);
            return;
        }
        if !self.confirm.confirm(DELETE_PROMPT).await {
            log::debug!("delete of {} cancelled", id);
            return;
        }

        match self.send_delete(&id).await {
            Ok(()) => {
                self.notifier.success(BannerTarget::Edit, DELETE.success);
                if self.edit.booking_id.as_deref() == Some(id.as_str()) {
                    self.edit.close();
                }
                self.refresh().await;
            }
            Err(e) => self.report(BannerTarget::Edit, &DELETE, e),
        }
    }

    async fn send_delete(&self, id: &str) -> Result<(), ApiError> {
        let token = self.session.bearer()?;
        self.api.delete_booking(token, id).await
    }
}
