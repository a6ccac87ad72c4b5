//! Headless controller for the user directory view of the portfolio
//! dashboard. It owns the list of users and the add/edit form, sequences
//! calls to the users API, and reconciles local state with server state
//! after each mutation.
//!
//! The controller is single-owner state: callers drive it one operation at a
//! time and render from its accessors afterwards. The busy flag mirrors the
//! form being disabled while a request is in flight; it is not concurrency
//! control. Overlapping refreshes are not fenced, so a stale response can
//! overwrite a newer one (last-write-wins).

use crate::client::{ApiClient, UserRecord};
use std::io::{self, Write};
use tracing::debug;

const REQUIRED_FIELDS: &str = "Name and email are required";
const NO_SELECTION: &str = "No user selected for editing";
const NO_DELETE_ID: &str = "Cannot delete a user without an id";

/// Confirmation capability consulted before destructive operations, so tests
/// and non-interactive callers can inject a deterministic answer.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Asks y/N on the terminal.
pub struct TermConfirm;

impl Confirm for TermConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Answers every prompt without asking, for `--yes` style callers.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Transient form contents. Edit mode iff `editing` is `Some`; reset only on
/// successful submit or explicit cancel.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub editing: Option<UserRecord>,
}

impl FormState {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct UserDirectory {
    client: ApiClient,
    confirm: Box<dyn Confirm + Send + Sync>,
    users: Vec<UserRecord>,
    form: FormState,
    busy: bool,
    error: Option<String>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self::with_confirm(client, Box::new(TermConfirm))
    }

    #[must_use]
    pub fn with_confirm(client: ApiClient, confirm: Box<dyn Confirm + Send + Sync>) -> Self {
        Self {
            client,
            confirm,
            users: Vec::new(),
            form: FormState::default(),
            busy: false,
            error: None,
        }
    }

    /// The last successfully fetched list, order preserved.
    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.form.editing.is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) {
        self.busy = true;
        self.error = None;
    }

    /// Fetch the user list and replace local state with the response. On
    /// failure the previous list is left untouched.
    pub async fn refresh(&mut self) {
        self.begin();

        let result = self.client.list_users().await;

        // Busy drops on every path out, success or failure.
        self.busy = false;

        match result {
            Ok(users) => {
                debug!("fetched {} users", users.len());
                self.users = users;
            }
            Err(err) => self.error = Some(format!("Failed to fetch users: {err}")),
        }
    }

    /// Create a user from the given fields. Blank fields are rejected locally
    /// without any network traffic; on failure the form contents are kept
    /// for retry.
    pub async fn add_user(&mut self, name: &str, email: &str) {
        let Some((name, email)) = required_fields(name, email) else {
            self.error = Some(REQUIRED_FIELDS.to_string());
            return;
        };

        self.form.name.clone_from(&name);
        self.form.email.clone_from(&email);
        self.begin();

        let result = self.client.create_user(&name, &email).await;

        self.busy = false;

        match result {
            Ok(_) => {
                self.form.clear();
                self.refresh().await;
            }
            Err(err) => self.error = Some(format!("Failed to add user: {err}")),
        }
    }

    /// Copy a record's fields into the form and enter edit mode. No network
    /// traffic.
    pub fn start_edit(&mut self, user: &UserRecord) {
        self.form.name.clone_from(&user.name);
        self.form.email.clone_from(&user.email);
        self.form.editing = Some(user.clone());
    }

    /// Leave edit mode, clearing the form and any pending error.
    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.error = None;
    }

    /// Update the record selected via [`UserDirectory::start_edit`]. Requires
    /// a selection with a known id; on success edit mode ends and the list is
    /// refetched.
    pub async fn update_user(&mut self, name: &str, email: &str) {
        let Some((name, email)) = required_fields(name, email) else {
            self.error = Some(REQUIRED_FIELDS.to_string());
            return;
        };

        let Some(id) = self
            .form
            .editing
            .as_ref()
            .and_then(|user| user.id.clone())
        else {
            self.error = Some(NO_SELECTION.to_string());
            return;
        };

        self.form.name.clone_from(&name);
        self.form.email.clone_from(&email);
        self.begin();

        let result = self.client.update_user(&id, &name, &email).await;

        self.busy = false;

        match result {
            Ok(_) => {
                self.form.clear();
                self.refresh().await;
            }
            Err(err) => self.error = Some(format!("Failed to update user: {err}")),
        }
    }

    /// Delete a record after confirmation. A record without an id is rejected
    /// locally; a declined confirmation is a silent no-op.
    pub async fn delete_user(&mut self, user: &UserRecord) {
        let Some(id) = user.id.clone() else {
            self.error = Some(NO_DELETE_ID.to_string());
            return;
        };

        if !self
            .confirm
            .confirm(&format!("Delete {} ({})?", user.name, user.email))
        {
            debug!("delete of {} declined", id);
            return;
        }

        self.begin();

        let result = self.client.delete_user(&id).await;

        self.busy = false;

        match result {
            Ok(_) => self.refresh().await,
            Err(err) => self.error = Some(format!("Failed to delete user: {err}")),
        }
    }
}

fn required_fields(name: &str, email: &str) -> Option<(String, String)> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() || email.is_empty() {
        None
    } else {
        Some((name.to_string(), email.to_string()))
    }
}
