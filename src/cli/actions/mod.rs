pub mod server;
pub mod users;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: Option<String>,
    },
    Users {
        api_url: String,
        command: UsersCommand,
    },
}

#[derive(Debug)]
pub enum UsersCommand {
    List,
    Add {
        name: String,
        email: String,
    },
    Update {
        id: String,
        name: String,
        email: String,
    },
    Delete {
        id: String,
        yes: bool,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
