use crate::cli::actions::UsersCommand;
use crate::client::{ApiClient, UserRecord};
use crate::dashboard::{AlwaysConfirm, Confirm, TermConfirm, UserDirectory};
use anyhow::{anyhow, Result};

/// Drive the user directory controller from the terminal.
/// # Errors
/// Returns an error if the API is unreachable or an operation fails.
pub async fn execute(api_url: &str, command: UsersCommand) -> Result<()> {
    let client = ApiClient::new(api_url)?;

    match command {
        UsersCommand::List => {
            let mut directory = UserDirectory::new(client);
            directory.refresh().await;
            bail_on_error(&directory)?;
            print_users(directory.users());
        }

        UsersCommand::Add { name, email } => {
            let mut directory = UserDirectory::new(client);
            directory.add_user(&name, &email).await;
            bail_on_error(&directory)?;
            println!("User created");
            print_users(directory.users());
        }

        UsersCommand::Update { id, name, email } => {
            let mut directory = UserDirectory::new(client);
            directory.refresh().await;
            bail_on_error(&directory)?;

            let user = find_user(&directory, &id)?.clone();
            directory.start_edit(&user);
            directory.update_user(&name, &email).await;
            bail_on_error(&directory)?;
            println!("User updated");
            print_users(directory.users());
        }

        UsersCommand::Delete { id, yes } => {
            let confirm: Box<dyn Confirm + Send + Sync> = if yes {
                Box::new(AlwaysConfirm)
            } else {
                Box::new(TermConfirm)
            };
            let mut directory = UserDirectory::with_confirm(client, confirm);
            directory.refresh().await;
            bail_on_error(&directory)?;

            let user = find_user(&directory, &id)?.clone();
            directory.delete_user(&user).await;
            bail_on_error(&directory)?;
            print_users(directory.users());
        }
    }

    Ok(())
}

fn bail_on_error(directory: &UserDirectory) -> Result<()> {
    match directory.error() {
        Some(message) => Err(anyhow!("{message}")),
        None => Ok(()),
    }
}

fn find_user<'a>(directory: &'a UserDirectory, id: &str) -> Result<&'a UserRecord> {
    directory
        .users()
        .iter()
        .find(|user| user.id.as_deref() == Some(id))
        .ok_or_else(|| anyhow!("User not found: {id}"))
}

fn print_users(users: &[UserRecord]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }

    for user in users {
        let id = user.id.as_deref().unwrap_or("-");
        println!("{} ({})  [{}]", user.name, user.email, id);
    }
}
