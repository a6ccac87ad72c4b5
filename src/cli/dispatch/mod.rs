use crate::cli::actions::{Action, UsersCommand};
use anyhow::Result;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("missing required argument: {name}"))
}

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("server", sub)) => Ok(Action::Server {
            port: sub.get_one::<u16>("port").copied().unwrap_or(3001),
            dsn: sub.get_one::<String>("dsn").map(ToString::to_string),
        }),

        Some(("users", sub)) => {
            let api_url = required(sub, "api-url")?;

            let command = match sub.subcommand() {
                Some(("list", _)) => UsersCommand::List,
                Some(("add", m)) => UsersCommand::Add {
                    name: required(m, "name")?,
                    email: required(m, "email")?,
                },
                Some(("update", m)) => UsersCommand::Update {
                    id: required(m, "id")?,
                    name: required(m, "name")?,
                    email: required(m, "email")?,
                },
                Some(("delete", m)) => UsersCommand::Delete {
                    id: required(m, "id")?,
                    yes: m.get_flag("yes"),
                },
                _ => return Err(anyhow::anyhow!("missing users subcommand")),
            };

            Ok(Action::Users { api_url, command })
        }

        _ => Err(anyhow::anyhow!("missing subcommand")),
    }
}
