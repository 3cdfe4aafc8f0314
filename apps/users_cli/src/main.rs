use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{ClientSettings, HttpUsersApi, UsersApi};
use shared::domain::{User, UserDraft, UserId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides API_URL and users_client.toml.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, short, default_value = "")]
        query: String,
    },
    Create {
        name: String,
        email: String,
        #[arg(long)]
        age: Option<u32>,
    },
    Delete {
        id: i64,
    },
}

fn print_user(user: &User) {
    let age = user.age.map(|age| age.to_string()).unwrap_or_default();
    println!("{}\t{}\t{}\t{}", user.id, user.name, user.email, age);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let settings = ClientSettings::load()?;
    let settings = match cli.api_url {
        Some(url) => settings.with_api_url(&url)?,
        None => settings,
    };
    let api = HttpUsersApi::from_settings(&settings)?;

    match cli.command {
        Command::List { query } => {
            let users = api.list_users(&query).await?;
            for user in &users {
                print_user(user);
            }
            println!("total users={}", users.len());
        }
        Command::Create { name, email, age } => {
            let draft = UserDraft {
                name,
                email,
                age: age.map(|age| age.to_string()).unwrap_or_default(),
            };
            match api.create_user(&draft.to_new_user()?).await? {
                Some(user) => println!("created user_id={}", user.id),
                None => println!("created user (id not returned)"),
            }
        }
        Command::Delete { id } => {
            api.delete_user(UserId(id)).await?;
            println!("deleted user_id={id}");
        }
    }

    Ok(())
}
