//! Command-line surface and dispatch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use userdb::domain::{NewUser, Sex};
use userdb::menu::ConsoleMenu;
use userdb::repository::player::PlayerRepositoryImpl;
use userdb::repository::user::UserRepositoryImpl;
use userdb::service::{PlayerService, UserService};
use userdb::{migration, AppError, Config, DbPool, Result};

#[derive(Parser, Debug)]
#[command(
    name = "userdb",
    author,
    version,
    about = "Pooled MySQL access to the utilisateurs and JOUEUR tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database if needed and apply schema migrations
    Migrate,
    #[command(flatten)]
    Pool(PoolCommands),
}

/// Commands that run against an open connection pool
#[derive(Subcommand, Debug)]
pub enum PoolCommands {
    /// Check that the database answers
    Ping,
    /// Interactive users menu on the terminal
    Menu,
    /// Manage rows of the utilisateurs table
    Users(UsersArgs),
    /// Manage rows of the JOUEUR table
    Players(PlayersArgs),
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List every user
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one user
    Get {
        id: i32,
        #[arg(long)]
        json: bool,
    },
    /// Insert a user and print its generated id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Overwrite name and email of an existing user
    Update {
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Delete { id: i32 },
    /// Insert a JSON array of {"name", "email"} objects in one transaction
    Import { file: PathBuf },
    /// Print the number of users
    Count,
}

#[derive(Args, Debug)]
pub struct PlayersArgs {
    #[command(subcommand)]
    pub command: PlayersCommand,
}

#[derive(Subcommand, Debug)]
pub enum PlayersCommand {
    List {
        #[arg(long)]
        json: bool,
    },
    Get {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Look a player up by last and first name
    Find {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
    },
    Add {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        /// H or F
        #[arg(long)]
        sex: Sex,
    },
    /// Change a player's names
    Rename {
        id: i64,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
    },
    Delete { id: i64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{}", out);
    Ok(())
}

pub async fn execute(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Migrate => {
            migration::run_migrations(&config.database).await?;
            Ok(())
        }
        Commands::Pool(command) => {
            let pool = DbPool::connect(&config.database).await?;
            let outcome = run_with_pool(command, &pool).await;
            pool.close().await;
            outcome
        }
    }
}

async fn run_with_pool(command: PoolCommands, pool: &DbPool) -> Result<()> {
    match command {
        PoolCommands::Ping => {
            pool.ping().await?;
            println!("Connection OK");
            Ok(())
        }
        PoolCommands::Menu => {
            let service = UserService::new(Arc::new(UserRepositoryImpl::new(pool.inner().clone())));
            let stdin = std::io::stdin();
            let mut menu = ConsoleMenu::new(service, stdin.lock(), std::io::stdout());
            menu.run().await.context("Terminal I/O failed")?;
            Ok(())
        }
        PoolCommands::Users(args) => {
            let service = UserService::new(Arc::new(UserRepositoryImpl::new(pool.inner().clone())));
            run_users(args.command, &service).await
        }
        PoolCommands::Players(args) => {
            let service =
                PlayerService::new(Arc::new(PlayerRepositoryImpl::new(pool.inner().clone())));
            run_players(args.command, &service).await
        }
    }
}

async fn run_users(command: UsersCommand, service: &UserService<UserRepositoryImpl>) -> Result<()> {
    match command {
        UsersCommand::List { json } => {
            let users = service.list().await?;
            if json {
                return print_json(&users);
            }
            for user in &users {
                println!("{}", user);
            }
        }
        UsersCommand::Get { id, json } => {
            let user = service.get(id).await?;
            if json {
                return print_json(&user);
            }
            println!("{}", user);
        }
        UsersCommand::Add { name, email } => {
            let user = service.create(NewUser { name, email }).await?;
            println!("User added with id {}", user.id);
        }
        UsersCommand::Update { id, name, email } => {
            service.update(id, name, email).await?;
            println!("User {} updated", id);
        }
        UsersCommand::Delete { id } => {
            service.delete(id).await?;
            println!("User {} deleted", id);
        }
        UsersCommand::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let inputs: Vec<NewUser> = serde_json::from_str(&raw)
                .map_err(|e| AppError::Validation(format!("{}: {}", file.display(), e)))?;
            info!(count = inputs.len(), file = %file.display(), "Importing users");
            let users = service.import(inputs).await?;
            for user in &users {
                println!("{}", user);
            }
            println!("{} users imported", users.len());
        }
        UsersCommand::Count => {
            println!("{}", service.count().await?);
        }
    }
    Ok(())
}

async fn run_players(
    command: PlayersCommand,
    service: &PlayerService<PlayerRepositoryImpl>,
) -> Result<()> {
    match command {
        PlayersCommand::List { json } => {
            let players = service.list().await?;
            if json {
                return print_json(&players);
            }
            for player in &players {
                println!("{}", player);
            }
        }
        PlayersCommand::Get { id, json } => {
            let player = service.get(id).await?;
            if json {
                return print_json(&player);
            }
            println!("{}", player);
        }
        PlayersCommand::Find {
            last_name,
            first_name,
        } => {
            let player = service.find_by_name(&last_name, &first_name).await?;
            println!("{}", player);
        }
        PlayersCommand::Add {
            last_name,
            first_name,
            sex,
        } => {
            let player = service.create(last_name, first_name, sex).await?;
            println!("Player added with id {}", player.id);
        }
        PlayersCommand::Rename {
            id,
            last_name,
            first_name,
        } => {
            service.rename(id, last_name, first_name).await?;
            println!("Player {} renamed", id);
        }
        PlayersCommand::Delete { id } => {
            service.delete(id).await?;
            println!("Player {} deleted", id);
        }
    }
    Ok(())
}
