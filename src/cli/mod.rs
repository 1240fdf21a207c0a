pub mod account;
pub mod dates;
pub mod habits;

use std::path::PathBuf;

use account::{process_account_command, AccountCommand};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dates::AtDate;
use habits::{process_habit_command, HabitCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    habits::filters::FrequencyFilter,
    storage::kv_store::FileKeyValueStore,
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Habitrack", version, about = "Track daily and weekly habits", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create an account")]
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    #[command(about = "Log in with an existing account")]
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    #[command(about = "Log out the current user")]
    Logout {},
    #[command(about = "Show the profile of the current user or change its name")]
    Profile {
        #[arg(long, help = "New display name")]
        name: Option<String>,
    },
    #[command(about = "Create a new habit")]
    Add {
        name: String,
        #[arg(help = "daily or weekly")]
        frequency: String,
    },
    #[command(about = "Mark a habit as completed for today")]
    Complete { name: String },
    #[command(about = "Delete a habit and its history")]
    Delete { name: String },
    #[command(about = "List habits")]
    List {
        #[arg(short, long, default_value = "all", help = "all, daily or weekly")]
        filter: FrequencyFilter,
        #[arg(long = "completed-today", help = "Only habits completed today")]
        completed_today: bool,
        #[arg(long, help = "Only habits completed at least once, with their count")]
        completed: bool,
    },
    #[command(about = "Show today's and this week's completion")]
    Stats {
        #[command(flatten)]
        at: AtDate,
    },
    #[command(about = "Show this week's calendar")]
    Calendar {
        #[command(flatten)]
        at: AtDate,
    },
}

pub async fn run_cli(args: Args) -> Result<()> {
    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let store = FileKeyValueStore::in_dir(&app_dir)?;

    match args.commands {
        Commands::Register {
            email,
            name,
            password,
        } => process_account_command(&store, AccountCommand::Register { email, name, password }).await,
        Commands::Login { email, password } => {
            process_account_command(&store, AccountCommand::Login { email, password }).await
        }
        Commands::Logout {} => process_account_command(&store, AccountCommand::Logout).await,
        Commands::Profile { name } => {
            process_account_command(&store, AccountCommand::Profile { name }).await
        }
        Commands::Add { name, frequency } => {
            process_habit_command(&store, HabitCommand::Add { name, frequency }).await
        }
        Commands::Complete { name } => {
            process_habit_command(&store, HabitCommand::Complete { name }).await
        }
        Commands::Delete { name } => {
            process_habit_command(&store, HabitCommand::Delete { name }).await
        }
        Commands::List {
            filter,
            completed_today,
            completed,
        } => {
            process_habit_command(
                &store,
                HabitCommand::List {
                    filter,
                    completed_today,
                    completed,
                },
            )
            .await
        }
        Commands::Stats { at } => process_habit_command(&store, HabitCommand::Stats { at }).await,
        Commands::Calendar { at } => {
            process_habit_command(&store, HabitCommand::Calendar { at }).await
        }
    }
}
