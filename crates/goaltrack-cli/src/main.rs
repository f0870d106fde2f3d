//! Goal Tracker CLI
//!
//! Goals, categories, user administration and password recovery against a
//! Goal Tracker server, or against the built-in demo backend.

mod api;
mod commands;
mod config;

use crate::config::SettingsManager;
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use goaltrack_core::{GoalCreateFields, GoalStatus, PageRequest, UserFilter, UserRole};
use tracing::debug;

#[derive(Parser)]
#[command(name = "goaltrack")]
#[command(author, version, about = "Goal Tracker - goals, categories and users from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, log out, register
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Manage goals
    Goals {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Manage goal categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// User administration (admin only)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Recover a forgotten password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and store the access token
    Login {
        /// Username (optional - will prompt if not provided)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (optional - will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show the user the stored token belongs to
    Whoami,
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        /// Password (optional - will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum GoalAction {
    /// List goals
    List,
    /// Show one goal
    Show { id: i64 },
    /// Create a goal
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Category id
        #[arg(short, long)]
        category: Option<i64>,
    },
    /// Edit a goal; omitted options keep their value
    Update {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        /// Empty string clears the description
        #[arg(short, long)]
        description: Option<String>,
        /// in-progress, completed or cancelled
        #[arg(short, long)]
        status: Option<GoalStatus>,
        /// Due date (YYYY-MM-DD); empty string clears it
        #[arg(long)]
        due: Option<String>,
        /// Category id
        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<i64>,
        /// Remove the goal from its category
        #[arg(long)]
        no_category: bool,
    },
    /// Delete a goal
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories with their goal counts
    List,
    /// Show one category
    Show { id: i64 },
    /// Create a category
    Create { name: String },
    /// Rename a category
    Rename { id: i64, name: String },
    /// Delete a category; its goals become uncategorised
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users, paged and filtered
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// Username contains
        #[arg(long)]
        username: Option<String>,
        /// Email contains
        #[arg(long)]
        email: Option<String>,
        /// User, Admin or SuperAdmin
        #[arg(long)]
        role: Option<UserRole>,
    },
    /// Show a user by id or username
    Show { user: String },
    /// Move a user one role up
    Promote { id: i64 },
    /// Move a user one role down
    Demote { id: i64 },
    /// Delete a user
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Request a password reset email
    Forgot {
        email: String,
        /// reCAPTCHA response token
        #[arg(long)]
        captcha: Option<String>,
    },
    /// Check whether a reset token is still valid
    Validate { token: String },
    /// Set a new password with a reset token
    Reset {
        token: String,
        /// New password (optional - will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the API base URL and leave demo mode
    SetServer {
        /// Base URL (e.g., https://goals.example.com/api)
        url: String,
    },
    /// Switch the in-memory demo backend on or off
    Demo {
        #[arg(action = clap::ArgAction::Set, default_value_t = true)]
        enable: bool,
        /// Simulated latency per call
        #[arg(long)]
        latency_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "goaltrack=debug"
        } else {
            "goaltrack=error"
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = run(cli.command).await;

    if let Err(ref e) = result {
        debug!("Command failed: {:?}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

async fn run(command: Commands) -> Result<()> {
    let manager = SettingsManager::from_env()?;
    let settings = manager.load()?;
    debug!("Loaded settings from {:?}", manager.home());
    let backend = api::backend(&settings);

    match command {
        Commands::Auth { action } => match action {
            AuthAction::Login { username, password } => {
                commands::auth::login(&backend, &manager, username, password).await
            }
            AuthAction::Logout => commands::auth::logout(&manager).await,
            AuthAction::Whoami => commands::auth::whoami(settings.access_token).await,
            AuthAction::Register {
                username,
                email,
                firstname,
                lastname,
                password,
            } => {
                commands::auth::register(
                    &backend,
                    commands::auth::RegisterArgs {
                        username,
                        email,
                        firstname,
                        lastname,
                        password,
                    },
                )
                .await
            }
        },
        Commands::Goals { action } => match action {
            GoalAction::List => commands::goals::list(&backend).await,
            GoalAction::Show { id } => commands::goals::show(&backend, id).await,
            GoalAction::Create {
                title,
                description,
                due,
                category,
            } => {
                commands::goals::create(
                    &backend,
                    GoalCreateFields {
                        title,
                        description,
                        due_date: due,
                        goal_category_id: category,
                    },
                )
                .await
            }
            GoalAction::Update {
                id,
                title,
                description,
                status,
                due,
                category,
                no_category,
            } => {
                commands::goals::update(
                    &backend,
                    id,
                    commands::goals::GoalChanges {
                        title,
                        description,
                        status,
                        due_date: due,
                        category,
                        no_category,
                    },
                )
                .await
            }
            GoalAction::Delete { id, yes } => commands::goals::delete(&backend, id, yes).await,
        },
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::categories::list(&backend).await,
            CategoryAction::Show { id } => commands::categories::show(&backend, id).await,
            CategoryAction::Create { name } => commands::categories::create(&backend, name).await,
            CategoryAction::Rename { id, name } => {
                commands::categories::rename(&backend, id, name).await
            }
            CategoryAction::Delete { id, yes } => {
                commands::categories::delete(&backend, id, yes).await
            }
        },
        Commands::Users { action } => match action {
            UserAction::List {
                page,
                size,
                username,
                email,
                role,
            } => {
                let filter = UserFilter {
                    username,
                    email,
                    user_role: role,
                };
                commands::users::list(&backend, PageRequest::new(page, size), filter).await
            }
            UserAction::Show { user } => commands::users::show(&backend, &user).await,
            UserAction::Promote { id } => commands::users::promote(&backend, id).await,
            UserAction::Demote { id } => commands::users::demote(&backend, id).await,
            UserAction::Delete { id, yes } => commands::users::delete(&backend, id, yes).await,
        },
        Commands::Password { action } => match action {
            PasswordAction::Forgot { email, captcha } => {
                commands::password::forgot(&backend, &email, captcha.as_deref()).await
            }
            PasswordAction::Validate { token } => {
                commands::password::validate(&backend, &token).await
            }
            PasswordAction::Reset { token, password } => {
                commands::password::reset(&backend, &token, password).await
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&manager, &settings).await,
            ConfigAction::SetServer { url } => commands::config::set_server(&manager, &url).await,
            ConfigAction::Demo { enable, latency_ms } => {
                commands::config::demo(&manager, enable, latency_ms).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_goal_update() {
        let cli = Cli::try_parse_from([
            "goaltrack", "goals", "update", "3", "--status", "completed", "--no-category",
        ])
        .unwrap();
        match cli.command {
            Commands::Goals {
                action:
                    GoalAction::Update {
                        id,
                        status,
                        no_category,
                        ..
                    },
            } => {
                assert_eq!(id, 3);
                assert_eq!(status, Some(GoalStatus::Completed));
                assert!(no_category);
            }
            _ => panic!("expected goals update"),
        }
    }

    #[test]
    fn test_category_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "goaltrack", "goals", "update", "3", "--category", "2", "--no-category",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_user_filters() {
        let cli = Cli::try_parse_from([
            "goaltrack", "users", "list", "--page", "2", "--role", "superadmin",
        ])
        .unwrap();
        match cli.command {
            Commands::Users {
                action: UserAction::List { page, size, role, .. },
            } => {
                assert_eq!(page, 2);
                assert_eq!(size, 10);
                assert_eq!(role, Some(UserRole::SuperAdmin));
            }
            _ => panic!("expected users list"),
        }
    }

    #[test]
    fn test_demo_toggle_defaults_to_on() {
        let cli = Cli::try_parse_from(["goaltrack", "config", "demo"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Demo { enable: true, .. }
            }
        ));

        let cli = Cli::try_parse_from(["goaltrack", "config", "demo", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Demo { enable: false, .. }
            }
        ));
    }
}
