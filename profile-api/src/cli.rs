use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::{
    auth::{AuthError, JwtKeys},
    domain::{
        models::UserId, ports::inbound::UserService, NewUser, Role, User, UserError, UserFilter,
    },
};

#[derive(Debug, Parser)]
#[command(name = "profile-api")]
#[command(about = "User profile API and its admin commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create a user account
    CreateUser {
        email: String,
        full_name: String,
        #[arg(long)]
        bio: Option<String>,
        /// Give the account the Admin role
        #[arg(long)]
        admin: bool,
    },
    /// List user accounts
    Users {
        /// Only list Admin accounts
        #[arg(long)]
        admin: bool,
    },
    /// Print a bearer token for a user, looked up by id or email
    Token {
        user: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}", describe_user_error(.0))]
    User(#[from] UserError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("no user matches {0}")]
    UnknownUser(String),
}

fn describe_user_error(err: &UserError) -> String {
    match err {
        UserError::Validation(violations) => violations
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn describe(user: &User) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        user.id, user.email, user.full_name, user.role
    )
}

/// Runs an admin command and returns what should be printed.
/// `Serve` is handled by the caller.
pub async fn run(
    command: Commands,
    user_service: &dyn UserService,
    jwt: &JwtKeys,
) -> Result<String, CommandError> {
    match command {
        Commands::Serve => Ok(String::new()),
        Commands::CreateUser {
            email,
            full_name,
            bio,
            admin,
        } => {
            let mut new_user = NewUser::new(email, full_name);
            if let Some(bio) = bio {
                new_user = new_user.with_bio(bio);
            }
            if admin {
                new_user = new_user.with_role(Role::Admin);
            }
            let user = user_service.create_user(new_user).await?;
            Ok(describe(&user))
        }
        Commands::Users { admin } => {
            let filter = if admin {
                UserFilter::all().with_role(Role::Admin)
            } else {
                UserFilter::all()
            };
            let users = user_service.get_users(&filter).await?;
            Ok(users.iter().map(describe).collect::<Vec<_>>().join("\n"))
        }
        Commands::Token { user, hours } => {
            let filter = match user.parse::<i32>() {
                Ok(id) => UserFilter::by_id(UserId::new(id)),
                Err(_) => UserFilter::all().with_email(&user),
            };
            let found = user_service
                .get_user_by_filter(&filter)
                .await?
                .ok_or(CommandError::UnknownUser(user))?;
            Ok(jwt.issue(found.id, time::Duration::hours(hours))?)
        }
    }
}
