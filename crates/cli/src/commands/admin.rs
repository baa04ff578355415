//! Admin session commands.

use clap::Subcommand;
use secrecy::SecretString;

use sungrove_client::{AdminAccess, ClientError, ClientSession, StorefrontApi};

use super::prompt_line;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Log in to the admin surface with email and password
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
    /// Evaluate the admin guard, as a protected view would on mount
    Status,
    /// End the admin session
    Logout,
}

/// Run an admin command.
///
/// # Errors
///
/// Returns the core's `ClientError` when the flow fails.
pub async fn run<A: StorefrontApi>(
    session: &mut ClientSession<A>,
    action: AdminAction,
) -> Result<(), ClientError> {
    match action {
        AdminAction::Login { email } => {
            let password = admin_password()?;
            session.admin_login(&email, &password).await?;
            println!("Admin session established.");
            Ok(())
        }
        AdminAction::Status => {
            match session.admin_check() {
                AdminAccess::Granted(user) => {
                    println!("Admin access granted for {} <{}>.", user.name, user.email);
                }
                AdminAccess::RedirectToLogin => {
                    println!("Not logged in; a protected view would redirect to admin login.");
                }
            }
            Ok(())
        }
        AdminAction::Logout => {
            session.admin_logout();
            println!("Admin session ended.");
            Ok(())
        }
    }
}

/// Password from `SUNGROVE_ADMIN_PASSWORD`, or prompted.
fn admin_password() -> Result<SecretString, ClientError> {
    if let Ok(password) = std::env::var("SUNGROVE_ADMIN_PASSWORD") {
        return Ok(SecretString::from(password));
    }

    let password = prompt_line("Password: ")
        .map_err(|err| ClientError::Validation(format!("could not read input: {err}")))?;
    Ok(SecretString::from(password))
}
