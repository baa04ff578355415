//! Customer auth commands.

use clap::Subcommand;

use sungrove_client::{AuthPhase, ClientError, ClientSession, StorefrontApi};

use super::prompt_line;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in: request an OTP and verify it interactively
    Login {
        /// Email address to sign in with
        #[arg(short, long)]
        email: String,

        /// Display name, for first-time registration
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the current session state
    Status,
    /// End the current session
    Logout,
}

/// Run an auth command.
///
/// # Errors
///
/// Returns the core's `ClientError` when the flow fails.
pub async fn run<A: StorefrontApi>(
    session: &mut ClientSession<A>,
    action: AuthAction,
) -> Result<(), ClientError> {
    match action {
        AuthAction::Login { email, name } => login(session, &email, name.as_deref()).await,
        AuthAction::Status => {
            status(session);
            Ok(())
        }
        AuthAction::Logout => {
            session.logout()?;
            println!("Signed out.");
            Ok(())
        }
    }
}

/// The OTP challenge lives only in memory, so request and verify happen in
/// one interactive command.
async fn login<A: StorefrontApi>(
    session: &mut ClientSession<A>,
    email: &str,
    name: Option<&str>,
) -> Result<(), ClientError> {
    session.request_otp(email).await?;
    println!("A one-time code has been sent to {email}.");

    loop {
        let code = prompt_line("Enter code: ")
            .map_err(|err| ClientError::Validation(format!("could not read input: {err}")))?;

        match session.verify_otp(email, &code, name).await {
            Ok(()) => break,
            Err(ClientError::Rejected(message)) => {
                let attempts = session
                    .auth()
                    .challenge()
                    .map_or(0, |challenge| challenge.attempts);
                println!("Code rejected ({message}); attempts so far: {attempts}. Try again.");
            }
            Err(ClientError::Validation(_)) => {
                println!("Enter the code exactly as it appears in the email.");
            }
            Err(other) => return Err(other),
        }
    }

    match session.auth().current_user() {
        Some(user) => println!("Signed in as {} <{}>.", user.name, user.email),
        None => println!("Signed in."),
    }
    Ok(())
}

fn status<A: StorefrontApi>(session: &ClientSession<A>) {
    match session.auth().phase() {
        AuthPhase::Authenticated => match session.auth().current_user() {
            Some(user) => println!("Signed in as {} <{}>.", user.name, user.email),
            None => println!("Signed in."),
        },
        AuthPhase::Anonymous => println!("Not signed in."),
        AuthPhase::OtpRequested | AuthPhase::OtpVerifying => {
            println!("A sign-in flow is in progress.");
        }
    }
}
