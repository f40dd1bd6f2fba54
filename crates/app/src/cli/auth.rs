use clap::{Args, Subcommand};
use platter::{
    session::Session,
    validation::{SignInForm, SignUpForm},
};
use platter_app::{
    auth::{NewAccount, Password, SessionState},
    context::AppContext,
};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    SignUp(SignUpArgs),

    /// Sign out
    SignOut,

    /// Show who is signed in
    Whoami,

    /// Replace the profile picture with an image URI
    ProfileImage { image: String },
}

#[derive(Debug, Args)]
struct SignUpArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    /// Mobile number, 01XXXXXXXXX
    #[arg(long)]
    phone: String,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    confirm_password: String,
}

pub(crate) async fn run(ctx: &AppContext, command: AuthCommand) -> Result<(), String> {
    match command.command {
        AuthSubcommand::SignIn { email, password } => {
            SignInForm {
                email: &email,
                password: &password,
            }
            .validate()
            .map_err(|error| error.to_string())?;

            let session = ctx
                .sessions
                .sign_in(email.trim(), &Password::new(password))
                .await
                .map_err(|error| format!("sign in failed: {}", describe(&error)))?;

            print_session(&session);
        }
        AuthSubcommand::SignUp(args) => {
            SignUpForm {
                name: &args.name,
                email: &args.email,
                phone: &args.phone,
                password: &args.password,
                confirm_password: &args.confirm_password,
            }
            .validate()
            .map_err(|error| error.to_string())?;

            let email = args.email.trim().to_string();

            let session = ctx
                .sessions
                .sign_up(&NewAccount {
                    name: args.name.trim().to_string(),
                    email: email.clone(),
                    phone: args.phone,
                    password: Password::new(args.password),
                })
                .await
                .map_err(|error| format!("sign up failed: {}", describe(&error)))?;

            match session {
                Some(session) => print_session(&session),
                None => println!("account created; confirm {email} before signing in"),
            }
        }
        AuthSubcommand::SignOut => {
            ctx.sessions
                .sign_out()
                .await
                .map_err(|error| {
                    format!(
                        "signed out locally; remote sign out failed: {}",
                        describe(&error)
                    )
                })?;

            println!("signed out");
        }
        AuthSubcommand::Whoami => match ctx.sessions.state().await {
            SessionState::SignedIn(session) => print_session(&session),
            SessionState::SignedOut | SessionState::Uninitialized => println!("not signed in"),
        },
        AuthSubcommand::ProfileImage { image } => {
            let session = ctx
                .sessions
                .update_profile_image(&image)
                .await
                .map_err(|error| {
                    format!("failed to update profile image: {}", describe(&error))
                })?;

            print_session(&session);
        }
    }

    Ok(())
}

fn print_session(session: &Session) {
    println!("user_id: {}", session.id);
    println!("name: {} ({})", session.name, session.initials());
    println!("email: {}", session.email);

    if !session.phone.is_empty() {
        println!("phone: {}", session.phone);
    }
}
