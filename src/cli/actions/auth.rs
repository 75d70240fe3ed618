use crate::{
    cli::globals::GlobalArgs,
    features::auth::guards,
    session::{SessionState, SessionStore},
    workflows::LoginForm,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde_json::json;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: Option<SecretString>,
}

#[derive(Debug)]
pub struct SessionArgs {
    pub globals: GlobalArgs,
}

fn read_password<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> io::Result<SecretString> {
    write!(prompt, "Password: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// # Errors
/// Returns an error if the credentials are rejected or the session cannot be
/// stored.
pub async fn login(args: LoginArgs) -> Result<()> {
    let api = args.globals.client()?;
    let store = args.globals.store()?;

    let password = match args.password {
        Some(password) => password,
        None => read_password(io::stdin().lock(), io::stderr())
            .context("failed to read password from stdin")?,
    };

    let mut form = LoginForm::new(args.username, password);
    let session = match form.submit(&api, &store).await {
        Ok(session) => session,
        Err(err) => {
            let message = form.error().map_or_else(|| err.user_message(), ToString::to_string);
            return Err(anyhow!(message));
        }
    };

    let username = session.username().unwrap_or_default();
    if args.globals.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "username": username,
                "roles": session.roles(),
            }))?
        );
    } else {
        println!("Logged in as {username}");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the session file cannot be removed.
pub fn logout(args: &SessionArgs) -> Result<()> {
    let store = args.globals.store()?;
    guards::logout(&store).context("failed to clear the stored session")?;
    if !args.globals.json {
        println!("Logged out");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the session file cannot be read.
pub fn status(args: &SessionArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = store.load().context("failed to read the stored session")?;

    if args.globals.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "loggedIn": session.is_authenticated(),
                "username": session.username(),
                "roles": session.roles(),
                "sessionFile": store.path(),
            }))?
        );
        return Ok(());
    }

    match session.state() {
        SessionState::LoggedIn => {
            println!(
                "Logged in as {}",
                session.username().unwrap_or("an unnamed administrator")
            );
            if !session.roles().is_empty() {
                println!("Roles: {}", session.roles().join(", "));
            }
        }
        SessionState::LoggedOut => println!("Not logged in"),
    }
    Ok(())
}
