use crate::{
    cli::globals::GlobalArgs,
    session::{Session, SessionStore},
    workflows::VerifyForm,
};
use anyhow::{anyhow, bail, Result};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub code: String,
    pub user_id: Option<String>,
}

/// Verification is public; a stored admin session is attached when one is
/// readable and ignored otherwise.
fn current_session(globals: &GlobalArgs) -> Session {
    globals
        .store()
        .ok()
        .and_then(|store| store.load().ok())
        .unwrap_or_default()
}

/// # Errors
/// Returns an error if the code is blank or the server does not accept it.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.client()?;
    let session = current_session(&args.globals);
    debug!(state = ?session.state(), "verifying invite code");

    let mut form = VerifyForm::new(args.code, args.user_id.unwrap_or_default());
    let outcome = form
        .submit(&api, &session)
        .await
        .map_err(|err| anyhow!(err.user_message()))?;

    if args.globals.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.success {
            bail!("invite code was not accepted");
        }
        return Ok(());
    }

    if outcome.success {
        let message = if outcome.message.is_empty() {
            "Invite code accepted"
        } else {
            outcome.message.as_str()
        };
        println!("{message}");
        Ok(())
    } else {
        bail!("{}", outcome.message)
    }
}
