use crate::cli::actions::{auth, codes, verify, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Verify(args) => verify::execute(args).await,
        Action::Login(args) => auth::login(args).await,
        Action::Logout(args) => auth::logout(&args),
        Action::Status(args) => auth::status(&args),
        Action::Generate(args) => codes::generate(args).await,
        Action::List(args) => codes::list(args).await,
        Action::Show(args) => codes::show(args).await,
        Action::Usage(args) => codes::usage(args).await,
        Action::Toggle(args) => codes::toggle(args).await,
    }
}
