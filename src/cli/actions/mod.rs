pub mod auth;
pub mod codes;
pub mod verify;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Verify(verify::Args),
    Login(auth::LoginArgs),
    Logout(auth::SessionArgs),
    Status(auth::SessionArgs),
    Generate(codes::GenerateArgs),
    List(codes::ListArgs),
    Show(codes::ShowArgs),
    Usage(codes::UsageArgs),
    Toggle(codes::ToggleArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
