//! User-facing workflows built on the endpoint clients: forms, views and the
//! confirm-before-mutate step. Each holds a [`loading::LoadingGate`] so a
//! second submission fails fast instead of sending a duplicate request.

pub mod detail;
pub mod generate;
pub mod listing;
pub mod loading;
pub mod login;
pub mod toggle;
pub mod verify;

pub use self::detail::CodeDetailView;
pub use self::generate::{GenerateForm, GeneratedBatch};
pub use self::listing::{CodeListView, PageInfo};
pub use self::loading::{InFlight, LoadingGate};
pub use self::login::{LoginError, LoginForm};
pub use self::toggle::{Decision, ToggleAction, ToggleIntent, ToggleOutcome};
pub use self::verify::VerifyForm;
