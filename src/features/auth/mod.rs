pub mod client;
pub mod guards;
pub mod types;

pub use self::guards::{forget_on_rejection, logout, require_admin};
