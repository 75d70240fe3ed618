//! # invite-console
//!
//! Client for an invite code service: end users redeem codes, administrators
//! log in, generate batches, browse codes and their usage history, and
//! enable or disable individual codes.
//!
//! The crate holds no server-side state. Every data-bearing operation is one
//! request/response round trip against the remote HTTP API, and every view is
//! re-fetched after a mutation instead of being patched locally.
//!
//! ## Layers
//!
//! - [`api`]: the single HTTP client. It applies the base URL, a fixed
//!   timeout, JSON content type, the bearer token from an explicit
//!   [`session::Session`], and normalizes every failure into [`api::ApiError`].
//! - [`session`]: the admin session (`LoggedOut` / `LoggedIn`) and its durable
//!   storage.
//! - [`features`]: endpoint clients and wire types, one module per concern.
//! - [`workflows`]: screen-level state (forms, paginated views, two-phase
//!   confirmation and the loading gate) independent of any rendering.
//! - [`cli`]: the `invite-console` command-line front end.

pub mod api;
pub mod cli;
pub mod features;
pub mod session;
pub mod workflows;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
