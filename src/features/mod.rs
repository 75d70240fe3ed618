//! Endpoint clients grouped by concern. Each feature keeps its wire types next
//! to the functions that send them.

pub mod auth;
pub mod codes;
pub mod verify;
