pub mod client;
pub mod types;

pub use self::types::{
    CodeId, CodeQuery, GenerateRequest, InviteCode, SortDirection, SortField, UsageQuery,
    UsageRecord,
};
