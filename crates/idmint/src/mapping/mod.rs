//! Old-id → new-id mapping for a conversion run.

mod persistence;
mod substitutions;
mod table;

pub use substitutions::Substitutions;
pub use table::{MappingTable, is_uuid_v4};
