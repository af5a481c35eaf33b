pub use sqldb_core::*;
pub use sqldb_macros::Record;
