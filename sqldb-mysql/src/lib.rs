mod connection;
mod connection_info;
mod driver;
mod executor;
mod prepared;
mod row_wrap;
mod sql_writer;
mod transaction;
mod value_wrap;

pub use connection::*;
pub use connection_info::*;
pub use driver::*;
pub(crate) use executor::*;
pub use prepared::*;
pub(crate) use row_wrap::*;
pub use sql_writer::*;
pub use transaction::*;
pub(crate) use value_wrap::*;
