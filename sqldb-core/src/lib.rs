mod access;
mod as_value;
mod builder;
mod column;
mod connection;
mod database;
mod driver;
mod error;
mod executor;
mod filter;
mod mapper;
mod order;
mod prepared;
mod query;
mod record;
mod session;
mod sql_writer;
mod transaction;
mod util;
mod value;

pub use ::anyhow::Context;
pub use access::*;
pub use as_value::*;
pub use builder::*;
pub use column::*;
pub use connection::*;
pub use database::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use filter::*;
pub use mapper::*;
pub use order::*;
pub use prepared::*;
pub use query::*;
pub use record::*;
pub use session::*;
pub use sql_writer::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
