use crate::{Connection, Prepared, SqlWriter, Transaction};

/// A database backend: its connection and transaction types, its statement
/// handle and its SQL dialect.
pub trait Driver: Default + Send + Sync + 'static {
    type Connection: Connection<Driver = Self>;
    type Transaction: Transaction<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// Driver name, also the scheme of the connection url.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
