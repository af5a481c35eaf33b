use crate::{MySQLConnection, MySQLPrepared, MySQLSqlWriter, MySQLTransaction};
use sqldb_core::Driver;

#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type Transaction = MySQLTransaction;
    type SqlWriter = MySQLSqlWriter;
    type Prepared = MySQLPrepared;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }
}
