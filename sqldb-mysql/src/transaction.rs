use crate::{MySQLConnection, MySQLDriver, MySQLQueryable};
use mysql_async::{Conn, prelude::Queryable};
use sqldb_core::{Error, Result, Transaction, impl_executor_transaction};

/// An open transaction, it owns the connection until commit or rollback.
pub struct MySQLTransaction {
    pub(crate) transaction: MySQLQueryable<Conn>,
}

impl MySQLTransaction {
    pub(crate) async fn new(connection: MySQLConnection) -> Result<Self> {
        let mut transaction = connection.conn;
        transaction
            .executor
            .query_drop("START TRANSACTION")
            .await
            .map_err(|e| {
                let e = Error::new(e).context("While starting a transaction");
                log::error!("{:#}", e);
                e
            })?;
        Ok(Self { transaction })
    }

    /// Send the closing statement, then release the connection.
    async fn end(self, statement: &'static str) -> Result<()> {
        let mut conn = self.transaction.executor;
        let result = conn.query_drop(statement).await;
        let closed = conn.disconnect().await;
        result.map_err(|e| {
            let e = Error::new(e).context(format!("While running `{statement}`"));
            log::error!("{:#}", e);
            e
        })?;
        closed.map_err(Into::into)
    }
}

impl_executor_transaction!(MySQLDriver, MySQLTransaction, transaction);

impl Transaction for MySQLTransaction {
    async fn commit(self) -> Result<()> {
        self.end("COMMIT").await
    }
    async fn rollback(self) -> Result<()> {
        self.end("ROLLBACK").await
    }
}
