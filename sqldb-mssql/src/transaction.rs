use crate::{MSSQLClient, MSSQLConnection, MSSQLDriver};
use sqldb_core::{Error, Result, Transaction, impl_executor_transaction};

/// An open transaction, it owns the connection until commit or rollback.
pub struct MSSQLTransaction {
    pub(crate) transaction: MSSQLClient,
}

impl_executor_transaction!(MSSQLDriver, MSSQLTransaction, transaction);

/// Run a statement as a plain batch, outside `sp_executesql`.
async fn batch(client: &mut MSSQLClient, statement: &str) -> Result<()> {
    let result: tiberius::Result<_> =
        async { client.client.simple_query(statement).await?.into_results().await }.await;
    result.map(drop).map_err(|e| {
        let e = Error::new(e).context(format!("While running `{statement}`"));
        log::error!("{:#}", e);
        e
    })
}

impl MSSQLTransaction {
    pub(crate) async fn new(connection: MSSQLConnection) -> Result<Self> {
        let mut transaction = connection.client;
        batch(&mut transaction, "BEGIN TRANSACTION").await?;
        Ok(Self { transaction })
    }

    /// Send the closing statement, then release the connection.
    async fn end(mut self, statement: &'static str) -> Result<()> {
        let result = batch(&mut self.transaction, statement).await;
        let closed = self.transaction.client.close().await;
        result?;
        closed.map_err(Into::into)
    }
}

impl Transaction for MSSQLTransaction {
    async fn commit(self) -> Result<()> {
        self.end("COMMIT").await
    }
    async fn rollback(self) -> Result<()> {
        self.end("ROLLBACK").await
    }
}
