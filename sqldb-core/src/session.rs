use crate::{
    Connection, Driver, Executor, Query, QueryResult, Result, RowLabeled, RowsAffected,
    Transaction, future::Either, stream::Stream,
};
use std::future::Future;

/// A live access context: a plain connection in autocommit mode, or a
/// connection inside an open transaction.
///
/// Every [`crate::Access`] operation is available on it. A transactional
/// session is rolled back by [`AccessSession::close`] unless
/// [`AccessSession::commit`] was called; dropping it without either drops the
/// connection and the server discards the open transaction.
pub enum AccessSession<D: Driver> {
    Autocommit(D::Connection),
    Transactional(D::Transaction),
}

impl<D: Driver> AccessSession<D> {
    /// Open a session on a connection, starting a transaction when requested.
    pub async fn new(connection: D::Connection, transactional: bool) -> Result<Self> {
        Ok(if transactional {
            AccessSession::Transactional(connection.begin().await?)
        } else {
            AccessSession::Autocommit(connection)
        })
    }

    pub fn is_transactional(&self) -> bool {
        matches!(self, AccessSession::Transactional(..))
    }

    /// Commit the transaction, if any, and release the connection.
    pub async fn commit(self) -> Result<()> {
        match self {
            AccessSession::Autocommit(connection) => connection.disconnect().await,
            AccessSession::Transactional(transaction) => transaction.commit().await,
        }
    }

    /// Roll back the transaction, if any, and release the connection.
    pub async fn close(self) -> Result<()> {
        match self {
            AccessSession::Autocommit(connection) => connection.disconnect().await,
            AccessSession::Transactional(transaction) => transaction.rollback().await,
        }
    }
}

impl<D: Driver> Executor for AccessSession<D> {
    type Driver = D;

    fn driver(&self) -> &Self::Driver {
        match self {
            AccessSession::Autocommit(v) => v.driver(),
            AccessSession::Transactional(v) => v.driver(),
        }
    }

    fn server_version(&self) -> u32 {
        match self {
            AccessSession::Autocommit(v) => v.server_version(),
            AccessSession::Transactional(v) => v.server_version(),
        }
    }

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<D>>> + Send {
        match self {
            AccessSession::Autocommit(v) => Either::Left(v.prepare(query)),
            AccessSession::Transactional(v) => Either::Right(v.prepare(query)),
        }
    }

    fn run(&mut self, query: Query<D>) -> impl Stream<Item = Result<QueryResult>> + Send {
        match self {
            AccessSession::Autocommit(v) => Either::Left(v.run(query)),
            AccessSession::Transactional(v) => Either::Right(v.run(query)),
        }
    }

    fn fetch(&mut self, query: Query<D>) -> impl Stream<Item = Result<RowLabeled>> + Send {
        match self {
            AccessSession::Autocommit(v) => Either::Left(v.fetch(query)),
            AccessSession::Transactional(v) => Either::Right(v.fetch(query)),
        }
    }

    fn execute(&mut self, query: Query<D>) -> impl Future<Output = Result<RowsAffected>> + Send {
        match self {
            AccessSession::Autocommit(v) => Either::Left(v.execute(query)),
            AccessSession::Transactional(v) => Either::Right(v.execute(query)),
        }
    }
}
