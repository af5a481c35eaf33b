use crate::{MySQLDriver, MySQLPrepared, RowWrap};
use async_stream::try_stream;
use mysql_async::prelude::Queryable;
use sqldb_core::{
    Error, Executor, Query, QueryResult, Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::sync::Arc;

/// Executor over anything that speaks the MySQL protocol.
pub(crate) struct MySQLQueryable<T: Queryable> {
    pub(crate) executor: T,
    /// Major version reported in the handshake.
    pub(crate) server_version: u32,
}

impl<T: Queryable> Executor for MySQLQueryable<T> {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    fn server_version(&self) -> u32 {
        self.server_version
    }

    async fn prepare(&mut self, query: String) -> Result<Query<Self::Driver>> {
        let statement = self.executor.prep(query.as_str()).await.map_err(|e| {
            let e = Error::new(e);
            log::error!("{:#}", e);
            e
        })?;
        Ok(Query::Prepared(MySQLPrepared::new(statement, query)))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            match query {
                Query::Raw(sql) => {
                    let mut result = self.executor.query_iter(sql).await?;
                    let mut rows = 0;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            rows += 1;
                            yield QueryResult::Row(row.0)
                        }
                    }
                    if rows == 0 {
                        yield affected(result.affected_rows(), result.last_insert_id());
                    }
                }
                Query::Prepared(mut prepared) => {
                    let params = prepared.take_params()?;
                    let mut result = self.executor.exec_iter(prepared.statement, params).await?;
                    let mut rows = 0;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            rows += 1;
                            yield QueryResult::Row(row.0)
                        }
                    }
                    if rows == 0 {
                        yield affected(result.affected_rows(), result.last_insert_id());
                    }
                }
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

fn affected(rows_affected: u64, last_insert_id: Option<u64>) -> QueryResult {
    QueryResult::Affected(RowsAffected {
        rows_affected,
        last_affected_id: last_insert_id.map(|v| v as _),
    })
}
