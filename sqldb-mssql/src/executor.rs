use crate::{MSSQLDriver, MSSQLPrepared, column_value};
use async_stream::try_stream;
use sqldb_core::{
    Error, Executor, Query, QueryResult, Result, RowLabeled, RowNames, RowsAffected, Value,
    stream::{Stream, TryStreamExt},
};
use std::sync::Arc;
use tiberius::{Client, QueryItem};
use tokio::net::TcpStream;
use tokio_util::compat::Compat;

pub(crate) type TdsClient = Client<Compat<TcpStream>>;

/// Appended to statements that return no rows, it reports what they did.
const AFFECTED_QUERY: &str =
    "SELECT CAST(@@ROWCOUNT AS BIGINT), CAST(SCOPE_IDENTITY() AS BIGINT)";

/// Executor over a TDS client.
pub(crate) struct MSSQLClient {
    pub(crate) client: TdsClient,
    /// Release year read from `@@VERSION`.
    pub(crate) server_version: u32,
}

impl Executor for MSSQLClient {
    type Driver = MSSQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MSSQLDriver {}
    }

    fn server_version(&self) -> u32 {
        self.server_version
    }

    async fn prepare(&mut self, query: String) -> Result<Query<Self::Driver>> {
        Ok(Query::Prepared(MSSQLPrepared::new(query)))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            let (sql, params) = match query {
                Query::Raw(sql) => (sql, Vec::new()),
                Query::Prepared(prepared) => (prepared.sql, prepared.params),
            };
            let rows = returns_rows(&sql);
            let sql = if rows {
                sql
            } else {
                format!("{};\n{}", sql.trim_end().trim_end_matches(';'), AFFECTED_QUERY)
            };
            let mut stream = if params.is_empty() {
                self.client.simple_query(sql).await?
            } else {
                let mut query = tiberius::Query::new(sql);
                for param in params {
                    query.bind(param);
                }
                query.query(&mut self.client).await?
            };
            let mut names: RowNames = Arc::new([]);
            let mut last = None;
            while let Some(item) = stream.try_next().await? {
                match item {
                    QueryItem::Metadata(metadata) => {
                        names = metadata
                            .columns()
                            .iter()
                            .map(|v| v.name().to_owned())
                            .collect();
                    }
                    QueryItem::Row(row) => {
                        let values = row
                            .into_iter()
                            .map(column_value)
                            .collect::<Result<Box<[Value]>>>()?;
                        let row = RowLabeled::new(names.clone(), values);
                        if rows {
                            yield QueryResult::Row(row);
                        } else {
                            last = Some(row);
                        }
                    }
                }
            }
            if !rows {
                yield affected(last);
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

/// Statements whose result is a row set.
pub(crate) fn returns_rows(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    ["SELECT", "WITH"]
        .iter()
        .any(|v| keyword.eq_ignore_ascii_case(v))
}

fn affected(row: Option<RowLabeled>) -> QueryResult {
    let mut values = row.map(|v| v.values.into_vec()).unwrap_or_default().into_iter();
    let rows_affected = match values.next() {
        Some(Value::Int64(Some(v))) => v.max(0) as u64,
        _ => 0,
    };
    let last_affected_id = match values.next() {
        Some(Value::Int64(v)) => v,
        _ => None,
    };
    QueryResult::Affected(RowsAffected {
        rows_affected,
        last_affected_id,
    })
}
