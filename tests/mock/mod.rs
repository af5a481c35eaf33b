//! Scripted in-memory driver: records every statement and answers with the
//! queued responses.
#![allow(dead_code)]

use sqldb::{
    AsValue, Connection, Driver, Error, Executor, GenericSqlWriter, Prepared, Query, QueryResult,
    Result, RowLabeled, RowsAffected, Transaction, Value, impl_executor_transaction,
    stream::{self, Stream},
};
use std::{
    borrow::Cow,
    collections::{HashMap, VecDeque},
    fmt::{self, Display},
    future::{self, Future},
    sync::{Arc, LazyLock, Mutex},
};

pub enum Response {
    Rows(Vec<Vec<Value>>),
    Affected(u64, Option<i64>),
    Fail(&'static str),
}

#[derive(Default)]
pub struct State {
    pub statements: Vec<(String, Vec<Value>)>,
    pub events: Vec<&'static str>,
    pub responses: VecDeque<Response>,
    pub server_version: u32,
}

pub type Shared = Arc<Mutex<State>>;

static SERVERS: LazyLock<Mutex<HashMap<String, Shared>>> = LazyLock::new(Default::default);

/// Register a server reachable at `mock://{name}`.
pub fn server(name: &str) -> Shared {
    let state = Shared::default();
    SERVERS
        .lock()
        .unwrap()
        .insert(format!("{}://{name}", MockDriver::NAME), state.clone());
    state
}

pub fn respond(state: &Shared, response: Response) {
    state.lock().unwrap().responses.push_back(response);
}

pub fn statements(state: &Shared) -> Vec<(String, Vec<Value>)> {
    state.lock().unwrap().statements.clone()
}

pub fn sql(state: &Shared) -> Vec<String> {
    statements(state).into_iter().map(|(sql, _)| sql).collect()
}

pub fn events(state: &Shared) -> Vec<&'static str> {
    state.lock().unwrap().events.clone()
}

#[derive(Default, Debug, Clone, Copy)]
pub struct MockDriver;

impl Driver for MockDriver {
    type Connection = MockConnection;
    type Transaction = MockTransaction;
    type SqlWriter = GenericSqlWriter;
    type Prepared = MockPrepared;

    const NAME: &'static str = "mock";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

#[derive(Default, Debug)]
pub struct MockPrepared {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Display for MockPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl Prepared for MockPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.args.clear();
        Ok(self)
    }
    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        self.args.push(value.as_value());
        Ok(self)
    }
    fn bind_index(&mut self, value: impl AsValue, index: u64) -> Result<&mut Self> {
        let index = index as usize;
        if self.args.len() <= index {
            self.args.resize(index + 1, Value::Null);
        }
        self.args[index] = value.as_value();
        Ok(self)
    }
}

pub struct MockConnection {
    driver: MockDriver,
    state: Shared,
}

impl Executor for MockConnection {
    type Driver = MockDriver;

    fn driver(&self) -> &MockDriver {
        &self.driver
    }

    fn server_version(&self) -> u32 {
        self.state.lock().unwrap().server_version
    }

    fn prepare(&mut self, query: String) -> impl Future<Output = Result<Query<MockDriver>>> + Send {
        future::ready(Ok(Query::Prepared(MockPrepared {
            sql: query,
            args: Vec::new(),
        })))
    }

    fn run(&mut self, query: Query<MockDriver>) -> impl Stream<Item = Result<QueryResult>> + Send {
        let mut state = self.state.lock().unwrap();
        let statement = match query {
            Query::Raw(sql) => (sql, Vec::new()),
            Query::Prepared(prepared) => (prepared.sql, prepared.args),
        };
        state.statements.push(statement);
        let results: Vec<Result<QueryResult>> = match state.responses.pop_front() {
            Some(Response::Rows(rows)) => rows
                .into_iter()
                .map(|values| {
                    let labels = (0..values.len()).map(|i| format!("c{i}")).collect();
                    Ok(RowLabeled::new(labels, values.into_boxed_slice()).into())
                })
                .collect(),
            Some(Response::Affected(rows_affected, last_affected_id)) => vec![Ok(RowsAffected {
                rows_affected,
                last_affected_id,
            }
            .into())],
            Some(Response::Fail(message)) => vec![Err(Error::msg(message))],
            None => Vec::new(),
        };
        stream::iter(results)
    }
}

impl Connection for MockConnection {
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send {
        let state = SERVERS.lock().unwrap().get(url.as_ref()).cloned();
        future::ready(match state {
            Some(state) => Ok(Self {
                driver: MockDriver,
                state,
            }),
            None => Err(Error::msg(format!("No mock server at {url}"))),
        })
    }

    fn begin(self) -> impl Future<Output = Result<MockTransaction>> + Send {
        self.state.lock().unwrap().events.push("BEGIN");
        future::ready(Ok(MockTransaction { connection: self }))
    }

    fn disconnect(self) -> impl Future<Output = Result<()>> + Send {
        self.state.lock().unwrap().events.push("DISCONNECT");
        future::ready(Ok(()))
    }
}

pub struct MockTransaction {
    connection: MockConnection,
}

impl_executor_transaction!(MockDriver, MockTransaction, connection);

impl Transaction for MockTransaction {
    fn commit(self) -> impl Future<Output = Result<()>> + Send {
        self.connection.state.lock().unwrap().events.push("COMMIT");
        self.connection.disconnect()
    }

    fn rollback(self) -> impl Future<Output = Result<()>> + Send {
        self.connection.state.lock().unwrap().events.push("ROLLBACK");
        self.connection.disconnect()
    }
}

/// Connection settings of a mock server.
pub struct MockInfo(pub &'static str);

impl sqldb::ConnectionInfo for MockInfo {
    fn driver_name(&self) -> &str {
        MockDriver::NAME
    }
    fn source_name(&self) -> String {
        format!("{}://{}", MockDriver::NAME, self.0)
    }
    fn schema_name(&self) -> &str {
        self.0
    }
}
