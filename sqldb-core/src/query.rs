use crate::{AsValue, Driver, Error, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// A statement on its way to an [`crate::Executor`]: plain text, or a handle
/// prepared by the driver with the arguments bound to it.
pub enum Query<D: Driver> {
    Raw(String),
    Prepared(D::Prepared),
}

impl<D: Driver> Query<D> {
    fn handle(&mut self) -> Result<&mut D::Prepared> {
        match self {
            Query::Prepared(prepared) => Ok(prepared),
            Query::Raw(sql) => Err(Error::msg(format!(
                "`{}` is not prepared, it cannot take arguments",
                truncate_long!(sql)
            ))),
        }
    }

    /// Bind the next argument.
    pub fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        self.handle()?.bind(value)?;
        Ok(self)
    }

    /// Bind the argument at `index`, counting from 0.
    pub fn bind_index(&mut self, value: impl AsValue, index: u64) -> Result<&mut Self> {
        self.handle()?.bind_index(value, index)?;
        Ok(self)
    }

    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.handle()?.clear_bindings()?;
        Ok(self)
    }
}

impl<D: Driver> From<String> for Query<D> {
    fn from(value: String) -> Self {
        Query::Raw(value)
    }
}

impl<D: Driver> From<&str> for Query<D> {
    fn from(value: &str) -> Self {
        Query::Raw(value.to_owned())
    }
}

impl<D: Driver> Display for Query<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(sql) => write!(f, "{}", truncate_long!(sql)),
            Query::Prepared(prepared) => prepared.fmt(f),
        }
    }
}

/// What a modifying statement did.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Identifier generated by the last insert, when the server reports one.
    pub last_affected_id: Option<i64>,
}

/// Counts add up, the most recent identifier wins.
impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for item in iter {
            self.rows_affected += item.rows_affected;
            self.last_affected_id = item.last_affected_id.or(self.last_affected_id);
        }
    }
}

/// Column labels, shared by every row of a result set.
pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    /// One value per label, in the same order.
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    /// Value of the column labeled `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.labels.iter().position(|v| v == name)?;
        self.values.get(index)
    }
}

/// Item of [`crate::Executor::run`].
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
