use crate::{
    Access, AccessSession, AsValue, Connection, Driver, EntityMapper, Error, Executor, Filter,
    OrderBy, Page, QueryBuilder, Record, Result, SqlWriter, is_no_rows, stream::TryStreamExt,
    truncate_long,
};
use std::{borrow::Cow, pin::pin};

/// Connection settings of a database.
pub trait ConnectionInfo {
    /// Must match the name of the driver used to connect.
    fn driver_name(&self) -> &str;
    /// Url the driver connects to.
    fn source_name(&self) -> String;
    fn schema_name(&self) -> &str;
}

/// Entry point bound to one database and one driver.
///
/// Hands out sessions, mappers, builders and filters, and offers one shot
/// versions of every access operation, each on its own autocommit session.
pub struct Database<D: Driver> {
    driver: D,
    url: Cow<'static, str>,
    schema: String,
}

impl<D: Driver> Database<D> {
    pub fn new(info: &impl ConnectionInfo) -> Result<Self> {
        if info.driver_name() != D::NAME {
            return Err(Error::msg(format!(
                "Connection info for driver `{}` cannot be used with driver `{}`",
                info.driver_name(),
                D::NAME
            )));
        }
        Ok(Self {
            driver: D::default(),
            url: info.source_name().into(),
            schema: info.schema_name().into(),
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub async fn connect(&self) -> Result<D::Connection> {
        <D::Connection as Connection>::connect(self.url.clone()).await
    }

    /// Open a session, inside a transaction when `transactional` is set.
    pub async fn new_access(&self, transactional: bool) -> Result<AccessSession<D>> {
        AccessSession::new(self.connect().await?, transactional).await
    }

    pub fn new_entity(&self) -> EntityMapper {
        EntityMapper::new()
    }

    pub fn new_builder(&self) -> QueryBuilder<D::SqlWriter> {
        QueryBuilder::new(self.driver.sql_writer())
    }

    pub fn new_filter<'a>(
        &self,
        source: &'a dyn Record,
        field_or: bool,
        group_or: bool,
    ) -> Filter<'a> {
        Filter::new(source, field_or, group_or)
    }

    pub fn is_no_rows(&self, error: &Error) -> bool {
        is_no_rows(error)
    }

    /// Connect and return the version reported by the server.
    pub async fn test(&self) -> Result<String> {
        let mut connection = self.connect().await?;
        let mut sql = String::new();
        self.driver.sql_writer().write_version_query(&mut sql);
        log::debug!("{}", truncate_long!(sql));
        let version = {
            let mut stream = pin!(connection.fetch(sql.into()));
            match stream.try_next().await? {
                Some(row) => row
                    .values
                    .into_vec()
                    .into_iter()
                    .next()
                    .map(String::try_from_value)
                    .transpose()?
                    .unwrap_or_default(),
                None => String::new(),
            }
        };
        connection.disconnect().await?;
        Ok(version)
    }

    pub async fn insert<R: Record>(&self, record: &R) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.insert(record).await;
        finish(session, result).await
    }

    pub async fn insert_selective<R: Record>(&self, record: &R) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.insert_selective(record).await;
        finish(session, result).await
    }

    pub async fn delete<R: Record>(&self, record: &R, filters: &[Filter<'_>]) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.delete(record, filters).await;
        finish(session, result).await
    }

    pub async fn update<R: Record>(&self, record: &R, filters: &[Filter<'_>]) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.update(record, filters).await;
        finish(session, result).await
    }

    pub async fn update_selective<R: Record>(
        &self,
        record: &R,
        filters: &[Filter<'_>],
    ) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.update_selective(record, filters).await;
        finish(session, result).await
    }

    pub async fn update_by_primary_key<R: Record>(&self, record: &R) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.update_by_primary_key(record).await;
        finish(session, result).await
    }

    pub async fn update_selective_by_primary_key<R: Record>(&self, record: &R) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.update_selective_by_primary_key(record).await;
        finish(session, result).await
    }

    pub async fn select_one<R: Record>(&self, record: &mut R, filters: &[Filter<'_>]) -> Result<()> {
        let mut session = self.new_access(false).await?;
        let result = session.select_one(record, filters).await;
        finish(session, result).await
    }

    pub async fn select_list<R: Record>(
        &self,
        record: &mut R,
        row: impl FnMut(&R) + Send,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> Result<()> {
        let mut session = self.new_access(false).await?;
        let result = session.select_list(record, row, order, filters).await;
        finish(session, result).await
    }

    pub async fn select_distinct<R: Record>(
        &self,
        record: &mut R,
        row: impl FnMut(&R) + Send,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> Result<()> {
        let mut session = self.new_access(false).await?;
        let result = session.select_distinct(record, row, order, filters).await;
        finish(session, result).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn select_page<R: Record>(
        &self,
        record: &mut R,
        page: impl FnOnce(&Page) + Send,
        row: impl FnMut(&R) + Send,
        size: u64,
        index: u64,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> Result<Page> {
        let mut session = self.new_access(false).await?;
        let result = session
            .select_page(record, page, row, size, index, order, filters)
            .await;
        finish(session, result).await
    }

    pub async fn select_count<R: Record>(&self, record: &R, filters: &[Filter<'_>]) -> Result<u64> {
        let mut session = self.new_access(false).await?;
        let result = session.select_count(record, filters).await;
        finish(session, result).await
    }
}

/// Close the session, the operation error wins over the close error.
async fn finish<D: Driver, T>(session: AccessSession<D>, result: Result<T>) -> Result<T> {
    let closed = session.close().await;
    let value = result?;
    closed?;
    Ok(value)
}
