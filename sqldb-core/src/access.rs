use crate::{
    AccessError, AsValue, Context, Driver, EntityMapper, Error, Executor, Filter, MappedEntity,
    OrderBy, Query, QueryBuilder, Record, Result, RowLabeled, RowsAffected, SqlWriter, Value,
    stream::TryStreamExt, truncate_long,
};
use std::{future::Future, pin::pin};

/// Outcome of the count phase of a paginated select.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows matching the filters.
    pub total: u64,
    pub page_count: u64,
    /// Rows per page, at least 1.
    pub size: u64,
    /// Selected page, counting from 1 (0 only when there are no rows).
    pub index: u64,
}

impl Page {
    /// Clamp the requested `size` and `index` against `total`.
    pub fn new(total: u64, size: u64, index: u64) -> Self {
        let size = size.max(1);
        let page_count = total.div_ceil(size);
        let index = if index > page_count {
            page_count
        } else if index < 1 {
            1
        } else {
            index
        };
        Self {
            total,
            page_count,
            size,
            index,
        }
    }

    /// Rows to skip to reach the selected page.
    pub fn offset(&self) -> u64 {
        self.index.saturating_sub(1) * self.size
    }
}

/// Generic CRUD and query operations, available on every [`Executor`].
///
/// Every operation maps the record first and fails before sending any SQL when
/// the record is not valid. Each call prepares its own statement.
pub trait Access: Executor {
    /// Insert every field but the auto increment ones.
    ///
    /// Returns the generated identifier when an auto increment field was
    /// skipped, otherwise 0.
    fn insert<R: Record>(&mut self, record: &R) -> impl Future<Output = Result<u64>> + Send {
        insert(self, record, false)
    }

    /// Like [`Access::insert`], also skipping the empty fields.
    fn insert_selective<R: Record>(
        &mut self,
        record: &R,
    ) -> impl Future<Output = Result<u64>> + Send {
        insert(self, record, true)
    }

    /// Delete the rows of the record relation matching the filters.
    fn delete<R: Record>(
        &mut self,
        record: &R,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<u64>> + Send {
        delete(self, record, filters)
    }

    /// Set every non auto increment field on the rows matching the filters.
    fn update<R: Record>(
        &mut self,
        record: &R,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<u64>> + Send {
        update(self, record, filters, false)
    }

    fn update_selective<R: Record>(
        &mut self,
        record: &R,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<u64>> + Send {
        update(self, record, filters, true)
    }

    /// Update the row identified by the primary key fields of the record.
    ///
    /// When the server reports no affected row (the row exists but nothing
    /// changed, on MySQL) the number of rows matching the key is returned.
    fn update_by_primary_key<R: Record>(
        &mut self,
        record: &R,
    ) -> impl Future<Output = Result<u64>> + Send {
        update_by_primary_key(self, record, false)
    }

    fn update_selective_by_primary_key<R: Record>(
        &mut self,
        record: &R,
    ) -> impl Future<Output = Result<u64>> + Send {
        update_by_primary_key(self, record, true)
    }

    /// Read the first matching row into the record, [`AccessError::NoRows`] when there is none.
    fn select_one<R: Record>(
        &mut self,
        record: &mut R,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<()>> + Send {
        select_one(self, record, filters)
    }

    /// Read every matching row into the record, calling `row` after each one.
    fn select_list<R: Record>(
        &mut self,
        record: &mut R,
        row: impl FnMut(&R) + Send,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<()>> + Send {
        select_list(self, record, row, order, filters, false)
    }

    /// Same as [`Access::select_list`] with `SELECT DISTINCT`.
    fn select_distinct<R: Record>(
        &mut self,
        record: &mut R,
        row: impl FnMut(&R) + Send,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<()>> + Send {
        select_list(self, record, row, order, filters, true)
    }

    /// Read one page of rows.
    ///
    /// `page` is called once with the clamped page figures before any row is
    /// read, no row is read when nothing matches. Without an explicit order the
    /// rows are sorted by the first primary key, or by the first field.
    #[allow(clippy::too_many_arguments)]
    fn select_page<R: Record>(
        &mut self,
        record: &mut R,
        page: impl FnOnce(&Page) + Send,
        row: impl FnMut(&R) + Send,
        size: u64,
        index: u64,
        order: &OrderBy,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<Page>> + Send {
        select_page(self, record, page, row, size, index, order, filters)
    }

    /// Number of rows of the record relation matching the filters.
    fn select_count<R: Record>(
        &mut self,
        record: &R,
        filters: &[Filter<'_>],
    ) -> impl Future<Output = Result<u64>> + Send {
        async move {
            let entity = EntityMapper::new().map(record)?;
            select_count(self, entity.relation, filters).await
        }
    }
}

impl<E: Executor> Access for E {}

fn new_builder<E: Executor>(
    executor: &E,
) -> QueryBuilder<<E::Driver as Driver>::SqlWriter> {
    QueryBuilder::new(executor.driver().sql_writer())
}

fn column_list<W: SqlWriter>(builder: &QueryBuilder<W>, entity: &MappedEntity) -> Vec<String> {
    entity.columns().map(|v| builder.quote(v)).collect()
}

async fn prepare<E: Executor>(
    executor: &mut E,
    sql: String,
    args: Vec<Value>,
) -> Result<Query<E::Driver>> {
    let text = truncate_long!(sql).to_string();
    log::debug!("{}", text);
    let context = || format!("While preparing the query:\n{}", text);
    let mut query = executor.prepare(sql).await.with_context(context)?;
    for arg in args {
        query.bind(arg).with_context(context)?;
    }
    Ok(query)
}

async fn execute<E, W>(executor: &mut E, builder: QueryBuilder<W>) -> Result<RowsAffected>
where
    E: Executor,
    W: SqlWriter,
{
    let (sql, args) = builder.build();
    let query = prepare(executor, sql, args).await?;
    executor.execute(query).await
}

/// Write the values of a row into the record slots of the mapped fields.
fn write_back<R: Record>(record: &mut R, entity: &MappedEntity, row: RowLabeled) -> Result<()> {
    if row.values.len() != entity.fields.len() {
        return Err(Error::msg(format!(
            "Expected {} columns but the row has {}",
            entity.fields.len(),
            row.values.len()
        )));
    }
    for (field, value) in entity.fields.iter().zip(row.values.into_vec()) {
        record.assign(field.slot, value).with_context(|| {
            format!(
                "While reading column `{}` into {}",
                field.column,
                record.record_name()
            )
        })?;
    }
    Ok(())
}

async fn scan<E, R, F>(
    executor: &mut E,
    query: Query<E::Driver>,
    entity: &MappedEntity,
    record: &mut R,
    mut row: F,
) -> Result<()>
where
    E: Executor,
    R: Record,
    F: FnMut(&R) + Send,
{
    let mut stream = pin!(executor.fetch(query));
    while let Some(labeled) = stream.try_next().await? {
        write_back(record, entity, labeled)?;
        row(record);
    }
    Ok(())
}

async fn insert<E: Executor>(executor: &mut E, record: &dyn Record, selective: bool) -> Result<u64> {
    let entity = EntityMapper::new().map(record)?;
    let mut builder = new_builder(executor);
    builder.insert(entity.relation);
    let mut has_auto_increment = false;
    for field in entity.fields {
        if field.auto_increment {
            has_auto_increment = true;
            continue;
        }
        if selective && field.value.is_empty_value() {
            continue;
        }
        builder.value(field.column, field.value);
    }
    let result = execute(executor, builder).await?;
    if has_auto_increment {
        let id = result.last_affected_id.unwrap_or_default();
        return u64::try_from(id)
            .map_err(|_| Error::msg(format!("Unexpected generated identifier {id}")));
    }
    Ok(0)
}

async fn delete<E: Executor>(
    executor: &mut E,
    record: &dyn Record,
    filters: &[Filter<'_>],
) -> Result<u64> {
    let entity = EntityMapper::new().map(record)?;
    let mut builder = new_builder(executor);
    builder.delete(entity.relation).where_filters(filters);
    Ok(execute(executor, builder).await?.rows_affected)
}

async fn update<E: Executor>(
    executor: &mut E,
    record: &dyn Record,
    filters: &[Filter<'_>],
    selective: bool,
) -> Result<u64> {
    let entity = EntityMapper::new().map(record)?;
    let mut builder = new_builder(executor);
    builder.update(entity.relation);
    let mut assigned = 0;
    for field in entity.fields {
        if field.auto_increment || (selective && field.value.is_empty_value()) {
            continue;
        }
        builder.set(field.column, field.value);
        assigned += 1;
    }
    if assigned == 0 {
        return Err(AccessError::InvalidEntity(format!(
            "{}: no field to update",
            record.record_name()
        ))
        .into());
    }
    builder.where_filters(filters);
    Ok(execute(executor, builder).await?.rows_affected)
}

fn where_primary_key<W: SqlWriter>(builder: &mut QueryBuilder<W>, entity: &MappedEntity) {
    for (i, field) in entity.primary_keys().enumerate() {
        let text = format!("{} = {}", builder.quote(field.column), builder.arg_name());
        let args = [field.value.clone()];
        if i == 0 {
            builder.where_(&text, args);
        } else {
            builder.where_and(&text, args);
        }
    }
}

async fn update_by_primary_key<E: Executor>(
    executor: &mut E,
    record: &dyn Record,
    selective: bool,
) -> Result<u64> {
    let entity = EntityMapper::new().map(record)?;
    if entity.primary_keys().next().is_none() {
        return Err(AccessError::NoPrimaryKey(record.record_name().into()).into());
    }
    let mut builder = new_builder(executor);
    builder.update(entity.relation);
    let mut assigned = 0;
    for field in &entity.fields {
        if field.primary_key
            || field.auto_increment
            || (selective && field.value.is_empty_value())
        {
            continue;
        }
        builder.set(field.column, field.value.clone());
        assigned += 1;
    }
    if assigned == 0 {
        return Err(AccessError::InvalidEntity(format!(
            "{}: no field to update",
            record.record_name()
        ))
        .into());
    }
    where_primary_key(&mut builder, &entity);
    let affected = execute(executor, builder).await?.rows_affected;
    if affected > 0 {
        return Ok(affected);
    }
    let mut builder = new_builder(executor);
    builder
        .select(["COUNT(*)"], false)
        .from(entity.relation);
    where_primary_key(&mut builder, &entity);
    count(executor, builder).await
}

async fn count<E, W>(executor: &mut E, builder: QueryBuilder<W>) -> Result<u64>
where
    E: Executor,
    W: SqlWriter,
{
    let (sql, args) = builder.build();
    let query = prepare(executor, sql, args).await?;
    let mut stream = pin!(executor.fetch(query));
    let Some(row) = stream.try_next().await? else {
        return Ok(0);
    };
    match row.values.into_vec().into_iter().next() {
        Some(v) if !v.is_null() => u64::try_from_value(v),
        _ => Ok(0),
    }
}

async fn select_count<E: Executor>(
    executor: &mut E,
    relation: &str,
    filters: &[Filter<'_>],
) -> Result<u64> {
    let mut builder = new_builder(executor);
    builder
        .select(["COUNT(*)"], false)
        .from(relation)
        .where_filters(filters);
    count(executor, builder).await
}

async fn select_one<E: Executor, R: Record>(
    executor: &mut E,
    record: &mut R,
    filters: &[Filter<'_>],
) -> Result<()> {
    let entity = EntityMapper::new().map(record)?;
    let mut builder = new_builder(executor);
    let columns = column_list(&builder, &entity);
    builder
        .select(columns, false)
        .from(entity.relation)
        .where_filters(filters);
    let (sql, args) = builder.build();
    let query = prepare(executor, sql, args).await?;
    let mut stream = pin!(executor.fetch(query));
    let Some(row) = stream.try_next().await? else {
        return Err(AccessError::NoRows.into());
    };
    write_back(record, &entity, row)
}

async fn select_list<E, R, F>(
    executor: &mut E,
    record: &mut R,
    row: F,
    order: &OrderBy,
    filters: &[Filter<'_>],
    distinct: bool,
) -> Result<()>
where
    E: Executor,
    R: Record,
    F: FnMut(&R) + Send,
{
    let entity = EntityMapper::new().map(record)?;
    let mut builder = new_builder(executor);
    let columns = column_list(&builder, &entity);
    builder
        .select(columns, distinct)
        .from(entity.relation)
        .where_filters(filters);
    if !order.is_empty() {
        let mut text = String::new();
        order.write(builder.writer().as_dyn(), &mut text);
        builder.order(&text);
    }
    let (sql, args) = builder.build();
    let query = prepare(executor, sql, args).await?;
    scan(executor, query, &entity, record, row).await
}

#[allow(clippy::too_many_arguments)]
async fn select_page<E, R, P, F>(
    executor: &mut E,
    record: &mut R,
    page: P,
    row: F,
    size: u64,
    index: u64,
    order: &OrderBy,
    filters: &[Filter<'_>],
) -> Result<Page>
where
    E: Executor,
    R: Record,
    P: FnOnce(&Page) + Send,
    F: FnMut(&R) + Send,
{
    let entity = EntityMapper::new().map(record)?;
    let total = select_count(executor, entity.relation, filters).await?;
    let result = Page::new(total, size, index);
    page(&result);
    if total == 0 {
        return Ok(result);
    }
    let mut builder = new_builder(executor);
    let order = if order.is_empty() {
        let field = entity
            .primary_keys()
            .next()
            .or(entity.fields.first())
            .ok_or_else(|| AccessError::InvalidEntity("field empty".into()))?;
        OrderBy::new().push(field.column, field.order)
    } else {
        order.clone()
    };
    let mut order_text = String::new();
    order.write(builder.writer().as_dyn(), &mut order_text);
    let columns = column_list(&builder, &entity).join(", ");
    builder.where_filters(filters).select_page(
        &columns,
        entity.relation,
        &order_text,
        result.offset(),
        result.size,
        executor.server_version(),
    );
    let (sql, args) = builder.build();
    let query = prepare(executor, sql, args).await?;
    scan(executor, query, &entity, record, row).await?;
    Ok(result)
}
