use crate::{ColumnDef, Result, Value};
use std::any;

/// A struct whose fields map to the columns of a relation.
///
/// Usually implemented with `#[derive(Record)]`. The trait is object safe:
/// filters and orders hold records as `&dyn Record`.
///
/// Field positions are shared by [`Record::columns`], [`Record::values`] and
/// [`Record::assign`]: the value at index `i` belongs to the column at index `i`
/// and is written back with `assign(i, ..)`.
pub trait Record: Send + Sync {
    /// Name of the relation, `None` for records that are not tables (filters, orders).
    fn table_name(&self) -> Option<&'static str>;

    /// Static column table of the type, embedded records flattened in place.
    fn column_defs() -> &'static [ColumnDef]
    where
        Self: Sized;

    /// Same as [`Record::column_defs`], usable through `dyn Record`.
    fn columns(&self) -> &'static [ColumnDef];

    /// Current values, one per column.
    fn values(&self) -> Vec<Value>;

    /// Write a value read from the database into the field at `index`.
    fn assign(&mut self, index: usize, value: Value) -> Result<()>;

    fn record_name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}
