use crate::{AccessError, Direction, Record, Result, Value};
use std::collections::HashSet;

/// One field of a record resolved for a single statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub column: &'static str,
    pub value: Value,
    /// Position in the record column table, used to write values back.
    pub slot: usize,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub filter: &'static str,
    pub order: Direction,
}

/// A record resolved into its relation name and ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedEntity {
    /// Empty when mapped in filter mode.
    pub relation: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl MappedEntity {
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|v| v.primary_key)
    }
    pub fn columns(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|v| v.column)
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Turns records into [`MappedEntity`] values.
///
/// Mapping is done per call from the static column table of the record, the
/// result is never cached.
#[derive(Default, Debug, Clone, Copy)]
pub struct EntityMapper;

impl EntityMapper {
    pub const fn new() -> Self {
        Self
    }

    /// Map a record that is a relation: the table name is required.
    pub fn map(&self, record: &dyn Record) -> Result<MappedEntity> {
        let relation = match record.table_name() {
            None => {
                return Err(invalid(record, "table name not defined"));
            }
            Some("") => {
                return Err(invalid(record, "table name is empty"));
            }
            Some(v) => v,
        };
        let fields = self.fields(record)?;
        Ok(MappedEntity { relation, fields })
    }

    /// Map a record used as a filter: no table name is needed and only the
    /// fields carrying a value are kept.
    pub fn map_filter(&self, record: &dyn Record) -> Result<MappedEntity> {
        let mut fields = self.fields(record)?;
        fields.retain(|v| !v.value.is_empty_value());
        Ok(MappedEntity {
            relation: record.table_name().unwrap_or_default(),
            fields,
        })
    }

    fn fields(&self, record: &dyn Record) -> Result<Vec<FieldDescriptor>> {
        let columns = record.columns();
        if columns.is_empty() {
            return Err(invalid(record, "field empty"));
        }
        let values = record.values();
        if values.len() != columns.len() {
            return Err(invalid(
                record,
                &format!(
                    "{} values for {} columns",
                    values.len(),
                    columns.len()
                ),
            ));
        }
        let mut seen = HashSet::with_capacity(columns.len());
        let mut result = Vec::with_capacity(columns.len());
        for (slot, (column, value)) in columns.iter().zip(values).enumerate() {
            if column.name.is_empty() {
                return Err(invalid(
                    record,
                    &format!("field `{}` has an empty column name", column.field),
                ));
            }
            if !seen.insert(column.name) {
                log::warn!(
                    "{}: column `{}` of field `{}` is already mapped, the field is ignored",
                    record.record_name(),
                    column.name,
                    column.field,
                );
                continue;
            }
            result.push(FieldDescriptor {
                column: column.name,
                value,
                slot,
                primary_key: column.primary_key,
                auto_increment: column.auto_increment,
                filter: column.filter,
                order: column.order,
            });
        }
        Ok(result)
    }
}

fn invalid(record: &dyn Record, message: &str) -> crate::Error {
    AccessError::InvalidEntity(format!("{}: {}", record.record_name(), message)).into()
}
