use crate::{AccessError, Result};
use std::fmt::{self, Display};

/// Sort direction of a column.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Case insensitive, `asc` or `desc`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(AccessError::InvalidEntity(format!("unknown sort direction `{value}`")).into())
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata of one mapped field.
///
/// Produced once per record type (usually by `#[derive(Record)]`), it never
/// holds a value: values are read from the record at mapping time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name in the relation.
    pub name: &'static str,
    /// Name of the Rust field the column is read from.
    pub field: &'static str,
    pub primary_key: bool,
    /// Generated by the server, skipped by inserts and updates.
    pub auto_increment: bool,
    /// Comparison operator used when the record acts as a filter.
    pub filter: &'static str,
    /// Direction used when the record acts as an order.
    pub order: Direction,
}

impl ColumnDef {
    pub const fn new(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            primary_key: false,
            auto_increment: false,
            filter: "=",
            order: Direction::Asc,
        }
    }
    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }
    pub const fn auto_increment(self) -> Self {
        Self {
            auto_increment: true,
            ..self
        }
    }
    pub const fn filter(self, filter: &'static str) -> Self {
        Self { filter, ..self }
    }
    pub const fn order(self, order: Direction) -> Self {
        Self { order, ..self }
    }
}
