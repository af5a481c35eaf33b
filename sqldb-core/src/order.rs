use crate::{Direction, Record, SqlWriter, separated_by};
use std::{borrow::Cow, collections::HashSet};

/// Ordered list of sort keys.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub items: Vec<(Cow<'static, str>, Direction)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every column of the record, in declaration order, with its declared direction.
    pub fn from_record(record: &dyn Record) -> Self {
        let mut seen = HashSet::new();
        Self {
            items: record
                .columns()
                .iter()
                .filter(|v| seen.insert(v.name))
                .map(|v| (Cow::Borrowed(v.name), v.order))
                .collect(),
        }
    }

    pub fn push(mut self, column: impl Into<Cow<'static, str>>, direction: Direction) -> Self {
        self.items.push((column.into(), direction));
        self
    }

    pub fn asc(self, column: impl Into<Cow<'static, str>>) -> Self {
        self.push(column, Direction::Asc)
    }

    pub fn desc(self, column: impl Into<Cow<'static, str>>) -> Self {
        self.push(column, Direction::Desc)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `a ASC, b DESC` with quoted identifiers.
    pub fn write(&self, writer: &dyn SqlWriter, out: &mut String) {
        separated_by(
            out,
            &self.items,
            |out, (column, direction)| {
                writer.write_identifier_quoted(out, column);
                out.push(' ');
                out.push_str(direction.as_str());
            },
            ", ",
        );
    }
}
