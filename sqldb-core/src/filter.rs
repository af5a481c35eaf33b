use crate::{EntityMapper, QueryBuilder, Record, SqlWriter, Value};
use std::fmt::{self, Debug};

/// A record used as a condition.
///
/// Every field of `source` carrying a value becomes a predicate `column op ?`
/// where `op` is the filter operator of the column. Predicates are joined by
/// `OR` when `field_or` is set, otherwise by `AND`. The group is joined to the
/// previous groups by `OR` when `group_or` is set, otherwise by `AND`.
#[derive(Clone, Copy)]
pub struct Filter<'a> {
    pub source: &'a dyn Record,
    pub field_or: bool,
    pub group_or: bool,
}

impl<'a> Filter<'a> {
    pub fn new(source: &'a dyn Record, field_or: bool, group_or: bool) -> Self {
        Self {
            source,
            field_or,
            group_or,
        }
    }
    /// Every predicate must hold.
    pub fn and(source: &'a dyn Record) -> Self {
        Self::new(source, false, false)
    }
    /// At least one predicate must hold.
    pub fn or(source: &'a dyn Record) -> Self {
        Self::new(source, true, false)
    }
    /// Join this group to the previous ones with `OR`.
    pub fn or_group(self) -> Self {
        Self {
            group_or: true,
            ..self
        }
    }
}

impl Debug for Filter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("source", &self.source.record_name())
            .field("field_or", &self.field_or)
            .field("group_or", &self.group_or)
            .finish()
    }
}

impl<W: SqlWriter> QueryBuilder<W> {
    /// Append the `WHERE` clause of a filter list.
    ///
    /// Filters without any value are skipped. `IN` operators inline their
    /// values as a literal list and consume no placeholder.
    pub fn where_filters(&mut self, filters: &[Filter<'_>]) -> &mut Self {
        let mapper = EntityMapper::new();
        for filter in filters {
            let entity = match mapper.map_filter(filter.source) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Filter skipped: {:#}", e);
                    continue;
                }
            };
            if entity.is_empty() {
                continue;
            }
            if filter.group_or {
                self.where_or("", []);
            } else {
                self.where_and("", []);
            }
            self.append("(", []);
            for (i, field) in entity.fields.into_iter().enumerate() {
                let column = self.quote(field.column);
                let op = field.filter.trim();
                if op.eq_ignore_ascii_case("in") {
                    let list = match field.value {
                        v @ Value::List(..) => v,
                        v => {
                            let kind = Box::new(v.as_null());
                            Value::List(Some(vec![v]), kind)
                        }
                    };
                    let text = format!("{column} {op} {{}}");
                    let args = [list];
                    match (i, filter.field_or) {
                        (0, _) => self.where_format(&text, &args),
                        (_, true) => self.where_format_or(&text, &args),
                        (_, false) => self.where_format_and(&text, &args),
                    };
                } else {
                    let text = format!("{column} {op} {}", self.arg_name());
                    let args = [field.value];
                    match (i, filter.field_or) {
                        (0, _) => self.where_(&text, args),
                        (_, true) => self.where_or(&text, args),
                        (_, false) => self.where_and(&text, args),
                    };
                }
            }
            self.append(")", []);
        }
        self
    }
}
