use crate::{Value, separated_by};
use std::fmt::Write;
use time::{Date, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Everything a paginated select needs, already rendered by the query builder.
#[derive(Debug, Clone, Copy)]
pub struct SelectPage<'a> {
    /// Comma separated, quoted column list.
    pub columns: &'a str,
    /// Quoted relation name.
    pub relation: &'a str,
    /// The `WHERE ...` clause, possibly empty.
    pub condition: &'a str,
    /// Order list without the `ORDER BY` keywords, never empty.
    pub order: &'a str,
    /// Rows to skip.
    pub offset: u64,
    /// Rows to return.
    pub size: u64,
    /// Major version reported by the server, 0 when unknown.
    pub server_version: u32,
}

/// Dialect specific SQL rendering.
///
/// The default methods write standard SQL, dialects override what differs:
/// identifier quoting, placeholders, literal forms and pagination.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    /// Placeholder of the argument at `index`, counting from 1.
    fn write_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    /// Literal rendering, used where a value is inlined instead of bound.
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(out, *v),
            Value::Float64(Some(v)) => write_float!(out, *v),
            Value::Decimal(Some(v)) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v.as_ref()),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push(' ');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            Value::List(Some(v), ..) => self.write_value_list(out, v),
            _ => self.write_value_none(out),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL")
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize])
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
    }

    /// Parenthesized list, the right hand side of `IN`.
    fn write_value_list(&self, out: &mut String, values: &[Value]) {
        out.push('(');
        separated_by(out, values, |out, v| self.write_value(out, v), ",");
        out.push(')');
    }

    /// Query returning the server version as text.
    fn write_version_query(&self, out: &mut String) {
        out.push_str("SELECT VERSION()");
    }

    /// Tail of an `INSERT INTO relation` that sets no column.
    fn write_default_values(&self, out: &mut String) {
        out.push_str("DEFAULT VALUES");
    }

    /// Paginated select. Arguments introduced by the dialect are appended to `args`.
    fn write_select_page(&self, out: &mut String, args: &mut Vec<Value>, page: &SelectPage) {
        write_select_head(out, page);
        out.push_str(" LIMIT ");
        args.push(Value::UInt64(Some(page.size)));
        self.write_placeholder(out, args.len());
        out.push_str(" OFFSET ");
        args.push(Value::UInt64(Some(page.offset)));
        self.write_placeholder(out, args.len());
    }
}

/// `SELECT columns FROM relation [WHERE ...] ORDER BY order`
pub fn write_select_head(out: &mut String, page: &SelectPage) {
    out.push_str("SELECT ");
    out.push_str(page.columns);
    out.push_str(" FROM ");
    out.push_str(page.relation);
    if !page.condition.is_empty() {
        out.push(' ');
        out.push_str(page.condition);
    }
    out.push_str(" ORDER BY ");
    out.push_str(page.order);
}

/// Standard SQL, used when no dialect is involved.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
