use sqldb_core::{SelectPage, SqlWriter, Value, write_select_head};

/// MySQL dialect: backtick quoting, `?` placeholders, `LIMIT offset, size` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["FALSE", "TRUE"][value as usize]);
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                '\0' => out.push_str("\\0"),
                _ => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_default_values(&self, out: &mut String) {
        out.push_str("() VALUES ()");
    }

    fn write_select_page(&self, out: &mut String, args: &mut Vec<Value>, page: &SelectPage) {
        write_select_head(out, page);
        out.push_str(" LIMIT ");
        args.push(Value::UInt64(Some(page.offset)));
        self.write_placeholder(out, args.len());
        out.push_str(", ");
        args.push(Value::UInt64(Some(page.size)));
        self.write_placeholder(out, args.len());
    }
}
