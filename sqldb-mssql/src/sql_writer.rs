use sqldb_core::{SelectPage, SqlWriter, Value, write_select_head};
use std::fmt::Write;

/// First SQL Server release understanding `OFFSET ... FETCH`.
const OFFSET_FETCH_VERSION: u32 = 2012;

/// SQL Server dialect: bracket quoting, `@P1` placeholders, unicode string
/// literals and version dependent pagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSSQLSqlWriter {}

impl SqlWriter for MSSQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('[');
        self.write_escaped(out, value, ']', "]]");
        out.push(']');
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        let _ = write!(out, "@P{index}");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push_str("N'");
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("0x");
        for byte in value {
            let _ = write!(out, "{byte:02X}");
        }
    }

    fn write_version_query(&self, out: &mut String) {
        out.push_str("SELECT @@VERSION");
    }

    /// `OFFSET ... FETCH` from 2012 on (and when the version is unknown),
    /// a `ROW_NUMBER()` window on older servers.
    fn write_select_page(&self, out: &mut String, _args: &mut Vec<Value>, page: &SelectPage) {
        if page.server_version == 0 || page.server_version >= OFFSET_FETCH_VERSION {
            write_select_head(out, page);
            let _ = write!(
                out,
                " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                page.offset, page.size
            );
            return;
        }
        let _ = write!(
            out,
            "SELECT {columns} FROM (SELECT {columns}, ROW_NUMBER() OVER(ORDER BY {order}) AS [RowNumber] FROM {relation}",
            columns = page.columns,
            order = page.order,
            relation = page.relation,
        );
        if !page.condition.is_empty() {
            out.push(' ');
            out.push_str(page.condition);
        }
        let _ = write!(
            out,
            ") AS [page] WHERE [RowNumber] BETWEEN {} AND {} ORDER BY [RowNumber]",
            page.offset + 1,
            page.offset + page.size
        );
    }
}
