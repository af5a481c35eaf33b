use crate::{SelectPage, SqlWriter, Value, separated_by};

/// Stateful SQL text builder over a dialect writer.
///
/// Text is accumulated in segments joined by a single space when rendered,
/// arguments are accumulated in the order their placeholders are emitted.
/// Identifiers passed to `insert`, `update`, `delete`, `from`, `value` and `set`
/// are quoted by the dialect; every other text is used verbatim.
pub struct QueryBuilder<W: SqlWriter> {
    writer: W,
    segments: Vec<String>,
    args: Vec<Value>,
    insert_at: Option<usize>,
    insert_columns: Vec<String>,
    insert_values: Vec<String>,
    has_where: bool,
    has_order: bool,
    has_set: bool,
}

impl<W: SqlWriter> QueryBuilder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            segments: Vec::new(),
            args: Vec::new(),
            insert_at: None,
            insert_columns: Vec::new(),
            insert_values: Vec::new(),
            has_where: false,
            has_order: false,
            has_set: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Clear text, arguments and every flag.
    pub fn reset(&mut self) -> &mut Self {
        self.begin();
        self.args.clear();
        self.has_where = false;
        self.has_order = false;
        self.has_set = false;
        self
    }

    fn begin(&mut self) {
        self.segments.clear();
        self.insert_at = None;
        self.insert_columns.clear();
        self.insert_values.clear();
    }

    /// Quote an identifier with the dialect rules.
    pub fn quote(&self, identifier: &str) -> String {
        let mut out = String::with_capacity(identifier.len() + 2);
        self.writer.write_identifier_quoted(&mut out, identifier);
        out
    }

    /// Placeholder the next argument will be bound to.
    pub fn arg_name(&self) -> String {
        let mut out = String::new();
        self.writer.write_placeholder(&mut out, self.args.len() + 1);
        out
    }

    /// `SELECT [DISTINCT] columns`, the columns are expressions used verbatim.
    pub fn select<I, S>(&mut self, columns: I, distinct: bool) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.begin();
        let mut out = String::from(if distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        separated_by(
            &mut out,
            columns,
            |out, v| out.push_str(v.as_ref()),
            ", ",
        );
        self.segments.push(out);
        self
    }

    pub fn insert(&mut self, relation: &str) -> &mut Self {
        self.begin();
        self.segments
            .push(format!("INSERT INTO {}", self.quote(relation)));
        self.insert_at = Some(self.segments.len());
        self
    }

    pub fn update(&mut self, relation: &str) -> &mut Self {
        self.begin();
        self.segments.push(format!("UPDATE {}", self.quote(relation)));
        self
    }

    pub fn delete(&mut self, relation: &str) -> &mut Self {
        self.begin();
        self.segments
            .push(format!("DELETE FROM {}", self.quote(relation)));
        self
    }

    pub fn from(&mut self, relation: &str) -> &mut Self {
        self.segments.push(format!("FROM {}", self.quote(relation)));
        self
    }

    /// Column and bound value of an insert.
    pub fn value(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.insert_columns.push(self.quote(column));
        self.insert_values.push(self.arg_name());
        self.args.push(value.into());
        self
    }

    /// `SET column = ?` then `, column = ?`.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        let keyword = if self.has_set { "," } else { "SET" };
        self.has_set = true;
        let segment = format!("{} {} = {}", keyword, self.quote(column), self.arg_name());
        self.segments.push(segment);
        self.args.push(value.into());
        self
    }

    fn where_keyword(&mut self, joiner: Option<&'static str>) {
        if !self.has_where {
            self.segments.push("WHERE".into());
            self.has_where = true;
        } else if let Some(joiner) = joiner {
            self.segments.push(joiner.into());
        }
    }

    fn push_text<I>(&mut self, text: &str, args: I)
    where
        I: IntoIterator<Item = Value>,
    {
        if !text.is_empty() {
            self.segments.push(text.into());
        }
        self.args.extend(args);
    }

    /// Condition with bound arguments, emits `WHERE` only the first time.
    pub fn where_<I>(&mut self, text: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.where_keyword(None);
        self.push_text(text, args);
        self
    }

    pub fn where_and<I>(&mut self, text: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.where_keyword(Some("AND"));
        self.push_text(text, args);
        self
    }

    pub fn where_or<I>(&mut self, text: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.where_keyword(Some("OR"));
        self.push_text(text, args);
        self
    }

    /// Condition with inlined literals: each `{}` in `format` is replaced by
    /// the literal rendering of the next argument.
    pub fn where_format(&mut self, format: &str, args: &[Value]) -> &mut Self {
        let text = self.render_format(format, args);
        self.where_keyword(None);
        self.push_text(&text, []);
        self
    }

    pub fn where_format_and(&mut self, format: &str, args: &[Value]) -> &mut Self {
        let text = self.render_format(format, args);
        self.where_keyword(Some("AND"));
        self.push_text(&text, []);
        self
    }

    pub fn where_format_or(&mut self, format: &str, args: &[Value]) -> &mut Self {
        let text = self.render_format(format, args);
        self.where_keyword(Some("OR"));
        self.push_text(&text, []);
        self
    }

    /// `ORDER BY text` then `, text`.
    pub fn order(&mut self, text: &str) -> &mut Self {
        if self.has_order {
            self.segments.push(format!(", {text}"));
        } else {
            self.segments.push(format!("ORDER BY {text}"));
            self.has_order = true;
        }
        self
    }

    pub fn append<I>(&mut self, text: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.push_text(text, args);
        self
    }

    pub fn append_format(&mut self, format: &str, args: &[Value]) -> &mut Self {
        let text = self.render_format(format, args);
        self.push_text(&text, []);
        self
    }

    /// Replace the current statement with a paginated select whose condition
    /// is the text accumulated so far.
    pub fn select_page(
        &mut self,
        columns: &str,
        relation: &str,
        order: &str,
        offset: u64,
        size: u64,
        server_version: u32,
    ) -> &mut Self {
        let condition = self.query();
        let relation = self.quote(relation);
        let mut out = String::new();
        self.writer.write_select_page(
            &mut out,
            &mut self.args,
            &SelectPage {
                columns,
                relation: &relation,
                condition: &condition,
                order,
                offset,
                size,
                server_version,
            },
        );
        self.begin();
        self.segments.push(out);
        self
    }

    fn render_format(&self, format: &str, args: &[Value]) -> String {
        let mut out = String::with_capacity(format.len());
        let mut args = args.iter();
        let mut rest = format;
        while let Some(position) = rest.find("{}") {
            out.push_str(&rest[..position]);
            match args.next() {
                Some(v) => self.writer.write_value(&mut out, v),
                None => out.push_str("{}"),
            }
            rest = &rest[position + 2..];
        }
        out.push_str(rest);
        out
    }

    /// Render the statement.
    pub fn query(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if self.insert_at == Some(i) {
                self.write_insert_values(&mut out);
            }
            push_segment(&mut out, segment);
        }
        if self.insert_at == Some(self.segments.len()) {
            self.write_insert_values(&mut out);
        }
        out
    }

    fn write_insert_values(&self, out: &mut String) {
        let mut values = String::new();
        if self.insert_columns.is_empty() {
            self.writer.write_default_values(&mut values);
        } else {
            values.push('(');
            values.push_str(&self.insert_columns.join(","));
            values.push_str(") VALUES (");
            values.push_str(&self.insert_values.join(","));
            values.push(')');
        }
        push_segment(out, &values);
    }

    /// Bound arguments, in placeholder order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Rendered statement and its arguments.
    pub fn build(self) -> (String, Vec<Value>) {
        (self.query(), self.args)
    }
}

fn push_segment(out: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with('(') && !segment.starts_with([')', ',']) {
        out.push(' ');
    }
    out.push_str(segment);
}
