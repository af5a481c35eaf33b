#[cfg(test)]
mod tests {
    use sqldb_core::{OrderBy, QueryBuilder, SqlWriter, Value};
    use sqldb_mysql::MySQLSqlWriter;
    use time::macros::datetime;

    const WRITER: MySQLSqlWriter = MySQLSqlWriter {};

    #[test]
    fn identifiers() {
        let builder = QueryBuilder::new(WRITER);
        assert_eq!(builder.quote("name"), "`name`");
        assert_eq!(builder.quote("odd`name"), "`odd``name`");
        assert_eq!(builder.arg_name(), "?");
    }

    #[test]
    fn literals() {
        macro_rules! literal {
            ($value:expr, $expected:literal) => {{
                let mut out = String::new();
                WRITER.write_value(&mut out, &$value.into());
                assert_eq!(out, $expected);
            }};
        }
        literal!(true, "TRUE");
        literal!(false, "FALSE");
        literal!(r"C:\temp", r"'C:\\temp'");
        literal!("it's", "'it''s'");
        literal!(datetime!(2024-06-30 23:59:59.5), "'2024-06-30 23:59:59.5'");
        literal!(vec!["x".to_string()], "('x')");
    }

    #[test]
    fn insert_without_values() {
        let mut builder = QueryBuilder::new(WRITER);
        builder.insert("log");
        assert_eq!(builder.query(), "INSERT INTO `log` () VALUES ()");
    }

    #[test]
    fn page() {
        let mut builder = QueryBuilder::new(WRITER);
        let mut order = String::new();
        OrderBy::new().desc("id").write(&WRITER, &mut order);
        builder
            .where_("`age` > ?", [Value::Int32(Some(30))])
            .select_page("`id`, `name`", "person", &order, 40, 20, 8);
        let (sql, args) = builder.build();
        assert_eq!(
            sql,
            "SELECT `id`, `name` FROM `person` WHERE `age` > ? ORDER BY `id` DESC LIMIT ?, ?"
        );
        assert_eq!(
            args,
            [
                Value::Int32(Some(30)),
                Value::UInt64(Some(40)),
                Value::UInt64(Some(20)),
            ]
        );
    }
}
