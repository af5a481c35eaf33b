#[cfg(test)]
mod tests {
    use sqldb_core::{
        AccessError, AsValue, ColumnDef, Direction, EntityMapper, Error, OrderBy, Record, Result,
        Value,
    };

    struct Account {
        id: u64,
        login: String,
        nickname: String,
        score: Option<i32>,
    }
    impl Record for Account {
        fn table_name(&self) -> Option<&'static str> {
            Some("account")
        }
        fn column_defs() -> &'static [ColumnDef] {
            static COLUMNS: [ColumnDef; 4] = [
                ColumnDef::new("id", "id").primary_key().auto_increment(),
                ColumnDef::new("login", "login"),
                ColumnDef::new("login", "nickname"),
                ColumnDef::new("score", "score").order(Direction::Desc),
            ];
            &COLUMNS
        }
        fn columns(&self) -> &'static [ColumnDef] {
            Self::column_defs()
        }
        fn values(&self) -> Vec<Value> {
            vec![
                self.id.as_value(),
                self.login.clone().as_value(),
                self.nickname.clone().as_value(),
                self.score.as_value(),
            ]
        }
        fn assign(&mut self, index: usize, value: Value) -> Result<()> {
            match index {
                0 => self.id = AsValue::try_from_value(value)?,
                1 => self.login = AsValue::try_from_value(value)?,
                2 => self.nickname = AsValue::try_from_value(value)?,
                3 => self.score = AsValue::try_from_value(value)?,
                _ => return Err(Error::msg("out of range")),
            }
            Ok(())
        }
    }

    /// Configurable shape, for the failure cases.
    struct Shape {
        table: Option<&'static str>,
        columns: &'static [ColumnDef],
        values: usize,
    }
    impl Record for Shape {
        fn table_name(&self) -> Option<&'static str> {
            self.table
        }
        fn column_defs() -> &'static [ColumnDef] {
            &[]
        }
        fn columns(&self) -> &'static [ColumnDef] {
            self.columns
        }
        fn values(&self) -> Vec<Value> {
            vec![Value::Int32(Some(1)); self.values]
        }
        fn assign(&mut self, _index: usize, _value: Value) -> Result<()> {
            Ok(())
        }
    }

    static ONE: [ColumnDef; 1] = [ColumnDef::new("a", "a")];
    static NAMELESS: [ColumnDef; 1] = [ColumnDef::new("", "a")];

    fn account() -> Account {
        Account {
            id: 0,
            login: "root".into(),
            nickname: "admin".into(),
            score: None,
        }
    }

    fn invalid_entity(error: Error) -> String {
        match error.downcast_ref::<AccessError>() {
            Some(AccessError::InvalidEntity(message)) => message.clone(),
            _ => panic!("Unexpected error: {error:#}"),
        }
    }

    #[test]
    fn map() {
        let entity = EntityMapper::new().map(&account()).unwrap();
        assert_eq!(entity.relation, "account");
        assert_eq!(entity.columns().collect::<Vec<_>>(), ["id", "login", "score"]);
        let id = &entity.fields[0];
        assert!(id.primary_key && id.auto_increment);
        assert_eq!(id.value, Value::UInt64(Some(0)));
        assert_eq!(entity.fields[1].value, Value::Varchar(Some("root".into())));
        assert_eq!(entity.fields[2].slot, 3);
        assert_eq!(entity.fields[2].order, Direction::Desc);
        assert_eq!(entity.fields[2].filter, "=");
        assert_eq!(entity.primary_keys().count(), 1);
    }

    #[test]
    fn map_filter() {
        let entity = EntityMapper::new().map_filter(&account()).unwrap();
        assert_eq!(entity.relation, "account");
        // Zero is a value, the null score is not.
        assert_eq!(entity.columns().collect::<Vec<_>>(), ["id", "login"]);

        let entity = EntityMapper::new()
            .map_filter(&Shape {
                table: None,
                columns: &ONE,
                values: 1,
            })
            .unwrap();
        assert_eq!(entity.relation, "");
        assert_eq!(entity.len(), 1);
    }

    #[test]
    fn table_name_required() {
        let mapper = EntityMapper::new();
        let error = mapper
            .map(&Shape {
                table: None,
                columns: &ONE,
                values: 1,
            })
            .unwrap_err();
        assert!(invalid_entity(error).ends_with("table name not defined"));
        let error = mapper
            .map(&Shape {
                table: Some(""),
                columns: &ONE,
                values: 1,
            })
            .unwrap_err();
        assert!(invalid_entity(error).ends_with("table name is empty"));
    }

    #[test]
    fn malformed() {
        let mapper = EntityMapper::new();
        let error = mapper
            .map(&Shape {
                table: Some("t"),
                columns: &[],
                values: 0,
            })
            .unwrap_err();
        assert!(invalid_entity(error).ends_with("field empty"));
        let error = mapper
            .map_filter(&Shape {
                table: Some("t"),
                columns: &ONE,
                values: 2,
            })
            .unwrap_err();
        assert!(invalid_entity(error).contains("2 values for 1 columns"));
        let error = mapper
            .map(&Shape {
                table: Some("t"),
                columns: &NAMELESS,
                values: 1,
            })
            .unwrap_err();
        assert!(invalid_entity(error).contains("empty column name"));
    }

    #[test]
    fn assign() {
        let mut record = account();
        record.assign(3, Value::Int64(Some(12))).unwrap();
        record.assign(0, Value::Int32(Some(5))).unwrap();
        assert_eq!(record.score, Some(12));
        assert_eq!(record.id, 5);
        assert!(record.assign(0, Value::Int32(Some(-5))).is_err());
        record.assign(3, Value::Int32(None)).unwrap();
        assert_eq!(record.score, None);
    }

    #[test]
    fn order_from_record() {
        let order = OrderBy::from_record(&account());
        assert_eq!(
            order,
            OrderBy::new()
                .asc("id")
                .asc("login")
                .push("score", Direction::Desc)
        );
        assert_eq!(Direction::parse(" DESC ").unwrap(), Direction::Desc);
        assert!(Direction::parse("up").is_err());
    }
}
