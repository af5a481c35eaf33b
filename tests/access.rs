mod mock;

#[cfg(test)]
mod tests {
    use crate::mock::{MockConnection, Response, events, respond, server, sql, statements};
    use sqldb::{Access, AccessError, Connection, Filter, OrderBy, Page, Record, Value, is_no_rows};

    #[derive(Default, Debug, Clone, PartialEq, Record)]
    #[sqldb(name = "employee")]
    struct Employee {
        #[sqldb(primary_key, auto_increment)]
        id: Option<u64>,
        #[sqldb(filter = "LIKE")]
        name: String,
        #[sqldb]
        age: Option<i32>,
    }

    #[derive(Default, Debug, Clone, Record)]
    #[sqldb(name = "badge")]
    struct Badge {
        #[sqldb]
        code: String,
        #[sqldb]
        level: i16,
    }

    #[derive(Default, Record)]
    struct AgeIn {
        #[sqldb(name = "age", filter = "IN")]
        ages: Vec<i32>,
    }

    #[derive(Default, Record)]
    struct Unnamed {
        #[sqldb]
        value: i32,
    }

    async fn connect(name: &str) -> MockConnection {
        MockConnection::connect(format!("mock://{name}").into())
            .await
            .expect("Could not connect to the mock server")
    }

    fn employee(name: &str, age: Option<i32>) -> Employee {
        Employee {
            id: None,
            name: name.into(),
            age,
        }
    }

    fn row(id: u64, name: &str, age: i32) -> Vec<Value> {
        vec![
            Value::UInt64(Some(id)),
            Value::Varchar(Some(name.into())),
            Value::Int32(Some(age)),
        ]
    }

    #[tokio::test]
    async fn insert() {
        let state = server("insert");
        let mut connection = connect("insert").await;
        respond(&state, Response::Affected(1, Some(17)));
        let id = connection.insert(&employee("Ann", None)).await.unwrap();
        assert_eq!(id, 17);
        respond(&state, Response::Affected(1, None));
        let id = connection
            .insert(&Badge {
                code: "B1".into(),
                level: 0,
            })
            .await
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(
            statements(&state),
            [
                (
                    r#"INSERT INTO "employee" ("name","age") VALUES (?,?)"#.to_string(),
                    vec![Value::Varchar(Some("Ann".into())), Value::Int32(None)]
                ),
                (
                    r#"INSERT INTO "badge" ("code","level") VALUES (?,?)"#.to_string(),
                    vec![Value::Varchar(Some("B1".into())), Value::Int16(Some(0))]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn insert_selective() {
        let state = server("insert_selective");
        let mut connection = connect("insert_selective").await;
        respond(&state, Response::Affected(1, Some(2)));
        connection
            .insert_selective(&employee("Bob", None))
            .await
            .unwrap();
        respond(&state, Response::Affected(1, Some(3)));
        connection
            .insert_selective(&employee("", None))
            .await
            .unwrap();
        assert_eq!(
            sql(&state),
            [
                r#"INSERT INTO "employee" ("name") VALUES (?)"#,
                r#"INSERT INTO "employee" DEFAULT VALUES"#,
            ]
        );
    }

    #[tokio::test]
    async fn update() {
        let state = server("update");
        let mut connection = connect("update").await;
        let filter = employee("A%", None);
        respond(&state, Response::Affected(3, None));
        let affected = connection
            .update(&employee("Zed", None), &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(affected, 3);
        respond(&state, Response::Affected(1, None));
        connection
            .update_selective(&employee("Zed", None), &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(
            statements(&state),
            [
                (
                    r#"UPDATE "employee" SET "name" = ?, "age" = ? WHERE ("name" LIKE ?)"#
                        .to_string(),
                    vec![
                        Value::Varchar(Some("Zed".into())),
                        Value::Int32(None),
                        Value::Varchar(Some("A%".into())),
                    ]
                ),
                (
                    r#"UPDATE "employee" SET "name" = ? WHERE ("name" LIKE ?)"#.to_string(),
                    vec![
                        Value::Varchar(Some("Zed".into())),
                        Value::Varchar(Some("A%".into())),
                    ]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn update_nothing() {
        let state = server("update_nothing");
        let mut connection = connect("update_nothing").await;
        let error = connection
            .update_selective(&employee("", None), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AccessError>(),
            Some(AccessError::InvalidEntity(..))
        ));
        assert!(sql(&state).is_empty());
    }

    #[tokio::test]
    async fn update_by_primary_key() {
        let state = server("update_by_primary_key");
        let mut connection = connect("update_by_primary_key").await;
        let mut record = employee("Cid", Some(40));
        record.id = Some(8);
        respond(&state, Response::Affected(1, None));
        assert_eq!(connection.update_by_primary_key(&record).await.unwrap(), 1);
        // Nothing changed, the row is counted instead
        respond(&state, Response::Affected(0, None));
        respond(&state, Response::Rows(vec![vec![Value::Int64(Some(1))]]));
        assert_eq!(connection.update_by_primary_key(&record).await.unwrap(), 1);
        record.age = None;
        respond(&state, Response::Affected(1, None));
        connection
            .update_selective_by_primary_key(&record)
            .await
            .unwrap();
        assert_eq!(
            sql(&state),
            [
                r#"UPDATE "employee" SET "name" = ?, "age" = ? WHERE "id" = ?"#,
                r#"UPDATE "employee" SET "name" = ?, "age" = ? WHERE "id" = ?"#,
                r#"SELECT COUNT(*) FROM "employee" WHERE "id" = ?"#,
                r#"UPDATE "employee" SET "name" = ? WHERE "id" = ?"#,
            ]
        );
        assert_eq!(statements(&state)[2].1, [Value::UInt64(Some(8))]);
    }

    #[tokio::test]
    async fn update_without_primary_key() {
        let state = server("update_without_primary_key");
        let mut connection = connect("update_without_primary_key").await;
        let error = connection
            .update_by_primary_key(&Badge::default())
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AccessError>(),
            Some(AccessError::NoPrimaryKey(..))
        ));
        assert!(sql(&state).is_empty());
    }

    #[tokio::test]
    async fn delete() {
        let state = server("delete");
        let mut connection = connect("delete").await;
        respond(&state, Response::Affected(2, None));
        let filter = AgeIn { ages: vec![20, 30] };
        let affected = connection
            .delete(&Employee::default(), &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(affected, 2);
        respond(&state, Response::Affected(5, None));
        connection.delete(&Employee::default(), &[]).await.unwrap();
        assert_eq!(
            statements(&state),
            [
                (
                    r#"DELETE FROM "employee" WHERE ("age" IN (20,30))"#.to_string(),
                    vec![]
                ),
                (r#"DELETE FROM "employee""#.to_string(), vec![]),
            ]
        );
    }

    #[tokio::test]
    async fn select_one() {
        let state = server("select_one");
        let mut connection = connect("select_one").await;
        let filter = employee("Ann", None);
        let mut record = Employee::default();
        respond(&state, Response::Rows(vec![row(3, "Ann", 30)]));
        connection
            .select_one(&mut record, &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(
            record,
            Employee {
                id: Some(3),
                name: "Ann".into(),
                age: Some(30),
            }
        );
        respond(&state, Response::Rows(vec![]));
        let error = connection
            .select_one(&mut record, &[Filter::and(&filter)])
            .await
            .unwrap_err();
        assert!(is_no_rows(&error));
        assert_eq!(
            sql(&state)[0],
            r#"SELECT "id", "name", "age" FROM "employee" WHERE ("name" LIKE ?)"#
        );
    }

    #[tokio::test]
    async fn insert_then_select_by_id() {
        let state = server("insert_then_select_by_id");
        let mut connection = connect("insert_then_select_by_id").await;
        let mut inserted = employee("Dee", Some(41));
        respond(&state, Response::Affected(1, Some(17)));
        let id = connection.insert(&inserted).await.unwrap();
        assert_eq!(id, 17);
        inserted.id = Some(id as u64);

        let filter = Employee {
            id: Some(17),
            ..Default::default()
        };
        let mut fetched = Employee::default();
        respond(&state, Response::Rows(vec![row(17, "Dee", 41)]));
        connection
            .select_one(&mut fetched, &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(fetched, inserted);
        assert_eq!(
            statements(&state),
            [
                (
                    r#"INSERT INTO "employee" ("name","age") VALUES (?,?)"#.to_string(),
                    vec![Value::Varchar(Some("Dee".into())), Value::Int32(Some(41))]
                ),
                (
                    r#"SELECT "id", "name", "age" FROM "employee" WHERE ("id" = ?)"#.to_string(),
                    vec![Value::UInt64(Some(17))]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn select_list() {
        let state = server("select_list");
        let mut connection = connect("select_list").await;
        let mut record = Employee::default();
        let mut rows = Vec::new();
        respond(
            &state,
            Response::Rows(vec![row(1, "Ann", 30), row(2, "Bob", 25)]),
        );
        connection
            .select_list(
                &mut record,
                |v| rows.push(v.clone()),
                &OrderBy::new().desc("age"),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Bob");
        assert_eq!(record, rows[1]);

        respond(&state, Response::Rows(vec![]));
        let mut calls = 0;
        connection
            .select_distinct(&mut record, |_| calls += 1, &OrderBy::new(), &[])
            .await
            .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(
            sql(&state),
            [
                r#"SELECT "id", "name", "age" FROM "employee" ORDER BY "age" DESC"#,
                r#"SELECT DISTINCT "id", "name", "age" FROM "employee""#,
            ]
        );
    }

    #[tokio::test]
    async fn select_list_column_mismatch() {
        let state = server("select_list_column_mismatch");
        let mut connection = connect("select_list_column_mismatch").await;
        respond(&state, Response::Rows(vec![vec![Value::Int32(Some(1))]]));
        let mut record = Employee::default();
        assert!(
            connection
                .select_list(&mut record, |_| {}, &OrderBy::new(), &[])
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn select_count() {
        let state = server("select_count");
        let mut connection = connect("select_count").await;
        let filter = employee("", Some(30));
        respond(&state, Response::Rows(vec![vec![Value::Int64(Some(4))]]));
        let count = connection
            .select_count(&Employee::default(), &[Filter::and(&filter)])
            .await
            .unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            statements(&state),
            [(
                r#"SELECT COUNT(*) FROM "employee" WHERE ("age" = ?)"#.to_string(),
                vec![Value::Int32(Some(30))]
            )]
        );
    }

    #[tokio::test]
    async fn select_page() {
        let state = server("select_page");
        let mut connection = connect("select_page").await;
        let mut record = Employee::default();
        let mut reported = None;
        let mut rows = 0;
        respond(&state, Response::Rows(vec![vec![Value::Int64(Some(7))]]));
        respond(&state, Response::Rows(vec![row(7, "Gus", 50)]));
        let page = connection
            .select_page(
                &mut record,
                |v| reported = Some(*v),
                |_| rows += 1,
                3,
                99,
                &OrderBy::new(),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(
            page,
            Page {
                total: 7,
                page_count: 3,
                size: 3,
                index: 3,
            }
        );
        assert_eq!(reported, Some(page));
        assert_eq!(rows, 1);
        assert_eq!(record.name, "Gus");
        assert_eq!(
            statements(&state),
            [
                (r#"SELECT COUNT(*) FROM "employee""#.to_string(), vec![]),
                (
                    r#"SELECT "id", "name", "age" FROM "employee" ORDER BY "id" ASC LIMIT ? OFFSET ?"#
                        .to_string(),
                    vec![Value::UInt64(Some(3)), Value::UInt64(Some(6))]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn select_page_filtered() {
        let state = server("select_page_filtered");
        let mut connection = connect("select_page_filtered").await;
        let filter = employee("A%", None);
        let mut record = Employee::default();
        respond(&state, Response::Rows(vec![vec![Value::Int64(Some(7))]]));
        respond(&state, Response::Rows(vec![]));
        let page = connection
            .select_page(
                &mut record,
                |_| {},
                |_| {},
                3,
                0,
                &OrderBy::new().desc("age"),
                &[Filter::and(&filter)],
            )
            .await
            .unwrap();
        assert_eq!(page.index, 1);
        assert_eq!(page.offset(), 0);
        assert_eq!(
            statements(&state)[1],
            (
                r#"SELECT "id", "name", "age" FROM "employee" WHERE ("name" LIKE ?) ORDER BY "age" DESC LIMIT ? OFFSET ?"#
                    .to_string(),
                vec![
                    Value::Varchar(Some("A%".into())),
                    Value::UInt64(Some(3)),
                    Value::UInt64(Some(0)),
                ]
            )
        );
    }

    #[tokio::test]
    async fn select_page_empty() {
        let state = server("select_page_empty");
        let mut connection = connect("select_page_empty").await;
        let mut record = Employee::default();
        let mut called = false;
        respond(&state, Response::Rows(vec![vec![Value::Int64(Some(0))]]));
        let page = connection
            .select_page(
                &mut record,
                |_| called = true,
                |_| panic!("No row expected"),
                10,
                1,
                &OrderBy::new(),
                &[],
            )
            .await
            .unwrap();
        assert!(called);
        assert_eq!(page.total, 0);
        assert_eq!(page.page_count, 0);
        assert_eq!(sql(&state).len(), 1);
    }

    #[test]
    fn page_clamping() {
        assert_eq!(Page::new(7, 3, 0).index, 1);
        assert_eq!(Page::new(7, 3, 2).offset(), 3);
        assert_eq!(Page::new(7, 0, 2).size, 1);
        assert_eq!(Page::new(7, 0, 2).page_count, 7);
        assert_eq!(Page::new(6, 3, 5).index, 2);
        assert_eq!(Page::new(0, 3, 4).index, 0);
        assert_eq!(Page::new(0, 3, 0).index, 1);
        assert_eq!(Page::new(0, 3, 0).page_count, 0);
    }

    #[tokio::test]
    async fn invalid_records() {
        let state = server("invalid_records");
        let mut connection = connect("invalid_records").await;
        assert!(connection.insert(&Unnamed::default()).await.is_err());
        assert!(
            connection
                .select_count(&Unnamed::default(), &[])
                .await
                .is_err()
        );
        assert!(sql(&state).is_empty());
        assert!(events(&state).is_empty());
    }

    #[tokio::test]
    async fn driver_errors() {
        let state = server("driver_errors");
        let mut connection = connect("driver_errors").await;
        respond(&state, Response::Fail("table is locked"));
        let error = connection
            .delete(&Employee::default(), &[])
            .await
            .unwrap_err();
        assert!(format!("{error:#}").contains("table is locked"));
        assert!(!is_no_rows(&error));
    }
}
