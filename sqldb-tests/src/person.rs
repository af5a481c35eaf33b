use rust_decimal::Decimal;
use sqldb::{Database, Driver, Record};
use time::Date;

#[derive(Default, Debug, Clone, PartialEq, Record)]
#[sqldb(name = "sqldb_person")]
pub struct Person {
    #[sqldb(primary_key, auto_increment)]
    pub id: Option<i64>,
    #[sqldb(filter = "LIKE")]
    pub name: String,
    #[sqldb]
    pub age: Option<i32>,
    #[sqldb]
    pub score: Option<Decimal>,
    #[sqldb(name = "birth")]
    pub birthday: Option<Date>,
    #[sqldb]
    pub active: Option<bool>,
}

impl Person {
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            name: name.into(),
            age: Some(age),
            active: Some(true),
            ..Default::default()
        }
    }
}

/// Ids of a person, as a filter.
#[derive(Default, Debug, Record)]
pub struct PersonIds {
    #[sqldb(name = "id", filter = "IN")]
    pub ids: Vec<i64>,
}

/// Remove every person.
pub async fn clear<D: Driver>(database: &Database<D>) {
    database
        .delete(&Person::default(), &[])
        .await
        .expect("Could not clear the person table");
}
