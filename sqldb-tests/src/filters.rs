use crate::{Person, PersonIds, clear};
use sqldb::{Database, Driver, Filter, OrderBy, Record};
use tokio::sync::Mutex;

static MUTEX: Mutex<()> = Mutex::const_new(());

pub async fn filters<D: Driver>(database: &Database<D>) {
    let _lock = MUTEX.lock().await;
    clear(database).await;

    let mut ids = Vec::new();
    for (name, age) in [("Alan", 41), ("Alonzo", 92), ("Barbara", 41), ("Claude", 84)] {
        let id = database
            .insert(&Person::new(name, age))
            .await
            .expect("Failed to insert a person");
        ids.push(id as i64);
    }

    let mut names = Vec::new();
    let mut person = Person::default();
    let filter = Person {
        name: "Al%".into(),
        ..Default::default()
    };
    database
        .select_list(
            &mut person,
            |v| names.push(v.name.clone()),
            &OrderBy::new().desc("name"),
            &[Filter::and(&filter)],
        )
        .await
        .expect("Failed to select by name");
    assert_eq!(names, ["Alonzo", "Alan"]);

    // (name LIKE 'C%') OR (age = 41)
    let by_name = Person {
        name: "C%".into(),
        ..Default::default()
    };
    let by_age = Person {
        age: Some(41),
        ..Default::default()
    };
    let count = database
        .select_count(
            &Person::default(),
            &[Filter::and(&by_name), Filter::and(&by_age).or_group()],
        )
        .await
        .expect("Failed to count");
    assert_eq!(count, 3);

    // name LIKE 'B%' OR age = 92, inside a single group
    let either = Person {
        name: "B%".into(),
        age: Some(92),
        ..Default::default()
    };
    let count = database
        .select_count(&Person::default(), &[Filter::or(&either)])
        .await
        .expect("Failed to count");
    assert_eq!(count, 2);

    let in_ids = PersonIds {
        ids: vec![ids[0], ids[3]],
    };
    let mut names = Vec::new();
    database
        .select_list(
            &mut person,
            |v| names.push(v.name.clone()),
            &OrderBy::new().asc("name"),
            &[Filter::and(&in_ids)],
        )
        .await
        .expect("Failed to select by ids");
    assert_eq!(names, ["Alan", "Claude"]);

    let mut ages = Vec::new();
    let mut age = AgeOnly::default();
    database
        .select_distinct(&mut age, |v| ages.push(v.age), &OrderBy::new().asc("age"), &[])
        .await
        .expect("Failed to select distinct ages");
    assert_eq!(ages, [41, 84, 92]);
}

/// The person table seen through its age column only.
#[derive(Default, Debug, Record)]
#[sqldb(name = "sqldb_person")]
struct AgeOnly {
    #[sqldb]
    age: i32,
}
