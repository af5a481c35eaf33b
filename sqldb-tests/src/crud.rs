use crate::{Person, clear};
use rust_decimal::Decimal;
use sqldb::{Database, Driver, Filter};
use time::macros::date;
use tokio::sync::Mutex;

static MUTEX: Mutex<()> = Mutex::const_new(());

pub async fn crud<D: Driver>(database: &Database<D>) {
    let _lock = MUTEX.lock().await;
    clear(database).await;

    // Insert
    let mut ada = Person {
        score: Some(Decimal::new(9950, 2)),
        birthday: Some(date!(1815 - 12 - 10)),
        ..Person::new("Ada", 36)
    };
    let id = database.insert(&ada).await.expect("Failed to insert Ada");
    assert!(id > 0);
    ada.id = Some(id as _);
    let id = database
        .insert_selective(&Person {
            name: "Grace".into(),
            ..Default::default()
        })
        .await
        .expect("Failed to insert Grace");
    let grace_id = id as i64;
    assert_eq!(
        database
            .select_count(&Person::default(), &[])
            .await
            .expect("Failed to count"),
        2
    );

    // Select one
    let mut found = Person::default();
    let filter = Person {
        id: ada.id,
        ..Default::default()
    };
    database
        .select_one(&mut found, &[Filter::and(&filter)])
        .await
        .expect("Failed to select Ada");
    assert_eq!(found, ada);
    let mut found = Person::default();
    let filter = Person {
        id: Some(grace_id),
        ..Default::default()
    };
    database
        .select_one(&mut found, &[Filter::and(&filter)])
        .await
        .expect("Failed to select Grace");
    assert_eq!(found.name, "Grace");
    assert_eq!(found.age, None);
    assert_eq!(found.active, None);

    // Full update, the empty columns are bound as typed nulls
    found.active = Some(false);
    assert_eq!(
        database
            .update_by_primary_key(&found)
            .await
            .expect("Failed to update Grace"),
        1
    );
    let mut updated = Person::default();
    database
        .select_one(&mut updated, &[Filter::and(&filter)])
        .await
        .expect("Failed to select Grace again");
    assert_eq!(updated, found);
    assert_eq!(updated.score, None);
    assert_eq!(updated.birthday, None);

    // Update by primary key
    ada.age = Some(37);
    assert_eq!(
        database
            .update_by_primary_key(&ada)
            .await
            .expect("Failed to update Ada"),
        1
    );
    // Same values again, the row still counts
    assert_eq!(
        database
            .update_by_primary_key(&ada)
            .await
            .expect("Failed to update Ada again"),
        1
    );
    let selective = Person {
        id: ada.id,
        name: "Ada Lovelace".into(),
        ..Default::default()
    };
    database
        .update_selective_by_primary_key(&selective)
        .await
        .expect("Failed to rename Ada");
    let mut found = Person::default();
    let filter = Person {
        id: ada.id,
        ..Default::default()
    };
    database
        .select_one(&mut found, &[Filter::and(&filter)])
        .await
        .expect("Failed to select Ada");
    assert_eq!(found.name, "Ada Lovelace");
    assert_eq!(found.age, Some(37));
    assert_eq!(found.score, Some(Decimal::new(9950, 2)));

    // Update with filters
    let filter = Person {
        name: "Gr%".into(),
        ..Default::default()
    };
    let affected = database
        .update_selective(
            &Person {
                age: Some(85),
                ..Default::default()
            },
            &[Filter::and(&filter)],
        )
        .await
        .expect("Failed to update Grace");
    assert_eq!(affected, 1);

    // Delete
    let filter = Person {
        name: "Ada%".into(),
        ..Default::default()
    };
    let affected = database
        .delete(&Person::default(), &[Filter::and(&filter)])
        .await
        .expect("Failed to delete Ada");
    assert_eq!(affected, 1);
    let mut found = Person::default();
    let error = database
        .select_one(&mut found, &[Filter::and(&filter)])
        .await
        .expect_err("Ada should be gone");
    assert!(database.is_no_rows(&error));
}
