use crate::{Person, clear};
use sqldb::{Access, Database, Driver, Filter};
use tokio::sync::Mutex;

static MUTEX: Mutex<()> = Mutex::const_new(());

pub async fn transactions<D: Driver>(database: &Database<D>) {
    let _lock = MUTEX.lock().await;
    clear(database).await;

    let mut session = database
        .new_access(true)
        .await
        .expect("Could not begin a transaction");
    session
        .insert(&Person::new("rolled back", 1))
        .await
        .expect("Failed to insert inside the transaction");
    assert_eq!(
        session
            .select_count(&Person::default(), &[])
            .await
            .expect("Failed to count inside the transaction"),
        1
    );
    session.close().await.expect("Failed to roll back");
    assert_eq!(
        database
            .select_count(&Person::default(), &[])
            .await
            .expect("Failed to count"),
        0
    );

    let mut session = database
        .new_access(true)
        .await
        .expect("Could not begin a transaction");
    for (name, age) in [("kept", 2), ("also kept", 3)] {
        session
            .insert(&Person::new(name, age))
            .await
            .expect("Failed to insert inside the transaction");
    }
    let filter = Person {
        name: "also%".into(),
        ..Default::default()
    };
    session
        .delete(&Person::default(), &[Filter::and(&filter)])
        .await
        .expect("Failed to delete inside the transaction");
    session.commit().await.expect("Failed to commit");
    assert_eq!(
        database
            .select_count(&Person::default(), &[])
            .await
            .expect("Failed to count"),
        1
    );
}
