use crate::{Person, clear};
use sqldb::{Database, Driver, Filter, OrderBy, Page};
use tokio::sync::Mutex;

static MUTEX: Mutex<()> = Mutex::const_new(());

async fn page_names<D: Driver>(
    database: &Database<D>,
    size: u64,
    index: u64,
    order: &OrderBy,
    filters: &[Filter<'_>],
) -> (Page, Vec<String>) {
    let mut names = Vec::new();
    let mut reported = None;
    let mut person = Person::default();
    let page = database
        .select_page(
            &mut person,
            |v| reported = Some(*v),
            |v| names.push(v.name.clone()),
            size,
            index,
            order,
            filters,
        )
        .await
        .expect("Failed to select a page");
    assert_eq!(reported, Some(page));
    (page, names)
}

pub async fn pages<D: Driver>(database: &Database<D>) {
    let _lock = MUTEX.lock().await;
    clear(database).await;

    let order = OrderBy::new().asc("name");
    let (page, names) = page_names(database, 3, 1, &order, &[]).await;
    assert_eq!(page.total, 0);
    assert_eq!(page.page_count, 0);
    assert!(names.is_empty());

    for (i, name) in ["a", "b", "c", "d", "e", "f", "g"].into_iter().enumerate() {
        database
            .insert(&Person::new(name, 20 + i as i32))
            .await
            .expect("Failed to insert a person");
    }

    let (page, names) = page_names(database, 3, 1, &order, &[]).await;
    assert_eq!(
        page,
        Page {
            total: 7,
            page_count: 3,
            size: 3,
            index: 1,
        }
    );
    assert_eq!(names, ["a", "b", "c"]);

    let (page, names) = page_names(database, 3, 99, &order, &[]).await;
    assert_eq!(page.index, 3);
    assert_eq!(names, ["g"]);

    let (page, names) = page_names(database, 3, 0, &order, &[]).await;
    assert_eq!(page.index, 1);
    assert_eq!(names, ["a", "b", "c"]);

    // Default order is the primary key
    let (_, names) = page_names(database, 2, 2, &OrderBy::new(), &[]).await;
    assert_eq!(names, ["c", "d"]);

    let older = Person {
        age: Some(23),
        ..Default::default()
    };
    let filter = Filter::and(&older);
    let (page, names) = page_names(database, 2, 1, &OrderBy::new().desc("name"), &[filter]).await;
    assert_eq!(page.total, 1);
    assert_eq!(names, ["d"]);

    // Same request twice, same rows
    let first = page_names(database, 2, 1, &order, &[filter]).await;
    let second = page_names(database, 2, 1, &order, &[filter]).await;
    assert_eq!(first, second);
}
