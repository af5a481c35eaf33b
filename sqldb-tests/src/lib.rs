mod crud;
mod filters;
mod pages;
mod person;
mod transactions;

use crate::{crud::crud, filters::filters, pages::pages, transactions::transactions};
use log::LevelFilter;
pub use person::*;
use sqldb::{Connection, Database, Driver, Executor};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole suite. `setup` holds the dialect statements that (re)create
/// the [`Person`] table, they are executed first.
pub async fn execute_tests<D: Driver>(database: &Database<D>, setup: &[&str]) {
    let version = database
        .test()
        .await
        .expect("Could not read the server version");
    log::info!("Connected to {} {}", D::NAME, version);
    let mut connection = database.connect().await.expect("Could not connect");
    for statement in setup {
        connection
            .execute(statement.to_string().into())
            .await
            .expect("Could not run the setup statement");
    }
    connection.disconnect().await.expect("Could not disconnect");

    crud(database).await;
    filters(database).await;
    pages(database).await;
    #[cfg(not(feature = "disable-transactions"))]
    transactions(database).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
