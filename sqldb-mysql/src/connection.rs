use crate::{MySQLDriver, MySQLQueryable, MySQLTransaction};
use mysql_async::{Conn, Opts, prelude::Queryable};
use sqldb_core::{
    Connection, Context, Driver, Error, Result, impl_executor_transaction, truncate_long,
};
use std::{borrow::Cow, time::Duration};
use url::Url;

/// A single MySQL connection, owned by the session using it.
pub struct MySQLConnection {
    pub(crate) conn: MySQLQueryable<Conn>,
}

impl_executor_transaction!(MySQLDriver, MySQLConnection, conn);

/// Url options handled here instead of by `mysql_async`.
#[derive(Default, Debug)]
struct Extras {
    charset: Option<String>,
    timeout: Option<Duration>,
}

/// Remove `charset` and `timeout` from the query string of the url.
fn take_extras(url: &mut Url) -> Result<Extras> {
    let mut extras = Extras::default();
    let mut rest = Vec::new();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "charset" => {
                if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(Error::msg(format!("Invalid charset `{value}`")));
                }
                extras.charset = Some(value.into_owned());
            }
            "timeout" => {
                let seconds = value
                    .trim_end_matches('s')
                    .parse::<u64>()
                    .with_context(|| format!("Invalid timeout `{value}`"))?;
                if seconds > 0 {
                    extras.timeout = Some(Duration::from_secs(seconds));
                }
            }
            _ => rest.push((key.into_owned(), value.into_owned())),
        }
    }
    url.set_query(None);
    if !rest.is_empty() {
        url.query_pairs_mut().extend_pairs(rest);
    }
    Ok(extras)
}

impl MySQLConnection {
    async fn open(url: &str) -> Result<Self> {
        let mut url = Url::parse(url)?;
        let extras = take_extras(&mut url)?;
        let options = Opts::from_url(url.as_str())?;
        let mut conn = match extras.timeout {
            Some(timeout) => tokio::time::timeout(timeout, Conn::new(options))
                .await
                .map_err(|_| Error::msg(format!("Timed out after {}s", timeout.as_secs())))??,
            None => Conn::new(options).await?,
        };
        if let Some(charset) = extras.charset {
            conn.query_drop(format!("SET NAMES {charset}")).await?;
        }
        let server_version = conn.server_version().0 as u32;
        Ok(Self {
            conn: MySQLQueryable {
                executor: conn,
                server_version,
            },
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: Cow<'static, str>) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        Self::open(&url).await.with_context(context).map_err(|e| {
            log::error!("{:#}", e);
            e
        })
    }

    async fn begin(self) -> Result<MySQLTransaction> {
        MySQLTransaction::new(self).await
    }

    async fn disconnect(self) -> Result<()> {
        self.conn.executor.disconnect().await.map_err(|e| {
            let e = Error::new(e).context("While disconnecting from MySQL");
            log::error!("{:#}", e);
            e
        })
    }
}
