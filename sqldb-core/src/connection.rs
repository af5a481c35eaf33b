use crate::{Driver, Executor, Result};
use std::{borrow::Cow, future::Future};

pub trait Connection: Executor {
    /// Open a connection to the given url.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    /// Start a transaction, the connection moves into it.
    fn begin(self) -> impl Future<Output = Result<<Self::Driver as Driver>::Transaction>> + Send;

    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
