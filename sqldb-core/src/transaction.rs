use crate::{Executor, Result};
use std::future::Future;

/// An open transaction owning its connection.
pub trait Transaction: Executor {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}
