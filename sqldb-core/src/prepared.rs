use crate::{AsValue, Result};
use std::fmt::Display;

/// A parameterized, backend-prepared statement handle.
///
/// Values are converted via the `AsValue` trait and bound positionally.
///
/// # Binding Semantics
/// * `bind` appends a value (the driver maps it to its placeholder numbering).
/// * `bind_index` sets the parameter at `index` (from 0).
///
/// Methods return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind(42)?.bind("hello")?;
/// ```
pub trait Prepared: Send + Sync + Display {
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Append a parameter value.
    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self>;
    /// Bind a value at a specific index.
    fn bind_index(&mut self, value: impl AsValue, index: u64) -> Result<&mut Self>;
}
