use crate::ValueWrap;
use sqldb_core::{AsValue, Prepared, Result, truncate_long};
use std::fmt::{self, Display};

/// Statement text and its parameters, sent together through `sp_executesql`.
#[derive(Debug)]
pub struct MSSQLPrepared {
    pub(crate) sql: String,
    pub(crate) params: Vec<ValueWrap>,
    pub(crate) index: u64,
}

impl MSSQLPrepared {
    pub(crate) fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
            index: 0,
        }
    }
}

impl Prepared for MSSQLPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.clear();
        self.index = 0;
        Ok(self)
    }
    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        self.bind_index(value, self.index)?;
        Ok(self)
    }
    /// Parameters are untyped until bound, binding past the end grows the list.
    fn bind_index(&mut self, value: impl AsValue, index: u64) -> Result<&mut Self> {
        let index = index as usize;
        if self.params.len() <= index {
            self.params.resize_with(index + 1, Default::default);
        }
        self.params[index] = value.as_value().try_into()?;
        self.index = index as u64 + 1;
        Ok(self)
    }
}

impl Display for MSSQLPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
