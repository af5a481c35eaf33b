use crate::MySQLDriver;
use serde::{Deserialize, Serialize};
use sqldb_core::{ConnectionInfo, Driver};
use urlencoding::encode;

/// Settings of a MySQL server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySQLConnectionInfo {
    /// Host name or address.
    pub server: String,
    pub port: u16,
    /// Database name.
    pub schema: String,
    pub charset: String,
    /// Connection timeout in seconds, 0 to wait forever.
    pub timeout: u64,
    pub user: String,
    pub password: String,
}

impl Default for MySQLConnectionInfo {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".into(),
            port: 3306,
            schema: "mysql".into(),
            charset: "utf8".into(),
            timeout: 10,
            user: String::new(),
            password: String::new(),
        }
    }
}

impl ConnectionInfo for MySQLConnectionInfo {
    fn driver_name(&self) -> &str {
        MySQLDriver::NAME
    }

    fn source_name(&self) -> String {
        let mut result = format!("{}://", MySQLDriver::NAME);
        if !self.user.is_empty() {
            result.push_str(&encode(&self.user));
            if !self.password.is_empty() {
                result.push(':');
                result.push_str(&encode(&self.password));
            }
            result.push('@');
        }
        result.push_str(&format!("{}:{}/{}", self.server, self.port, encode(&self.schema)));
        let mut separator = '?';
        if !self.charset.is_empty() {
            result.push_str(&format!("{separator}charset={}", encode(&self.charset)));
            separator = '&';
        }
        if self.timeout > 0 {
            result.push_str(&format!("{separator}timeout={}", self.timeout));
        }
        result
    }

    fn schema_name(&self) -> &str {
        &self.schema
    }
}
