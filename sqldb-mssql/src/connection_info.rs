use crate::MSSQLDriver;
use serde::{Deserialize, Serialize};
use sqldb_core::{ConnectionInfo, Driver};
use urlencoding::encode;

/// Instance name of a default SQL Server installation, left out of the url.
pub const DEFAULT_INSTANCE: &str = "MSSQLSERVER";

/// Settings of a SQL Server instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MSSQLConnectionInfo {
    /// Host name or address.
    pub server: String,
    pub port: u16,
    pub instance: String,
    /// Database name.
    pub schema: String,
    pub user: String,
    pub password: String,
    /// Connection timeout in seconds, 0 to wait forever.
    pub timeout: u64,
    /// Accept a server certificate that cannot be validated.
    pub trust_certificate: bool,
}

impl Default for MSSQLConnectionInfo {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".into(),
            port: 1433,
            instance: DEFAULT_INSTANCE.into(),
            schema: "master".into(),
            user: String::new(),
            password: String::new(),
            timeout: 10,
            trust_certificate: false,
        }
    }
}

impl ConnectionInfo for MSSQLConnectionInfo {
    fn driver_name(&self) -> &str {
        MSSQLDriver::NAME
    }

    fn source_name(&self) -> String {
        let mut result = format!("{}://", MSSQLDriver::NAME);
        if !self.user.is_empty() {
            result.push_str(&encode(&self.user));
            if !self.password.is_empty() {
                result.push(':');
                result.push_str(&encode(&self.password));
            }
            result.push('@');
        }
        result.push_str(&format!("{}:{}", self.server, self.port));
        if !self.instance.is_empty() && !self.instance.eq_ignore_ascii_case(DEFAULT_INSTANCE) {
            result.push('/');
            result.push_str(&encode(&self.instance));
        }
        result.push_str(&format!("?database={}", encode(&self.schema)));
        if self.timeout > 0 {
            result.push_str(&format!("&connection+timeout={}", self.timeout));
        }
        if self.trust_certificate {
            result.push_str("&TrustServerCertificate=true");
        }
        result
    }

    fn schema_name(&self) -> &str {
        &self.schema
    }
}
