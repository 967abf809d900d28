use tracing::instrument;

use super::{Endpoint, Error};
use crate::domain::employee::EmployeeDirectory;

const EMPLOYEES_PATH: &str = "/api/employee/list";

/// Client for the employee information API.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    endpoint: Endpoint,
}

impl EmployeeClient {
    /// Creates a client for the API at `base_url`, authenticating with
    /// `token` when given.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url, token),
        }
    }

    /// Fetches every employee in one call.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unexpected body.
    #[instrument(level = "debug", skip(self))]
    pub async fn employees(&self) -> Result<EmployeeDirectory, Error> {
        let directory: EmployeeDirectory = self.endpoint.get(EMPLOYEES_PATH).await?;
        tracing::debug!(count = directory.employees.len(), "loaded employees");
        Ok(directory)
    }
}
