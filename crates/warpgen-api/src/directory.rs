// Endpoint directory
//
// `GET <directory>` → `{ "ipv4": [...], "ipv6": [...] }`.

use tracing::debug;

use crate::client::ProvisioningClient;
use crate::error::Error;
use crate::models::EndpointList;

impl ProvisioningClient {
    /// Fetch the endpoint directory, or `Ok(None)` when none is configured.
    pub async fn fetch_endpoint_directory(&self) -> Result<Option<EndpointList>, Error> {
        let Some(url) = self.urls().directory.clone() else {
            debug!("no endpoint directory configured");
            return Ok(None);
        };
        self.get_json(url).await.map(Some)
    }
}
