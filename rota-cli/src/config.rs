//! CLI configuration

use rota_client::RotaClient;

#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the gateway (or the schedule server directly)
    pub api_url: String,
}

impl Config {
    pub fn client(&self) -> RotaClient {
        RotaClient::new(&self.api_url)
    }
}
