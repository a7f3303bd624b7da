use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("stockcast/", env!("CARGO_PKG_VERSION"));

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client bounded by `timeout`.
    ///
    /// No retry middleware: a failed fetch is reported once and the caller
    /// decides what to do with it.
    pub fn create_client(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
    }
}
