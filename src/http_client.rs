use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = "fpl_fdr/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client; the timeout of the first caller sticks for the process.
pub fn http_client(timeout: Duration) -> reqwest::Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
    })
}
