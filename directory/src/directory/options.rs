use std::time::Duration;

use crate::consts::consts::DEFAULT_REQUEST_TIMEOUT;

use super::seed::Seed;

#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    pub seed: Seed,
    pub request_timeout: Duration,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DirectoryOptions {
    /// Defines which activities the directory starts with
    pub fn set_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// How long a request manager waits for the directory worker before giving up
    pub fn set_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            seed: Seed::Mergington,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl DirectoryOptions {
    /// Test runners can be slow to schedule the worker thread, so allow more time than the default
    pub fn new_test() -> Self {
        DirectoryOptions::default()
            .set_seed(Seed::Mergington)
            .set_request_timeout(Duration::from_secs(10))
    }

    pub fn new_benchmark() -> Self {
        DirectoryOptions::default()
            .set_seed(Seed::Mergington)
            .set_request_timeout(Duration::from_secs(30))
    }
}
