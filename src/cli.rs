use std::{path::PathBuf, time::Duration};

use clap::Parser;
use directory::directory::{options::DirectoryOptions, seed::Seed};

/// 📚 Activity Directory Server, lists extracurricular activities and manages their participants
#[derive(Parser, Debug)]
pub struct Cli {
    /// Port the http server will run on
    #[clap(short, long, default_value = "8000")]
    pub port: u16,

    /// Address the http server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    pub address: String,

    /// Logs every http request
    #[clap(long)]
    pub log_http: bool,

    #[clap(long, default_value_t = 2)]
    pub http_workers: usize,

    /// JSON file to seed activities from, same shape as `GET /activities`. Defaults to the built-in
    /// Mergington High School activities. Note: Does not support shell paths, e.g. ~
    #[clap(short, long)]
    pub seed: Option<PathBuf>,

    /// How long a request waits on the directory before failing
    #[clap(long, default_value_t = 2000)]
    pub request_timeout_ms: u64,
}

impl Cli {
    pub fn directory_options(&self) -> DirectoryOptions {
        let seed = match &self.seed {
            Some(path) => Seed::File(path.clone()),
            None => Seed::Mergington,
        };

        DirectoryOptions::default()
            .set_seed(seed)
            .set_request_timeout(Duration::from_millis(self.request_timeout_ms))
    }
}
