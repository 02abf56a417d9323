use std::env;

use cfgfile::{ConfigFile, DumpOrder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).expect("expected path as first argument");
    let order = match env::args().nth(2).as_deref() {
        Some("--stored") => DumpOrder::Stored,
        _ => DumpOrder::ByName,
    };

    let mut config = ConfigFile::new();
    config.load(&path, false).expect("failed to load configuration file");

    print!("{}", config.dump(order));
}
