mod args;
mod collector;
mod config;
mod entry;
mod error;
mod extract;
mod metrics;
mod sample;
mod session;
mod shell;
mod sinks;
mod stats;
mod system;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
