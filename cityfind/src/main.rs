mod autocomplete;
mod cli_args;
mod client;
mod config;
mod error;
mod index;
mod page;
mod repl;
mod search;
mod server;
mod utils;

use crate::{cli_args::CliArgs, error::Error};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Error> {
    CliArgs::parse().run().await
}
