use crate::{
    client::Client,
    config::{ClientConfig, Config, ServerConfig},
    error::Error,
    index::qgram_index::QGramIndex,
    repl::Repl,
    server::Server,
    utils::any::Any,
};
use clap::{Args, Parser, Subcommand};
use std::{
    net::Ipv4Addr,
    path::{Path, PathBuf},
};

#[derive(Args, Clone, Default)]
pub struct ClientArgs {
    /// Host (and port) of the search server queried for suggestions
    #[arg(long)]
    pub server_host: Option<String>,

    /// File holding the last submitted query
    #[arg(long = "storage")]
    pub storage_filepath: Option<PathBuf>,
}

impl ClientArgs {
    fn apply(self, mut client_config: ClientConfig) -> ClientConfig {
        if let Some(server_host) = self.server_host {
            client_config.server_host = server_host;
        }

        if let Some(storage_filepath) = self.storage_filepath {
            client_config.storage_filepath = storage_filepath;
        }

        client_config
    }
}

#[derive(Args, Clone)]
pub struct ServerArgs {
    /// Tab-separated entities file: one city per line, columns are name and score
    pub entities_filepath: PathBuf,

    #[arg(long)]
    pub host: Option<Ipv4Addr>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Directory served for every path other than `/?q=`
    #[arg(long = "static")]
    pub static_dirpath: Option<PathBuf>,
}

impl ServerArgs {
    fn apply(self, mut server_config: ServerConfig) -> (PathBuf, ServerConfig) {
        if let Some(host) = self.host {
            server_config.host = host;
        }

        if let Some(port) = self.port {
            server_config.port = port;
        }

        if let Some(static_dirpath) = self.static_dirpath {
            server_config.static_dirpath = static_dirpath;
        }

        (self.entities_filepath, server_config)
    }
}

#[derive(Args, Clone)]
pub struct SearchArgs {
    /// Tab-separated entities file: one city per line, columns are name and score
    pub entities_filepath: PathBuf,

    #[arg(default_value_t = ServerConfig::default_q(), long)]
    pub q: usize,
}

impl SearchArgs {
    fn run(self) -> Result<(), Error> {
        let mut index = QGramIndex::new(self.q)?;

        index.build_from_file(&self.entities_filepath)?;

        Repl::new(&index).run(std::io::stdin().lock(), std::io::stdout().lock())
    }
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Query input with autocomplete suggestions (the default)
    Complete(ClientArgs),

    /// Serve fuzzy search over HTTP
    Serve(ServerArgs),

    /// Interactive fuzzy search on stdin
    Search(SearchArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Complete(ClientArgs::default())
    }
}

#[derive(Clone, Parser)]
#[command(version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(global = true, long = "config")]
    pub config_filepath: Option<PathBuf>,

    #[arg(global = true, long = "logs")]
    pub log_filepath: Option<PathBuf>,
}

impl CliArgs {
    // NOTE: the terminal page owns stdout, so only the server logs there when no log file is given
    fn init_tracing(log_filepath: Option<&Path>, log_to_stdout: bool) -> Result<(), Error> {
        if let Some(log_filepath) = log_filepath {
            let log_file = log_filepath.create()?.mutex();

            tracing_subscriber::fmt().with_writer(log_file).json().init();
        } else if log_to_stdout {
            tracing_subscriber::fmt().json().init();
        }

        ().ok()
    }

    pub async fn run(self) -> Result<(), Error> {
        let Self {
            command,
            config_filepath,
            log_filepath,
        } = self;
        let config = Config::load(config_filepath.as_deref())?;
        let log_filepath = log_filepath.as_deref();

        match command.unwrap_or_default() {
            Command::Complete(client_args) => {
                Self::init_tracing(log_filepath, false)?;
                Client::run(client_args.apply(config.client)).await
            }
            Command::Serve(server_args) => {
                Self::init_tracing(log_filepath, true)?;

                let (entities_filepath, server_config) = server_args.apply(config.server);

                Server::serve(&entities_filepath, server_config).await
            }
            Command::Search(search_args) => {
                Self::init_tracing(log_filepath, false)?;
                search_args.run()
            }
        }
    }
}
