use crate::{
    error::Error,
    page::{
        color_scheme::ColorScheme,
        keymap::{KeyBinding, Keymap},
    },
    utils::any::Any,
};
use serde::Deserialize;
use std::{
    net::Ipv4Addr,
    path::{Path, PathBuf},
};

#[derive(Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: Ipv4Addr,

    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,

    #[serde(default = "ServerConfig::default_q")]
    pub q: usize,

    #[serde(default = "ServerConfig::default_limit")]
    pub limit: usize,

    #[serde(default = "ServerConfig::default_static_dirpath")]
    pub static_dirpath: PathBuf,
}

impl ServerConfig {
    pub fn default_host() -> Ipv4Addr {
        Ipv4Addr::UNSPECIFIED
    }

    pub fn default_port() -> u16 {
        8080
    }

    pub fn default_q() -> usize {
        3
    }

    pub fn default_limit() -> usize {
        10
    }

    pub fn default_static_dirpath() -> PathBuf {
        "static".into()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            q: Self::default_q(),
            limit: Self::default_limit(),
            static_dirpath: Self::default_static_dirpath(),
        }
    }
}

#[derive(Deserialize)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server_host")]
    pub server_host: String,

    #[serde(default = "ClientConfig::default_storage_filepath")]
    pub storage_filepath: PathBuf,

    #[serde(default)]
    pub color_scheme: ColorScheme,

    #[serde(default = "Keymap::default_key_bindings")]
    pub keymap: Vec<KeyBinding>,
}

impl ClientConfig {
    pub fn default_server_host() -> String {
        "127.0.0.1:8080".into()
    }

    pub fn default_storage_filepath() -> PathBuf {
        ".cityfind/storage.json".into()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: Self::default_server_host(),
            storage_filepath: Self::default_storage_filepath(),
            color_scheme: ColorScheme::default(),
            keymap: Keymap::default_key_bindings(),
        }
    }
}

#[derive(Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    const DEFAULT_CONFIG_STR: &'static str = std::include_str!("config.yaml");

    pub fn load(config_filepath: Option<&Path>) -> Result<Self, Error> {
        if let Some(config_filepath) = config_filepath {
            config_filepath
                .read_to_string()?
                .deserialize_from_yaml::<Config>()?
                .ok()
        } else {
            Self::DEFAULT_CONFIG_STR.deserialize_from_yaml::<Config>()?.ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_parses() {
        let config = Config::load(None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.q, 3);
        assert_eq!(config.server.limit, 10);
        assert_eq!(config.client.server_host, "127.0.0.1:8080");
        assert!(!config.client.keymap.is_empty());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();

        file.write_all(b"server:\n  port: 9000\n").unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, Ipv4Addr::UNSPECIFIED);
        assert_eq!(config.server.static_dirpath, PathBuf::from("static"));
        assert_eq!(config.client.storage_filepath, PathBuf::from(".cityfind/storage.json"));
        assert_eq!(config.client.keymap.len(), Keymap::default_key_bindings().len());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(Config::load(Some(&dir.path().join("missing.yaml"))), Err(Error::Io(_))));
    }
}
