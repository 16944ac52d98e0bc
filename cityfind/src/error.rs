use derive_more::{Display, From};
use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

// NOTE:
// - Error must implement Debug to be used as E in fn main() -> Result<(), E>
// - Error must implement Display for Any::error() and Any::warn()
#[derive(Debug, Display, From)]
pub enum Error {
    Io(IoError),
    Reqwest(ReqwestError),
    SerdeJson(SerdeJsonError),
    SerdeYaml(SerdeYamlError),
    UrlParse(UrlParseError),

    #[display(fmt = "q-gram length must be at least 1, got {_0}")]
    #[from(ignore)]
    InvalidQ(usize),

    #[display(fmt = "line {line_number} of the entities file is invalid: {reason}")]
    #[from(ignore)]
    InvalidEntityLine { line_number: usize, reason: String },
}
