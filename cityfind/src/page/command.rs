use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Accept,
    DeleteBackward,
    Quit,
    SelectNext,
    SelectPrevious,
    Submit,
}
