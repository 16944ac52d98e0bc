use crate::{error::Error, utils::any::Any};

pub struct Entity {
    name: String,
    normalized_name: String,
    score: i64,
}

impl Entity {
    const COLUMN_SEPARATOR: char = '\t';

    // NOTE: line_number is only used for error reporting and is 1-based
    pub fn parse(line: &str, line_number: usize) -> Result<Self, Error> {
        let mut columns = line.split(Self::COLUMN_SEPARATOR);
        let name = columns.next().unwrap_or_default();
        let Some(score) = columns.next() else {
            return Error::InvalidEntityLine {
                line_number,
                reason: "missing score column".into(),
            }
            .err();
        };
        let score = score.trim().parse::<i64>().map_err(|parse_int_err| Error::InvalidEntityLine {
            line_number,
            reason: std::format!("score {score:?} is not an integer: {parse_int_err}"),
        })?;
        let normalized_name = Self::normalize(name);

        Self {
            name: name.into(),
            normalized_name,
            score,
        }
        .ok()
    }

    /// Lowercases `text` and drops every character that is not alphanumeric or `_`.
    pub fn normalize(text: &str) -> String {
        text.chars()
            .flat_map(char::to_lowercase)
            .filter(|chr| chr.is_alphanumeric() || *chr == '_')
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}
