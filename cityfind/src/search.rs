use crate::{
    index::{
        entity::Entity,
        qgram_index::{Match, Matches, QGramIndex},
    },
    utils::any::Any,
};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;

#[derive(Clone, Debug, Deserialize, Eq, Object, PartialEq, Serialize)]
pub struct CityRecord {
    pub city: String,
    pub score: i64,
    pub ped: usize,
}

pub struct Search<'a> {
    index: &'a QGramIndex,
}

impl<'a> Search<'a> {
    pub const DEFAULT_LIMIT: usize = 10;
    const DELTA_DIVISOR: usize = 4;

    pub fn new(index: &'a QGramIndex) -> Self {
        Self { index }
    }

    // NOTE: one typo is tolerated for every four characters of the normalized query
    pub fn delta(normalized_query: &str) -> usize {
        normalized_query.chars().count() / Self::DELTA_DIVISOR
    }

    /// Finds and ranks every entity whose name fuzzily begins with `query`.
    pub fn ranked_matches(&self, query: &str) -> Matches {
        let normalized_query = Entity::normalize(query);
        let delta = Self::delta(&normalized_query);
        let mut matches = self.index.find_matches(&normalized_query, delta);

        QGramIndex::rank_matches(&mut matches.matches);

        matches
    }

    pub fn fuzzy_search(&self, query: &str, limit: usize) -> Vec<CityRecord> {
        if query.is_empty() {
            return Vec::new();
        }

        self.ranked_matches(query)
            .matches
            .into_iter()
            .take(limit)
            .filter_map(|matched| self.record(matched))
            .collect()
    }

    fn record(&self, matched: Match) -> Option<CityRecord> {
        CityRecord {
            city: self.index.entity(matched.entity_id)?.name().into(),
            score: matched.score,
            ped: matched.ped,
        }
        .some()
    }

    /// Renders records as the plain-text response body; no records yields an empty body rather than `[]`.
    pub fn render_body(records: &[CityRecord]) -> Result<String, SerdeJsonError> {
        if records.is_empty() {
            String::new().ok()
        } else {
            serde_json::to_string(records)
        }
    }
}
