use crate::{error::Error, index::entity::Entity, utils::any::Any};
use std::{
    collections::BTreeMap,
    io::BufRead,
    path::Path,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Match {
    pub entity_id: usize,
    pub ped: usize,
    pub score: i64,
}

impl Match {
    fn rank(&self) -> i64 {
        let ped = i64::try_from(self.ped).unwrap_or(i64::MAX);

        self.score.saturating_sub(ped)
    }
}

pub struct Matches {
    pub matches: Vec<Match>,
    pub num_ped_computations: usize,
}

/// A q-gram index over entity names supporting fuzzy prefix search.
///
/// Names are normalized with [`Entity::normalize`] and padded at the front with `q - 1` `$` characters before being
/// split into q-grams, so that a prefix of length `k` always contributes exactly `k` q-grams.
pub struct QGramIndex {
    q: usize,
    padding: String,
    inverted_lists: BTreeMap<String, Vec<usize>>,
    entities: Vec<Entity>,
}

impl QGramIndex {
    const PADDING_CHAR: char = '$';

    pub fn new(q: usize) -> Result<Self, Error> {
        if q == 0 {
            return Error::InvalidQ(q).err();
        }

        let padding = std::iter::repeat(Self::PADDING_CHAR).take(q - 1).collect();

        Self {
            q,
            padding,
            inverted_lists: BTreeMap::new(),
            entities: Vec::new(),
        }
        .ok()
    }

    pub fn build_from_file(&mut self, filepath: &Path) -> Result<(), Error> {
        self.build_from_reader(filepath.open()?.buf_reader())
    }

    // NOTE: entity ids are assigned in line order starting at 0 (continuing after any entities already present)
    pub fn build_from_reader<R: BufRead>(&mut self, reader: R) -> Result<(), Error> {
        for (line_idx, line_res) in reader.lines().enumerate() {
            let entity = Entity::parse(&line_res?, line_idx + 1)?;

            self.insert(entity);
        }

        tracing::info!(
            num_entities = self.entities.len(),
            num_qgrams = self.inverted_lists.len(),
            "built q-gram index"
        );

        ().ok()
    }

    fn insert(&mut self, entity: Entity) {
        let entity_id = self.entities.len();

        for qgram in self.qgrams(entity.name()) {
            self.inverted_lists.entry(qgram).or_default().push(entity_id);
        }

        entity.push_to(&mut self.entities);
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn num_qgrams(&self) -> usize {
        self.inverted_lists.len()
    }

    pub fn entity(&self, entity_id: usize) -> Option<&Entity> {
        self.entities.get(entity_id)
    }

    pub fn inverted_list(&self, qgram: &str) -> Option<&[usize]> {
        self.inverted_lists.get(qgram).map(Vec::as_slice)
    }

    pub fn qgrams(&self, name: &str) -> Vec<String> {
        let padded = self.padding.chars().chain(Entity::normalize(name).chars()).collect::<Vec<_>>();

        padded.windows(self.q).map(|window| window.iter().collect()).collect()
    }

    /// Counts how often each entity id occurs across `lists`.
    pub fn merge_lists<'a, I: IntoIterator<Item = &'a [usize]>>(lists: I) -> BTreeMap<usize, usize> {
        let mut union = BTreeMap::new();

        for entity_id in lists.into_iter().flatten() {
            *union.entry(*entity_id).or_default() += 1;
        }

        union
    }

    // NOTE: returns the last row of the edit distance table between x and y, ie the edit distances between x and every
    // prefix of y
    fn edit_distance_row(x: &[char], y: &[char]) -> Vec<usize> {
        let mut prev_row = (0..=y.len()).collect::<Vec<_>>();

        for (i, x_char) in x.iter().enumerate() {
            let mut curr_row = Vec::with_capacity(y.len() + 1);

            curr_row.push(i + 1);

            for (j, y_char) in y.iter().enumerate() {
                let value = if x_char == y_char {
                    prev_row[j]
                } else {
                    prev_row[j].min(prev_row[j + 1]).min(curr_row[j]) + 1
                };

                curr_row.push(value);
            }

            prev_row = curr_row;
        }

        prev_row
    }

    /// Computes the prefix edit distance between `x` and `y`, ie the minimum edit distance between `x` and any prefix
    /// of `y`. Returns `delta + 1` if that distance exceeds `delta`.
    pub fn prefix_edit_distance(x: &str, y: &str, delta: usize) -> usize {
        let x = x.chars().collect::<Vec<_>>();
        let limit = x.len().saturating_add(delta).saturating_add(1);
        let y = y.chars().take(limit).collect::<Vec<_>>();
        let ped = Self::edit_distance_row(&x, &y).into_iter().min().unwrap_or(x.len());

        if ped <= delta {
            ped
        } else {
            delta + 1
        }
    }

    pub fn find_matches(&self, prefix: &str, delta: usize) -> Matches {
        let prefix = Entity::normalize(prefix);
        let qgrams = self.qgrams(&prefix);
        let lists = qgrams.iter().filter_map(|qgram| self.inverted_list(qgram));
        let candidates = Self::merge_lists(lists);
        let prefix_len = prefix.chars().count();
        let threshold = prefix_len.saturating_sub(delta.saturating_mul(self.q));
        let mut matches = Vec::new();
        let mut num_ped_computations = 0;

        for (entity_id, num_common_qgrams) in candidates {
            if num_common_qgrams < threshold {
                continue;
            }

            let entity = &self.entities[entity_id];
            let ped = Self::prefix_edit_distance(&prefix, entity.normalized_name(), delta);

            num_ped_computations += 1;

            if ped <= delta {
                Match {
                    entity_id,
                    ped,
                    score: entity.score(),
                }
                .push_to(&mut matches);
            }
        }

        tracing::debug!(%prefix, delta, num_candidates = num_ped_computations, num_matches = matches.len());

        Matches {
            matches,
            num_ped_computations,
        }
    }

    /// Orders matches by `score - ped`, best first; ties keep their relative order.
    pub fn rank_matches(matches: &mut [Match]) {
        matches.sort_by_key(|matched| std::cmp::Reverse(matched.rank()));
    }
}
