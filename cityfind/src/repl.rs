use crate::{
    error::Error,
    index::qgram_index::QGramIndex,
    search::Search,
    utils::any::Any,
};
use std::{
    io::{BufRead, Write},
    time::Instant,
};

/// Line-oriented fuzzy search prompt for inspecting an index.
pub struct Repl<'a> {
    index: &'a QGramIndex,
}

impl<'a> Repl<'a> {
    const NUM_RESULTS_SHOWN: usize = 5;
    const PROMPT: &'static str = "query> ";

    pub fn new(index: &'a QGramIndex) -> Self {
        Self { index }
    }

    fn answer<W: Write>(&self, query: &str, writer: &mut W) -> Result<(), Error> {
        let begin = Instant::now();
        let matches = Search::new(self.index).ranked_matches(query);

        writeln!(
            writer,
            "#PED = {num_ped}  #RES = {num_res}",
            num_ped = matches.num_ped_computations,
            num_res = matches.matches.len(),
        )?;

        for matched in matches.matches.iter().take(Self::NUM_RESULTS_SHOWN) {
            let Some(entity) = self.index.entity(matched.entity_id) else {
                continue;
            };

            writeln!(writer, "{name}   {ped}   {score}", name = entity.name(), ped = matched.ped, score = matched.score)?;
        }

        writeln!(writer, "Time taken is: {millis}ms", millis = begin.elapsed().as_millis())?.ok()
    }

    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<(), Error> {
        let mut lines = reader.lines();

        loop {
            write!(writer, "{}", Self::PROMPT)?;
            writer.flush()?;

            let Some(line_res) = lines.next() else {
                break;
            };

            self.answer(line_res?.trim_end(), &mut writer)?;
        }

        writeln!(writer)?.ok()
    }
}
