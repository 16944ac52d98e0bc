use crate::{
    autocomplete::{
        autocomplete::{Autocomplete, Outcome},
        dropdown::Dropdown,
        fetch::FetchError,
        storage::Storage,
    },
    error::Error,
    page::{command::Command, keymap::Keymap},
    utils::any::Any,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

macro_rules! key_pattern {
    ($chr:ident) => {
        Event::Key(KeyEvent {
            code: KeyCode::Char($chr),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        })
    };
}

#[derive(Debug, Eq, PartialEq)]
pub enum Action {
    None,
    Quit,
    Fetch(String),
}

/// The terminal page: a `query` input bound to an `autocomplete` dropdown.
pub struct Page<S> {
    input: String,
    autocomplete: Autocomplete<S>,
    keymap: Keymap,
}

impl<S: Storage> Page<S> {
    pub fn new(autocomplete: Autocomplete<S>, keymap: Keymap) -> Self {
        Self {
            input: String::new(),
            autocomplete,
            keymap,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn dropdown(&self) -> &Dropdown {
        self.autocomplete.dropdown()
    }

    // NOTE: every edit of the input counts as a key-up
    fn key_up(&mut self) -> Result<Action, Error> {
        if self.autocomplete.submit(&self.input)? {
            Action::Fetch(self.input.clone()).ok()
        } else {
            Action::None.ok()
        }
    }

    fn delete_backward(&mut self) {
        if let Some((idx, _grapheme)) = self.input.grapheme_indices(true).next_back() {
            self.input.truncate(idx);
        }
    }

    fn accept(&mut self) -> Result<Action, Error> {
        let Some(option) = self.autocomplete.dropdown().selected() else {
            return Action::None.ok();
        };

        self.input = option.value().into();
        self.autocomplete.on_change(&self.input);

        self.key_up()
    }

    pub fn feed(&mut self, event: &Event) -> Result<Action, Error> {
        let events = std::slice::from_ref(event);

        match self.keymap.get(events) {
            Ok(Command::Quit) => Action::Quit.ok(),
            Ok(Command::Submit) => self.autocomplete.on_change(&self.input).with(Action::None).ok(),
            Ok(Command::SelectNext) => self.autocomplete.dropdown_mut().select_next().with(Action::None).ok(),
            Ok(Command::SelectPrevious) => self
                .autocomplete
                .dropdown_mut()
                .select_previous()
                .with(Action::None)
                .ok(),
            Ok(Command::Accept) => self.accept(),
            Ok(Command::DeleteBackward) => {
                self.delete_backward();

                self.key_up()
            }
            Err(&[key_pattern!(chr)]) => {
                self.input.push(chr);

                self.key_up()
            }
            Err(ignored_events) => tracing::debug!(?ignored_events).with(Action::None).ok(),
        }
    }

    pub fn apply(&mut self, response: Result<String, FetchError>) -> Result<Outcome, Error> {
        self.autocomplete.apply(response)
    }
}
