use crate::{page::command::Command, utils::any::Any};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use serde::{de::Error, Deserialize, Deserializer};
use std::collections::HashMap;

#[derive(Deserialize)]
pub struct KeyBinding {
    #[serde(deserialize_with = "KeyBinding::deserialize_keys", rename(deserialize = "keys"))]
    events: Vec<Event>,

    command: Command,
}

impl KeyBinding {
    const MISSING_KEY_ERROR_MESSAGE: &'static str = "No key was provided";
    const UNKNOWN_KEY_ERROR_MESSAGE: &'static str = "Unknown key was provided";

    // NOTE: each individual event_str must be of the form
    // [ctrl +] [shift +] [alt +] (<special-key> | <single-character>)
    // where <special-key> is one of the special keys listed below
    fn deserialize_key<'de, D: Deserializer<'de>>(event_str: &str) -> Result<Event, D::Error> {
        let mut modifiers = KeyModifiers::NONE;
        let mut substrs = event_str.split('+').peekable();

        if let Some(&"ctrl") = substrs.peek() {
            modifiers.insert(KeyModifiers::CONTROL);
            substrs.next();
        }

        if let Some(&"shift") = substrs.peek() {
            modifiers.insert(KeyModifiers::SHIFT);
            substrs.next();
        }

        if let Some(&"alt") = substrs.peek() {
            modifiers.insert(KeyModifiers::ALT);
            substrs.next();
        }

        let Some(substr) = substrs.next() else {
            return D::Error::custom(Self::MISSING_KEY_ERROR_MESSAGE).err();
        };
        let code = match substr {
            "backspace" => KeyCode::Backspace,
            "enter" => KeyCode::Enter,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "delete" => KeyCode::Delete,
            "esc" => KeyCode::Esc,
            _ => {
                let mut chars = substr.chars();
                let Some(chr) = chars.next() else {
                    return D::Error::custom(Self::MISSING_KEY_ERROR_MESSAGE).err();
                };
                let None = chars.next() else {
                    return D::Error::custom(Self::UNKNOWN_KEY_ERROR_MESSAGE).err();
                };

                KeyCode::Char(chr)
            }
        };
        let key_event = KeyEvent::new(code, modifiers);
        let event = Event::Key(key_event);

        event.ok()
    }

    fn deserialize_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Event>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(String::as_str)
            .map(Self::deserialize_key::<D>)
            .collect()
    }
}

pub struct Keymap {
    value: HashMap<u64, Command>,
}

impl Keymap {
    const DEFAULT_KEYMAP_STR: &'static str = std::include_str!("keymap.yaml");

    pub fn new(key_bindings: Vec<KeyBinding>) -> Self {
        let mut value = HashMap::new();

        for key_binding in key_bindings {
            let key = Self::key(&key_binding.events);

            value.insert(key, key_binding.command);
        }

        Self { value }
    }

    pub fn default_key_bindings() -> Vec<KeyBinding> {
        // NOTE: the embedded keymap is checked by default_keymap_parses
        Self::DEFAULT_KEYMAP_STR
            .deserialize_from_yaml::<Vec<KeyBinding>>()
            .error()
            .unwrap_or_default()
    }

    fn key(events: &[Event]) -> u64 {
        events.hashcode()
    }

    pub fn get<'a>(&'a self, events: &'a [Event]) -> Result<&'a Command, &'a [Event]> {
        let key = Self::key(events);

        match self.value.get(&key) {
            Some(command) => command.ok(),
            None => events.err(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn default_keymap_parses() {
        let keymap = Keymap::new(Keymap::default_key_bindings());

        assert_eq!(keymap.get(&[key(KeyCode::Char('c'), KeyModifiers::CONTROL)]), Ok(&Command::Quit));
        assert_eq!(keymap.get(&[key(KeyCode::Esc, KeyModifiers::NONE)]), Ok(&Command::Quit));
        assert_eq!(keymap.get(&[key(KeyCode::Enter, KeyModifiers::NONE)]), Ok(&Command::Submit));
        assert_eq!(keymap.get(&[key(KeyCode::Down, KeyModifiers::NONE)]), Ok(&Command::SelectNext));
        assert_eq!(keymap.get(&[key(KeyCode::Up, KeyModifiers::NONE)]), Ok(&Command::SelectPrevious));
        assert_eq!(keymap.get(&[key(KeyCode::Tab, KeyModifiers::NONE)]), Ok(&Command::Accept));
        assert_eq!(
            keymap.get(&[key(KeyCode::Backspace, KeyModifiers::NONE)]),
            Ok(&Command::DeleteBackward)
        );
    }

    #[test]
    fn unbound_events_are_returned() {
        let keymap = Keymap::new(Keymap::default_key_bindings());
        let events = [key(KeyCode::Char('p'), KeyModifiers::NONE)];

        assert_eq!(keymap.get(&events), Err(&events[..]));
    }

    #[test]
    fn key_strings_support_modifiers() {
        let yaml = "- keys: [ctrl+shift+alt+x]\n  command: quit\n";
        let keymap = Keymap::new(yaml.deserialize_from_yaml::<Vec<KeyBinding>>().unwrap());
        let modifiers = KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT;

        assert_eq!(keymap.get(&[key(KeyCode::Char('x'), modifiers)]), Ok(&Command::Quit));
    }

    #[test]
    fn multi_character_keys_are_rejected() {
        let yaml = "- keys: [ctrl+xy]\n  command: quit\n";

        assert!(yaml.deserialize_from_yaml::<Vec<KeyBinding>>().is_err());
    }
}
