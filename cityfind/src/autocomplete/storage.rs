use crate::{error::Error, utils::any::Any};
use std::{
    collections::HashMap,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// A synchronous string-to-string store, the terminal counterpart of the browser's local storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        self.items.get(key).cloned().ok()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.into(), value.into());

        ().ok()
    }
}

/// Items persisted as a JSON object in a single file, rewritten on every write so they survive restarts.
pub struct FileStorage {
    filepath: PathBuf,
    items: HashMap<String, String>,
}

impl FileStorage {
    pub fn open(filepath: &Path) -> Result<Self, Error> {
        let items = match filepath.read_to_string() {
            Ok(json) => json.deserialize_from_json()?,
            Err(io_err) if io_err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(io_err) => return io_err.convert::<Error>().err(),
        };

        tracing::debug!(filepath = %filepath.display(), num_items = items.len(), "opened storage");

        Self {
            filepath: filepath.into(),
            items,
        }
        .ok()
    }

    fn write(filepath: &Path, items: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(dirpath) = filepath.parent() {
            std::fs::create_dir_all(dirpath)?;
        }

        let mut writer = filepath.create()?.buf_writer();

        serde_json::to_writer(&mut writer, items)?;
        writer.flush()?.ok()
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        self.items.get(key).cloned().ok()
    }

    // NOTE: the in-memory items only change once the file has been written
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let mut items = self.items.clone();

        items.insert(key.into(), value.into());
        Self::write(&self.filepath, &items)?;
        self.items = items;

        ().ok()
    }
}
