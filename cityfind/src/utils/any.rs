use serde::Deserialize;
use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use std::{
    fmt::Display,
    fs::File,
    hash::{DefaultHasher, Hash, Hasher},
    io::{BufReader, BufWriter, Error as IoError, Read, Write},
    path::Path,
    sync::{Arc, Mutex},
};

pub trait Any: Sized {
    fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn buf_reader(self) -> BufReader<Self>
    where
        Self: Read,
    {
        BufReader::new(self)
    }

    fn buf_writer(self) -> BufWriter<Self>
    where
        Self: Write,
    {
        BufWriter::new(self)
    }

    fn convert<T: From<Self>>(self) -> T {
        self.into()
    }

    fn create(&self) -> Result<File, IoError>
    where
        Self: AsRef<Path>,
    {
        File::create(self)
    }

    fn deserialize_from_json<'a, T: Deserialize<'a>>(&'a self) -> Result<T, SerdeJsonError>
    where
        Self: AsRef<str>,
    {
        serde_json::from_str(self.as_ref())
    }

    fn deserialize_from_yaml<'a, T: Deserialize<'a>>(&'a self) -> Result<T, SerdeYamlError>
    where
        Self: AsRef<str>,
    {
        serde_yaml::from_str(self.as_ref())
    }

    fn err<T>(self) -> Result<T, Self> {
        Err(self)
    }

    fn error<T, E: Display>(self) -> Option<T>
    where
        Self: Into<Result<T, E>>,
    {
        match self.into() {
            Ok(ok) => ok.some(),
            Err(error) => tracing::error!(%error).none(),
        }
    }

    fn hashcode(&self) -> u64
    where
        Self: Hash,
    {
        let mut hasher = DefaultHasher::new();

        self.hash(&mut hasher);

        hasher.finish()
    }

    fn mutex(self) -> Mutex<Self> {
        Mutex::new(self)
    }

    fn none<T>(&self) -> Option<T> {
        None
    }

    fn ok<E>(self) -> Result<Self, E> {
        Ok(self)
    }

    fn open(&self) -> Result<File, IoError>
    where
        Self: AsRef<Path>,
    {
        File::open(self)
    }

    fn push_to(self, values: &mut Vec<Self>) {
        values.push(self);
    }

    fn read_to_string(&self) -> Result<String, IoError>
    where
        Self: AsRef<Path>,
    {
        std::fs::read_to_string(self)
    }

    fn some(self) -> Option<Self> {
        Some(self)
    }

    fn unit(self) {}

    fn warn<T, E: Display>(self) -> Option<T>
    where
        Self: Into<Result<T, E>>,
    {
        match self.into() {
            Ok(value) => value.some(),
            Err(error) => tracing::warn!(%error).none(),
        }
    }

    fn with<T>(&self, value: T) -> T {
        value
    }
}

impl<T> Any for T {}
