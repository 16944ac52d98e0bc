use crate::{
    autocomplete::{
        dropdown::{Dropdown, DropdownOption},
        fetch::{Fetch, FetchError},
        storage::Storage,
    },
    error::Error,
    utils::any::Any,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Suggestion {
    city: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The query equals the last submitted one; no request was issued.
    Skipped,
    /// The dropdown now holds exactly `num_options` options.
    Replaced { num_options: usize },
    /// The server answered with an empty body; the dropdown keeps its previous options.
    EmptyResponse,
    /// The request failed; the failure was logged and the dropdown left as is.
    Failed,
}

/// Binds a query input to the suggestion dropdown.
///
/// A key-up only triggers a request when the query differs from the last submitted one, which is persisted in
/// [`Storage`] under [`Autocomplete::LAST_QUERY_KEY`]. Requests are neither cancelled nor ordered: whichever response
/// is applied last determines the dropdown.
pub struct Autocomplete<S> {
    storage: S,
    dropdown: Dropdown,
}

impl<S: Storage> Autocomplete<S> {
    pub const LAST_QUERY_KEY: &'static str = "lastQuery";

    pub fn new(storage: S) -> Self {
        Self {
            storage,
            dropdown: Dropdown::new(),
        }
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut Dropdown {
        &mut self.dropdown
    }

    pub fn last_query(&self) -> Result<Option<String>, Error> {
        self.storage.get_item(Self::LAST_QUERY_KEY)
    }

    #[allow(clippy::unused_self)]
    pub fn on_change(&self, value: &str) {
        tracing::info!(query.value = value, "query changed");
    }

    /// Records `query` as the last submitted query unless it already is; returns whether a request must be issued.
    pub fn submit(&mut self, query: &str) -> Result<bool, Error> {
        if self.last_query()?.as_deref() == query.some() {
            tracing::debug!(query, "query unchanged, skipping request");

            return false.ok();
        }

        self.storage.set_item(Self::LAST_QUERY_KEY, query)?;

        true.ok()
    }

    /// Applies the response of an autocomplete request to the dropdown.
    ///
    /// A malformed body is returned as an error and leaves the dropdown untouched.
    pub fn apply(&mut self, response: Result<String, FetchError>) -> Result<Outcome, Error> {
        let body = match response {
            Ok(body) => body,
            Err(fetch_err) => {
                tracing::warn!(
                    status = ?fetch_err.status_code(),
                    status_text = fetch_err.status_text(),
                    "autocomplete request failed"
                );

                return Outcome::Failed.ok();
            }
        };

        if body.is_empty() {
            return Outcome::EmptyResponse.ok();
        }

        let suggestions = body.deserialize_from_json::<Vec<Suggestion>>()?;

        self.dropdown.clear();

        for suggestion in suggestions {
            self.dropdown.append(DropdownOption::new(suggestion.city));
        }

        tracing::debug!(options = ?self.dropdown.values().collect::<Vec<_>>(), "replaced options");

        Outcome::Replaced {
            num_options: self.dropdown.len(),
        }
        .ok()
    }

    /// Runs one key-up end to end: [`Autocomplete::submit`], an awaited fetch, then [`Autocomplete::apply`].
    ///
    /// This is the sequential composition of the handler. The terminal client does not await requests inline; it
    /// calls `submit` and `apply` on either side of a spawned request so that typing never blocks on the network.
    #[allow(dead_code)]
    pub async fn on_key_up<F: Fetch>(&mut self, fetch: &F, query: &str) -> Result<Outcome, Error> {
        if !self.submit(query)? {
            return Outcome::Skipped.ok();
        }

        let response = fetch.fetch(query).await;

        self.apply(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::storage::MemoryStorage;
    use http::StatusCode;
    use std::{collections::HashMap, sync::Mutex};

    const PARIS_LYON: &str = r#"[{"city":"Paris"},{"city":"Lyon"}]"#;

    #[derive(Default)]
    struct FakeFetch {
        responses: HashMap<String, Result<String, FetchError>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetch {
        fn with(mut self, query: &str, response: Result<&str, FetchError>) -> Self {
            self.responses.insert(query.into(), response.map(str::to_owned));

            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Fetch for FakeFetch {
        fn fetch(&self, query: &str) -> impl Send + std::future::Future<Output = Result<String, FetchError>> {
            self.requests.lock().unwrap().push(query.into());

            let response = self.responses.get(query).cloned().unwrap_or_else(|| String::new().ok());

            std::future::ready(response)
        }
    }

    fn autocomplete() -> Autocomplete<MemoryStorage> {
        Autocomplete::new(MemoryStorage::default())
    }

    fn values<S: Storage>(autocomplete: &Autocomplete<S>) -> Vec<&str> {
        autocomplete.dropdown().values().collect()
    }

    fn seed<S: Storage>(autocomplete: &mut Autocomplete<S>, values: &[&str]) {
        for value in values {
            autocomplete.dropdown_mut().append(DropdownOption::new((*value).into()));
        }
    }

    #[tokio::test]
    async fn identical_queries_issue_one_request() {
        let fetch = FakeFetch::default().with("Pa", Ok(PARIS_LYON));
        let mut autocomplete = autocomplete();

        assert_eq!(
            autocomplete.on_key_up(&fetch, "Pa").await.unwrap(),
            Outcome::Replaced { num_options: 2 }
        );
        assert_eq!(autocomplete.on_key_up(&fetch, "Pa").await.unwrap(), Outcome::Skipped);
        assert_eq!(autocomplete.on_key_up(&fetch, "Pa").await.unwrap(), Outcome::Skipped);
        assert_eq!(fetch.requests(), ["Pa"]);
    }

    #[tokio::test]
    async fn only_consecutive_duplicates_are_suppressed() {
        let fetch = FakeFetch::default();
        let mut autocomplete = autocomplete();

        for query in ["P", "Pa", "Pa", "P"] {
            autocomplete.on_key_up(&fetch, query).await.unwrap();
        }

        assert_eq!(fetch.requests(), ["P", "Pa", "P"]);
    }

    #[tokio::test]
    async fn first_key_up_requests_even_an_empty_query() {
        let fetch = FakeFetch::default();
        let mut autocomplete = autocomplete();

        assert_eq!(autocomplete.on_key_up(&fetch, "").await.unwrap(), Outcome::EmptyResponse);
        assert_eq!(fetch.requests(), [""]);
        assert_eq!(autocomplete.last_query().unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn response_replaces_options_in_order() {
        let fetch = FakeFetch::default().with("Pa", Ok(PARIS_LYON));
        let mut autocomplete = autocomplete();

        seed(&mut autocomplete, &["Berlin", "Bern", "Bergen"]);
        autocomplete.on_key_up(&fetch, "Pa").await.unwrap();

        assert_eq!(values(&autocomplete), ["Paris", "Lyon"]);
        assert_eq!(autocomplete.dropdown().options()[0].label(), "Paris");
    }

    #[tokio::test]
    async fn duplicate_records_become_duplicate_options() {
        let fetch = FakeFetch::default().with("Pa", Ok(r#"[{"city":"Paris"},{"city":"Paris","score":3}]"#));
        let mut autocomplete = autocomplete();

        autocomplete.on_key_up(&fetch, "Pa").await.unwrap();

        assert_eq!(values(&autocomplete), ["Paris", "Paris"]);
    }

    #[tokio::test]
    async fn empty_response_leaves_dropdown_unchanged() {
        let fetch = FakeFetch::default().with("Zz", Ok(""));
        let mut autocomplete = autocomplete();

        seed(&mut autocomplete, &["Paris"]);

        assert_eq!(autocomplete.on_key_up(&fetch, "Zz").await.unwrap(), Outcome::EmptyResponse);
        assert_eq!(values(&autocomplete), ["Paris"]);
    }

    #[tokio::test]
    async fn failure_is_absorbed_and_leaves_dropdown_unchanged() {
        let fetch_err = FetchError::from_status(StatusCode::SERVICE_UNAVAILABLE);
        let fetch = FakeFetch::default().with("Pa", Err(fetch_err));
        let mut autocomplete = autocomplete();

        seed(&mut autocomplete, &["Paris"]);

        assert_eq!(autocomplete.on_key_up(&fetch, "Pa").await.unwrap(), Outcome::Failed);
        assert_eq!(values(&autocomplete), ["Paris"]);
        assert_eq!(autocomplete.last_query().unwrap().as_deref(), Some("Pa"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error_and_leaves_dropdown_unchanged() {
        let fetch = FakeFetch::default().with("Pa", Ok("{not json"));
        let mut autocomplete = autocomplete();

        seed(&mut autocomplete, &["Paris"]);

        let result = autocomplete.on_key_up(&fetch, "Pa").await;

        assert!(matches!(result, Err(Error::SerdeJson(_))));
        assert_eq!(values(&autocomplete), ["Paris"]);
    }

    #[tokio::test]
    async fn storage_holds_most_recent_query() {
        let fetch = FakeFetch::default();
        let mut autocomplete = autocomplete();

        for query in ["L", "Ly", "Lyo", "Lyon"] {
            autocomplete.on_key_up(&fetch, query).await.unwrap();
        }

        assert_eq!(
            autocomplete.storage.get_item(Autocomplete::<MemoryStorage>::LAST_QUERY_KEY).unwrap().as_deref(),
            Some("Lyon")
        );
    }

    #[test]
    fn late_response_overwrites_newer_one() {
        let mut autocomplete = autocomplete();

        assert!(autocomplete.submit("Ly").unwrap());
        assert!(autocomplete.submit("Lyo").unwrap());

        autocomplete.apply(Ok(r#"[{"city":"Lyon"}]"#.into())).unwrap();
        autocomplete.apply(Ok(r#"[{"city":"Lyon"},{"city":"Lys"}]"#.into())).unwrap();

        assert_eq!(values(&autocomplete), ["Lyon", "Lys"]);
        assert_eq!(autocomplete.last_query().unwrap().as_deref(), Some("Lyo"));
    }

    #[test]
    fn last_query_survives_a_new_controller() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("storage.json");
        let storage = crate::autocomplete::storage::FileStorage::open(&filepath).unwrap();

        assert!(Autocomplete::new(storage).submit("Paris").unwrap());

        let storage = crate::autocomplete::storage::FileStorage::open(&filepath).unwrap();

        assert!(!Autocomplete::new(storage).submit("Paris").unwrap());
    }

    #[test]
    fn failed_persist_does_not_suppress_the_retry() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");

        let filepath = blocker.join("storage.json");
        let mut autocomplete = Autocomplete::new(crate::autocomplete::storage::FileStorage::open(&filepath).unwrap());

        std::fs::write(&blocker, "").unwrap();

        assert!(autocomplete.submit("Pa").is_err());
        assert_eq!(autocomplete.last_query().unwrap(), None);

        std::fs::remove_file(&blocker).unwrap();

        assert!(autocomplete.submit("Pa").unwrap());
        assert_eq!(autocomplete.last_query().unwrap().as_deref(), Some("Pa"));
    }
}
