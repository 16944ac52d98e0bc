use crate::{
    autocomplete::{
        autocomplete::Autocomplete,
        fetch::{Fetch, FetchError, HttpFetch},
        storage::{FileStorage, Storage},
    },
    config::ClientConfig,
    error::Error,
    page::{
        color_scheme::ColorScheme,
        keymap::Keymap,
        page::{Action, Page},
        render::Render,
    },
    utils::any::Any,
};
use crossterm::{
    cursor::Show,
    event::EventStream,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    QueueableCommand,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{StdoutLock, Write},
    sync::Arc,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use ulid::Ulid;

type Response = Result<String, FetchError>;

pub struct Client {
    terminal: Terminal<CrosstermBackend<StdoutLock<'static>>>,
}

impl Client {
    fn new() -> Result<Self, Error> {
        let backend = CrosstermBackend::new(std::io::stdout().lock());
        let mut client = Self {
            terminal: Terminal::new(backend)?,
        };

        client.on_init()?;

        client.ok()
    }

    fn on_init(&mut self) -> Result<(), Error> {
        crossterm::terminal::enable_raw_mode()?;
        self.terminal
            .backend_mut()
            .queue(EnterAlternateScreen)?
            .queue(Clear(ClearType::All))?
            .flush()?;

        ().ok()
    }

    fn on_drop(&mut self) -> Result<(), Error> {
        crossterm::terminal::disable_raw_mode()?;
        self.terminal
            .backend_mut()
            .queue(LeaveAlternateScreen)?
            .queue(Show)?
            .flush()?;

        ().ok()
    }

    fn draw<S: Storage>(&mut self, page: &Page<S>, color_scheme: &ColorScheme) -> Result<(), Error> {
        self.terminal
            .draw(|frame| Render::new(page.input(), page.dropdown(), color_scheme).render(frame))?;

        ().ok()
    }

    // NOTE: responses are applied in arrival order, so a slow response for an older query can replace a newer one
    fn spawn_fetch(http_fetch: &Arc<HttpFetch>, sender: &UnboundedSender<Response>, query: String) {
        let http_fetch = http_fetch.clone();
        let sender = sender.clone();
        let request_id = Ulid::new();

        tracing::info!(%request_id, query, "requesting suggestions");

        tokio::spawn(async move {
            let response = http_fetch.fetch(&query).await;

            tracing::info!(%request_id, is_ok = response.is_ok(), "received suggestions");

            sender.send(response).warn().unit();
        });
    }

    async fn run_page<S: Storage>(
        &mut self,
        mut page: Page<S>,
        http_fetch: &Arc<HttpFetch>,
        color_scheme: &ColorScheme,
    ) -> Result<(), Error> {
        let mut events = EventStream::new();
        let (sender, mut receiver): (UnboundedSender<Response>, UnboundedReceiver<Response>) =
            tokio::sync::mpsc::unbounded_channel();

        loop {
            self.draw(&page, color_scheme)?;

            tokio::select! {
                event_res_opt = events.next() => {
                    let Some(event_res) = event_res_opt else { break; };

                    match page.feed(&event_res?).warn() {
                        Some(Action::Quit) => break,
                        Some(Action::Fetch(query)) => Self::spawn_fetch(http_fetch, &sender, query),
                        Some(Action::None) | None => {}
                    }
                }
                response_opt = receiver.recv() => {
                    let Some(response) = response_opt else { break; };

                    page.apply(response).warn().unit();
                }
            }
        }

        ().ok()
    }

    pub async fn run(client_config: ClientConfig) -> Result<(), Error> {
        let storage = FileStorage::open(&client_config.storage_filepath)?;
        let http_fetch = HttpFetch::new(&client_config.server_host)?.arc();
        let page = Page::new(Autocomplete::new(storage), Keymap::new(client_config.keymap));

        tracing::info!(url = %http_fetch.url(), "starting autocomplete page");

        Self::new()?
            .run_page(page, &http_fetch, &client_config.color_scheme)
            .await
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.on_drop().error();
    }
}
