//! Runs reducer commands against the TMDB API.

use std::sync::Arc;

use movie_explorer_api::tmdb::TmdbApi;
use tokio::sync::mpsc::UnboundedSender;

use crate::state::{Command, Event};

/// Executes a single command and returns the event carrying its result.
pub async fn execute<A>(api: &A, command: Command) -> Event
where
    A: TmdbApi + Sync,
{
    match command {
        Command::LoadConfiguration => Event::ConfigurationLoaded(api.configuration().await),
        Command::FetchMovies {
            ticket,
            endpoint,
            page,
        } => {
            tracing::debug!(ticket = ticket.get(), %endpoint, page, "fetching movies");
            let result = api.movie_page(&endpoint, page).await;
            Event::MoviesLoaded { ticket, result }
        }
    }
}

/// Spawns each command as its own task, delivering results on `tx`.
///
/// Results arrive in completion order; the reducer discards stale ones.
pub fn dispatch<A>(api: &Arc<A>, commands: Vec<Command>, tx: &UnboundedSender<Event>)
where
    A: TmdbApi + Send + Sync + 'static,
{
    for command in commands {
        let api = Arc::clone(api);
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = execute(api.as_ref(), command).await;
            if tx.send(event).is_err() {
                tracing::debug!("browser closed before response arrived");
            }
        });
    }
}
