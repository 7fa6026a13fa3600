//! Background worker owning the idea repository.
//!
//! The TUI never awaits network or storage work. It sends a request tagged
//! with a [`LoadTicket`] and picks up the response on a later frame.

use gauche_core::{Draw, IdeaRepository, IdeaSource, KeyValueStorage, LoadTicket};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Requests from the UI to the worker
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    /// Draw the next unseen idea
    Load(LoadTicket),
    /// Mark an idea seen, then draw the next one
    MarkSeenAndLoad { ticket: LoadTicket, idea_id: String },
    /// Forget every seen idea, then draw
    ResetAndLoad(LoadTicket),
    /// Stop the worker
    Shutdown,
}

/// Responses from the worker to the UI
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    /// Sent once at startup
    Ready { source: String, seen_count: usize },
    /// Outcome of a load
    Drawn {
        ticket: LoadTicket,
        draw: Draw,
        seen_count: usize,
    },
}

/// Spawn the worker task and return its channel endpoints
pub fn spawn_worker<S, K>(
    repository: IdeaRepository<S, K>,
) -> (mpsc::Sender<WorkerRequest>, mpsc::Receiver<WorkerResponse>)
where
    S: IdeaSource + 'static,
    K: KeyValueStorage + 'static,
{
    let (request_tx, request_rx) = mpsc::channel(16);
    let (response_tx, response_rx) = mpsc::channel(16);

    tokio::spawn(run_worker(repository, request_rx, response_tx));

    (request_tx, response_rx)
}

async fn run_worker<S, K>(
    repository: IdeaRepository<S, K>,
    mut requests: mpsc::Receiver<WorkerRequest>,
    responses: mpsc::Sender<WorkerResponse>,
) where
    S: IdeaSource,
    K: KeyValueStorage,
{
    let source = repository.source().describe();
    info!(%source, "Worker started");

    let ready = WorkerResponse::Ready {
        source,
        seen_count: repository.seen().seen_count(),
    };
    if responses.send(ready).await.is_err() {
        return;
    }

    while let Some(request) = requests.recv().await {
        let ticket = match request {
            WorkerRequest::Load(ticket) => ticket,
            WorkerRequest::MarkSeenAndLoad { ticket, idea_id } => {
                repository.seen().mark_seen(&idea_id);
                ticket
            }
            WorkerRequest::ResetAndLoad(ticket) => {
                repository.seen().clear_seen();
                ticket
            }
            WorkerRequest::Shutdown => break,
        };

        let draw = repository.draw().await;
        let response = WorkerResponse::Drawn {
            ticket,
            draw,
            seen_count: repository.seen().seen_count(),
        };

        // UI gone
        if responses.send(response).await.is_err() {
            break;
        }
    }

    debug!("Worker stopped");
}
