//! services/site/src/host/session.rs
//!
//! The main control loop of the widget host. It reads one `UiEvent` per line,
//! dispatches it, and writes the resulting `ViewUpdate`s back one per line.

use crate::adapters::ToastQueue;
use crate::error::SiteError;
use crate::host::handler::{dispatch, render_all};
use crate::host::protocol::{UiEvent, ViewUpdate};
use crate::host::state::SiteState;
use futures::{Sink, SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

/// Longest accepted event line, in bytes.
pub const MAX_EVENT_LINE: usize = 64 * 1024;

/// Runs until `reader` reaches end of input. Malformed lines are answered with
/// an `error` update and the loop carries on; I/O failures end it.
pub async fn run<R, W>(
    state: &mut SiteState,
    toasts: &ToastQueue,
    reader: R,
    writer: W,
) -> Result<(), SiteError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_EVENT_LINE));
    let mut updates = FramedWrite::new(writer, LinesCodec::new());

    // --- 1. Mount: render every panel once ---
    send_all(&mut updates, render_all(state)).await?;
    info!("Widgets mounted, waiting for events");

    // --- 2. Main Event Loop ---
    let mut recovering = false;
    loop {
        let line = match events.next().await {
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                warn!(limit = MAX_EVENT_LINE, "Dropping oversized event line");
                let error = ViewUpdate::Error {
                    message: format!("Event exceeds {MAX_EVENT_LINE} bytes"),
                };
                send_all(&mut updates, vec![error]).await?;
                recovering = true;
                continue;
            }
            Some(Err(e)) => return Err(e.into()),
            // After a decode error the reader yields one `None`, then resumes
            // with the line following the discarded one.
            None if recovering => {
                recovering = false;
                continue;
            }
            None => break,
        };
        recovering = false;
        if line.trim().is_empty() {
            continue;
        }

        let mut batch = match serde_json::from_str::<UiEvent>(&line) {
            Ok(event) => {
                debug!(?event, "Dispatching UI event");
                dispatch(state, event)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring malformed event");
                vec![ViewUpdate::Error {
                    message: format!("Malformed event: {e}"),
                }]
            }
        };
        batch.extend(toasts.drain().into_iter().map(ViewUpdate::from));
        send_all(&mut updates, batch).await?;
    }

    info!("Event stream closed");
    Ok(())
}

async fn send_all<S>(sink: &mut S, batch: Vec<ViewUpdate>) -> Result<(), SiteError>
where
    S: Sink<String, Error = LinesCodecError> + Unpin,
{
    for update in batch {
        sink.send(serde_json::to_string(&update)?).await?;
    }
    Ok(())
}
