//! Per-recipient fan-out shared by the chat transports.

use std::{fmt::Display, future::Future};

use {
    tokio::task::JoinSet,
    tracing::{debug, error, warn},
};

use crate::{dispatch::DispatchOutcome, kind::ChannelKind};

/// Run `send` once per recipient, each on its own task.
///
/// Recipients share no failure state: one send failing (or panicking) does
/// not stop or roll back the others. Resolves once every send has finished,
/// with each outcome logged.
pub async fn fan_out<R, F, Fut, E>(
    channel: ChannelKind,
    recipients: impl IntoIterator<Item = R>,
    send: F,
) -> DispatchOutcome
where
    R: Display,
    F: Fn(R) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for recipient in recipients {
        let label = recipient.to_string();
        let fut = send(recipient);
        tasks.spawn(async move { (label, fut.await) });
    }

    let mut outcome = DispatchOutcome::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((recipient, Ok(()))) => {
                debug!(channel = %channel, recipient, "message sent");
                outcome.record(true);
            },
            Ok((recipient, Err(e))) => {
                warn!(channel = %channel, recipient, error = %e, "message send failed");
                outcome.record(false);
            },
            Err(e) => {
                error!(channel = %channel, error = %e, "send task aborted");
                outcome.record(false);
            },
        }
    }
    outcome
}
