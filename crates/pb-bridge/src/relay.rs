//! Bridge event loop
//!
//! Drives the whole client lifecycle: connect and register, dispatch the
//! commands the editor pushes, answer keepalives, and reconnect whenever
//! the connection drops. Only two things end the loop: cancellation, and
//! the server rejecting our registration.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use pb_core::config::BridgeConfig;
use pb_core::ipc::{ClientMessage, ServerMessage};
use pb_core::{BridgeError, IpcError};

use crate::client::{BridgeConnector, MessageReader, MessageWriter};
use crate::handlers::CommandHandler;
use crate::reconnect::ExponentialBackoff;

/// Capacity of the queue feeding the command worker
///
/// Commands run one at a time; the queue only absorbs the short burst the
/// editor can push while the previous command finishes. Once it fills,
/// further commands are rejected with a `commandError` instead of stalling
/// the read loop.
const COMMAND_QUEUE_CAPACITY: usize = 32;

/// Capacity of the outbox carrying replies back to the write half
const OUTBOX_CAPACITY: usize = 32;

/// A command pulled off the wire, waiting for the worker
#[derive(Debug)]
enum Command {
    ComputeInitialState { route: String, page_state: String },
    PythonBuild,
}

/// Why the event loop ended without a fatal error
enum Disconnect {
    Cancelled,
    ConnectionLost(String),
}

/// Run the bridge until cancelled
pub async fn run_bridge(
    config: BridgeConfig,
    handler: Arc<dyn CommandHandler>,
    cancel: CancellationToken,
) -> Result<(), BridgeError> {
    let connector = BridgeConnector::new(config);
    let mut backoff = ExponentialBackoff::from_config(&connector.config().backoff);

    loop {
        let (reader, writer) = match connector.connect_with_retry(&mut backoff, &cancel).await {
            Some(connection) => connection,
            None => {
                tracing::info!("Bridge cancelled");
                return Ok(());
            }
        };
        backoff.reset();

        match run_event_loop(reader, writer, Arc::clone(&handler), &cancel).await {
            Ok(Disconnect::Cancelled) => {
                tracing::info!("Bridge cancelled");
                return Ok(());
            }
            Ok(Disconnect::ConnectionLost(reason)) => {
                tracing::warn!("Disconnected from ipc server: {}", reason);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Process events on one established connection
///
/// Commands are queued to a single worker so they execute in arrival order,
/// while the loop keeps reading; keepalives get answered even while a slow
/// build runs.
async fn run_event_loop(
    mut reader: MessageReader,
    mut writer: MessageWriter,
    handler: Arc<dyn CommandHandler>,
    cancel: &CancellationToken,
) -> Result<Disconnect, IpcError> {
    let (command_tx, command_rx) = mpsc::channel::<(u64, Command)>(COMMAND_QUEUE_CAPACITY);
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ClientMessage>(OUTBOX_CAPACITY);

    let worker = tokio::spawn(command_worker(command_rx, outbox_tx, handler));

    let result = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break Ok(Disconnect::Cancelled);
            }

            message = reader.recv() => {
                match message {
                    Ok(Some(message)) => {
                        match handle_message(message, &mut writer, &command_tx).await {
                            Ok(()) => {}
                            Err(e @ IpcError::RegistrationRejected(_)) => break Err(e),
                            Err(e) => break Ok(Disconnect::ConnectionLost(e.to_string())),
                        }
                    }
                    Ok(None) => {
                        break Ok(Disconnect::ConnectionLost(
                            "server closed the connection".to_string(),
                        ));
                    }
                    Err(IpcError::Malformed(e)) => {
                        // A bad line is not worth dropping the connection for
                        tracing::warn!("Ignoring malformed message: {}", e);
                    }
                    Err(e) => {
                        break Ok(Disconnect::ConnectionLost(e.to_string()));
                    }
                }
            }

            Some(reply) = outbox_rx.recv() => {
                if let Err(e) = writer.send(&reply).await {
                    break Ok(Disconnect::ConnectionLost(format!("write failed: {}", e)));
                }
            }
        }
    };

    // On disconnect, the in-flight command may finish but the rest of the
    // queue is discarded unexecuted; no reply can be delivered once the
    // connection is gone. Cancellation aborts the worker instead so Ctrl-C
    // does not wait out a long build.
    drop(command_tx);
    drop(outbox_rx);
    if matches!(result, Ok(Disconnect::Cancelled)) {
        worker.abort();
    }
    if let Err(e) = worker.await {
        if !e.is_cancelled() {
            tracing::error!("Command worker panicked: {}", e);
        }
    }

    result
}

async fn handle_message(
    message: ServerMessage,
    writer: &mut MessageWriter,
    command_tx: &mpsc::Sender<(u64, Command)>,
) -> Result<(), IpcError> {
    match message {
        ServerMessage::Registered { accepted: true, .. } => {
            tracing::info!("Registered with ipc server");
        }
        ServerMessage::Registered {
            accepted: false,
            reason,
        } => {
            return Err(IpcError::RegistrationRejected(
                reason.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }
        ServerMessage::DoComputeInitialState {
            id,
            route,
            page_state,
        } => {
            tracing::debug!("Queueing compute for route '{}' (id={})", route, id);
            queue_command(
                writer,
                command_tx,
                id,
                Command::ComputeInitialState { route, page_state },
            )
            .await?;
        }
        ServerMessage::DoPythonBuild { id } => {
            tracing::debug!("Queueing python build (id={})", id);
            queue_command(writer, command_tx, id, Command::PythonBuild).await?;
        }
        ServerMessage::Ping { timestamp } => {
            writer.send(&ClientMessage::Pong { timestamp }).await?;
        }
        ServerMessage::Pong { .. } => {
            tracing::trace!("Unsolicited pong");
        }
    }
    Ok(())
}

/// Hand a command to the worker, or reject it with a `commandError` when
/// the queue is full or the worker is gone
async fn queue_command(
    writer: &mut MessageWriter,
    command_tx: &mpsc::Sender<(u64, Command)>,
    id: u64,
    command: Command,
) -> Result<(), IpcError> {
    use tokio::sync::mpsc::error::TrySendError;

    match command_tx.try_send((id, command)) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => {
            tracing::warn!("Command queue full, rejecting command {}", id);
            writer
                .send(&ClientMessage::CommandError {
                    id,
                    message: "bridge is busy".to_string(),
                })
                .await
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!("Command worker stopped, rejecting command {}", id);
            writer
                .send(&ClientMessage::CommandError {
                    id,
                    message: "bridge is not executing commands".to_string(),
                })
                .await
        }
    }
}

/// Execute queued commands one at a time, in arrival order
///
/// Every command executed produces exactly one reply: an `ack` on success,
/// a `commandError` on failure. Commands still queued when the connection
/// drops are discarded unexecuted.
async fn command_worker(
    mut command_rx: mpsc::Receiver<(u64, Command)>,
    outbox: mpsc::Sender<ClientMessage>,
    handler: Arc<dyn CommandHandler>,
) {
    while let Some((id, command)) = command_rx.recv().await {
        // No reply can be delivered once the event loop drops the outbox;
        // skip whatever is still queued instead of running it blind.
        if outbox.is_closed() {
            tracing::debug!("Discarding queued command {} after disconnect", id);
            continue;
        }

        let reply = match execute(handler.as_ref(), command).await {
            Ok(payload) => ClientMessage::Ack { id, payload },
            Err(e) => {
                tracing::warn!("Command {} failed: {}", id, e);
                ClientMessage::CommandError {
                    id,
                    message: e.to_string(),
                }
            }
        };

        if outbox.send(reply).await.is_err() {
            tracing::debug!("Connection closed before command {} could be acknowledged", id);
        }
    }
}

async fn execute(
    handler: &dyn CommandHandler,
    command: Command,
) -> Result<Option<Vec<u8>>, BridgeError> {
    match command {
        Command::ComputeInitialState { route, page_state } => {
            let output = handler.compute_initial_state(&route, &page_state).await?;
            Ok(Some(output))
        }
        Command::PythonBuild => {
            handler.python_build().await?;
            Ok(None)
        }
    }
}
