//! Tokio serving loop: JSON lines over stdio, plus an optional watcher that
//! re-syncs destinations when `memory.md` changes on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{recommended_watcher, Event, EventKind, RecursiveMode, Watcher};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::time::Instant;

use memoria_sync::sync_all;

use crate::dispatch::ServerState;
use crate::error::{io_err, ServerError};
use crate::protocol::{ToolRequest, ToolResponse};

/// Events for the same path within this window collapse into one sync.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Start the server and block the current thread until stdin closes.
pub fn start_blocking(state: ServerState, watch: bool) -> Result<(), ServerError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(state, watch))
}

/// Run the serving loop; returns when the input stream ends.
pub async fn run(state: ServerState, watch: bool) -> Result<(), ServerError> {
    let memory_path = state.store().memory_path();
    let state = Arc::new(Mutex::new(state));
    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    let watcher_handle = if watch {
        let shutdown = shutdown_tx.clone();
        let state = state.clone();
        Some(tokio::spawn(async move {
            let result = watcher_task(memory_path, state, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        }))
    } else {
        None
    };

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let serve_result = serve_lines(stdin, stdout, state).await;
    let _ = shutdown_tx.send(());

    if let Some(handle) = watcher_handle {
        match handle.await {
            Ok(inner) => inner?,
            Err(err) => {
                return Err(ServerError::Protocol(format!(
                    "watcher task join failure: {err}"
                )))
            }
        }
    }
    serve_result
}

/// Read request lines, dispatch, write response lines. Malformed JSON gets an
/// error response and the loop continues.
pub async fn serve_lines<R, W>(
    reader: R,
    mut writer: W,
    state: Arc<Mutex<ServerState>>,
) -> Result<(), ServerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| io_err("request stream", e))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolRequest>(&line) {
            Ok(request) => state.lock().await.handle(request),
            Err(err) => ToolResponse::error(format!("invalid request JSON: {err}")),
        };

        let payload = serde_json::to_string(&response)?;
        writer
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| io_err("response stream", e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| io_err("response stream", e))?;
        writer
            .flush()
            .await
            .map_err(|e| io_err("response stream", e))?;
    }

    Ok(())
}

/// Watch `memory.md` for external edits; on change, reload the document and
/// re-sync every destination. Sync failures are logged, never fatal.
async fn watcher_task(
    memory_path: PathBuf,
    state: Arc<Mutex<ServerState>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    let Some(watch_dir) = memory_path.parent().map(Path::to_path_buf) else {
        return Err(ServerError::Protocol(
            "memory path has no parent directory".to_string(),
        ));
    };
    if !watch_dir.exists() {
        std::fs::create_dir_all(&watch_dir).map_err(|e| io_err(&watch_dir, e))?;
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut _watcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    _watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %memory_path.display(), "watching document for external edits");

    let mut debounce = HashMap::<PathBuf, Instant>::new();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watcher event error");
                        continue;
                    }
                };
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    continue;
                }

                for path in event.paths {
                    if path != memory_path {
                        continue;
                    }
                    if !should_process_event(&mut debounce, &path, Instant::now()) {
                        continue;
                    }

                    let mut guard = state.lock().await;
                    if let Err(err) = guard.store_mut().load_template() {
                        tracing::error!(error = %err, "document reload failed");
                        continue;
                    }
                    let target_root = guard.target_root().to_path_buf();
                    match sync_all(guard.store(), &target_root, None, false) {
                        Ok(results) => {
                            let failed = results.iter().filter(|r| !r.success).count();
                            tracing::info!(
                                platforms = results.len(),
                                failed,
                                "watcher-triggered sync completed",
                            );
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "watcher-triggered sync failed");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn should_process_event(
    debounce: &mut HashMap<PathBuf, Instant>,
    path: &Path,
    now: Instant,
) -> bool {
    debounce.retain(|_, seen_at| now.duration_since(*seen_at) <= Duration::from_secs(30));
    match debounce.get(path) {
        Some(last_seen) if now.duration_since(*last_seen) < DEBOUNCE_WINDOW => false,
        _ => {
            debounce.insert(path.to_path_buf(), now);
            true
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    // Stdout carries the protocol; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
