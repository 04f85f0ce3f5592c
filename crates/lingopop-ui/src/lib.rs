use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use lingopop_config::Config;
use lingopop_core::session::Session;
use lingopop_core::types::AppEvent;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

pub mod commands;
pub mod render;

use commands::{Command, parse_command};
use render::{render, render_help};

/// Terminal front end on stdin/stdout
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let delta_time = {
        let config = config.read().await;
        Duration::from_millis(config.delta_time.max(1))
    };

    let input = spawn_stdin_reader();
    let mut output = tokio::io::stdout();

    run_terminal(input, &mut output, app_to_ui_rx, ui_to_app_tx, delta_time).await
}

/// Blocking stdin reads on a dedicated thread, so a pending read never holds
/// up runtime shutdown
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        read_lines(stdin.lock(), |line| tx.send(line).is_ok());
        tracing::debug!("[UI_LOOP] stdin reader finished");
    });

    rx.to_async()
}

/// Feeds each line of `reader` to `deliver` until EOF, a read error, or
/// `deliver` returning false. Bytes that are not UTF-8 are replaced rather
/// than ending the input.
pub fn read_lines<R, F>(mut reader: R, mut deliver: F)
where
    R: BufRead,
    F: FnMut(String) -> bool,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::error!("[UI_LOOP] stdin read failed: {e}");
                break;
            }
        }

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("[UI_LOOP] input line is not valid UTF-8, replacing bad bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        if !deliver(line) {
            break;
        }
    }
}

/// Forwards queued UI events to the app until Quit goes through
async fn forward_to_backend(outbox: AsyncReceiver<AppEvent>, ui_to_app_tx: AsyncSender<AppEvent>) {
    while let Ok(event) = outbox.recv().await {
        let quit = matches!(event, AppEvent::Quit);
        if ui_to_app_tx.send(event).await.is_err() || quit {
            break;
        }
    }
}

/// Reads command lines from `input` and draws snapshots into `output`.
///
/// Snapshots arriving faster than `delta_time` are coalesced into one frame.
/// Events for the app go through an unbounded outbox drained by a separate
/// task, so a full `ui_to_app` never stops snapshot intake.
pub async fn run_terminal<W>(
    input: AsyncReceiver<String>,
    output: &mut W,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    delta_time: Duration,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut redraw = tokio::time::interval(delta_time);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (outbox, outbox_rx) = kanal::unbounded_async();
    tokio::spawn(forward_to_backend(outbox_rx, ui_to_app_tx));

    let mut snapshot: Option<Session> = None;
    let mut dirty = false;

    tracing::info!("[UI_LOOP] Terminal ready");
    loop {
        tokio::select! {
            line = input.recv() => {
                let Ok(line) = line else {
                    tracing::info!("[UI_LOOP] Input closed");
                    let _ = outbox.send(AppEvent::Quit).await;
                    break;
                };

                match parse_command(&line, snapshot.as_ref()) {
                    Command::Intent(intent) => {
                        tracing::debug!("[UI_LOOP] Intent: {:?}", intent);
                        outbox.send(AppEvent::Intent(intent)).await?;
                    }
                    Command::ConfigUpdate { field, value } => {
                        outbox
                            .send(AppEvent::ConfigUpdate { field, value })
                            .await?;
                    }
                    Command::Help => print(output, &render_help()).await?,
                    Command::Quit => {
                        let _ = outbox.send(AppEvent::Quit).await;
                        break;
                    }
                    Command::Nothing => {}
                    Command::Unknown(message) => print(output, &message).await?,
                }
            }
            event = app_to_ui_rx.recv() => {
                match event? {
                    AppEvent::Render(session) => {
                        snapshot = Some(*session);
                        dirty = true;
                    }
                    AppEvent::Notice(message) => print(output, &message).await?,
                    AppEvent::Quit => break,
                    _ => {}
                }
            }
            _ = redraw.tick(), if dirty => {
                if let Some(session) = &snapshot {
                    print(output, &render(session)).await?;
                }
                dirty = false;
            }
        }
    }

    if dirty && let Some(session) = &snapshot {
        print(output, &render(session)).await?;
    }
    output.flush().await?;

    Ok(())
}

async fn print<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        output.write_all(b"\n").await?;
    }
    output.flush().await
}
