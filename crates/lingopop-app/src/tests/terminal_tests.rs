use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use lingopop_ui::run_terminal;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::{FakeGateway, RecordingSink, fake_state};
use crate::controller::ChannelSet;
use crate::events::event_loop;

/// A piped command file is far larger than either channel between the loops
#[tokio::test]
async fn piped_input_burst_reaches_quit() {
    let dir = tempfile::tempdir().unwrap();
    let state = fake_state(
        dir.path(),
        Arc::new(FakeGateway::default()),
        Arc::new(RecordingSink::default()),
        Arc::new(AtomicUsize::new(0)),
    );

    let channels = ChannelSet::new();
    let cancel = CancellationToken::new();
    let app = tokio::spawn(event_loop(
        state,
        channels.ui_to_app.1.clone(),
        channels.ui_to_app.0.clone(),
        channels.app_to_ui.0.clone(),
        channels.chat.0.clone(),
        cancel.child_token(),
    ));

    let (keyboard, input) = kanal::bounded_async::<String>(16);
    let typist = tokio::spawn(async move {
        keyboard.send("/go".to_string()).await.unwrap();
        for i in 0..5000 {
            let line = if i % 2 == 0 { "/notebook" } else { "/home" };
            keyboard.send(line.to_string()).await.unwrap();
        }
        keyboard.send("/notebook".to_string()).await.unwrap();
        keyboard.send("/quit".to_string()).await.unwrap();
        keyboard
    });

    let mut output = tokio::io::sink();
    timeout(
        Duration::from_secs(30),
        run_terminal(
            input,
            &mut output,
            channels.app_to_ui.1.clone(),
            channels.ui_to_app.0.clone(),
            Duration::from_millis(5),
        ),
    )
    .await
    .expect("terminal and event loop stalled on each other")
    .unwrap();
    drop(typist.await.unwrap());

    // Keep draining snapshots so the event loop can reach the forwarded quit
    let app_to_ui_rx = channels.app_to_ui.1.clone();
    let drain = tokio::spawn(async move { while app_to_ui_rx.recv().await.is_ok() {} });
    timeout(Duration::from_secs(30), app)
        .await
        .expect("event loop never saw quit")
        .unwrap()
        .unwrap();
    drain.abort();
    cancel.cancel();
}
