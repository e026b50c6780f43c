// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error aggregator: drains the per-cycle error queue and joins the messages
//! into a single report. An empty string means "no non-fatal errors".

use tokio::sync::mpsc;

/// Drains `error_rx` until the sender side closes, then joins every message
/// with `"; "`. Runs as its own task so it can be spawned alongside the
/// worker pool and awaited after the task/error channels are closed.
pub async fn run_aggregator(mut error_rx: mpsc::Receiver<String>) -> String {
    let mut messages = Vec::new();
    while let Some(message) = error_rx.recv().await {
        messages.push(message);
    }
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_queue_yields_empty_string() {
        let (tx, rx) = mpsc::channel(30);
        drop(tx);
        assert_eq!(run_aggregator(rx).await, "");
    }

    #[tokio::test]
    async fn messages_are_joined_with_semicolon() {
        let (tx, rx) = mpsc::channel(30);
        tx.send("a".to_string()).await.unwrap();
        tx.send("b".to_string()).await.unwrap();
        drop(tx);
        assert_eq!(run_aggregator(rx).await, "a; b");
    }
}
