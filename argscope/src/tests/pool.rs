// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc::channel;

use super::{config_with, syscall_enter};
use crate::{
    error::DecodeError,
    filter::{FilterMode, ProcessFilter},
    pool::{DecodePool, DecodeResult, Outcome, RawSample, Reorder},
};

fn read_sample(fd: u64) -> Bytes {
    syscall_enter(63, 1).register(fd).build()
}

/// Runs every sample through a pool and collects the results in capture
/// order.
async fn decode_all(samples: Vec<Bytes>, filter: ProcessFilter, workers: usize) -> Vec<DecodeResult> {
    let config = Arc::new(config_with(&["syscall:63:read:fd=int"]));
    let (tx, rx) = channel(4);
    let (result_tx, mut result_rx) = channel(4);

    let pool = DecodePool::spawn(config, Arc::new(filter), workers, rx, result_tx);

    let feeder = tokio::spawn(async move {
        for (seq, data) in samples.into_iter().enumerate() {
            tx.send(RawSample {
                seq: seq as u64,
                data,
            })
            .await
            .unwrap();
        }
    });

    let mut reorder = Reorder::new();
    let mut results = vec![];
    while let Some(result) = result_rx.recv().await {
        results.extend(reorder.push(result));
    }

    feeder.await.unwrap();
    pool.join().await;
    assert_eq!(reorder.pending(), 0);
    results
}

fn decoded_fd(result: &DecodeResult) -> String {
    match &result.outcome {
        Outcome::Decoded(event) => event.args()[0].values[0].clone(),
        other => panic!("sample {} not decoded: {other:?}", result.seq),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn results_come_back_in_order() {
    let samples = (0..200).map(read_sample).collect();

    let results = decode_all(samples, ProcessFilter::default(), 8).await;

    assert_eq!(results.len(), 200);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.seq, i as u64);
        assert_eq!(decoded_fd(result), format!("0x{i:x}"));
    }
}

#[tokio::test]
async fn failure_is_isolated() {
    let good = read_sample(3);
    let broken = good.slice(..good.len() - 3);
    let samples = vec![good.clone(), broken, good];

    let results = decode_all(samples, ProcessFilter::default(), 2).await;

    assert_eq!(results.len(), 3);
    assert_eq!(decoded_fd(&results[0]), "0x3");
    assert!(matches!(
        results[1].outcome,
        Outcome::Failed(DecodeError::Truncated { .. })
    ));
    assert_eq!(decoded_fd(&results[2]), "0x3");
}

#[tokio::test]
async fn filtered_samples_are_reported() {
    let samples = vec![read_sample(1), read_sample(2)];
    let filter = ProcessFilter::new(FilterMode::Pid {
        pid: 4242,
        blacklist_tids: Default::default(),
    });

    let results = decode_all(samples, filter, 1).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.outcome == Outcome::Filtered));
}

#[tokio::test]
async fn tracer_never_sees_itself() {
    // Every sample from syscall_enter comes from host pid 100.
    let filter = ProcessFilter::default().excluding_self(100);
    let results = decode_all(vec![read_sample(1)], filter, 1).await;

    assert_eq!(results[0].outcome, Outcome::Filtered);
}

#[tokio::test]
async fn garbage_header_is_a_failure_not_a_filter_hit() {
    let filter = ProcessFilter::new(FilterMode::Pid {
        pid: 4242,
        blacklist_tids: Default::default(),
    });
    let results = decode_all(vec![Bytes::from_static(b"short")], filter, 1).await;

    assert!(matches!(results[0].outcome, Outcome::Failed(_)));
}

#[tokio::test]
async fn workers_stop_when_input_closes() {
    let config = Arc::new(config_with(&[]));
    let (tx, rx) = channel::<RawSample>(1);
    let (result_tx, mut result_rx) = channel(1);

    let pool = DecodePool::spawn(config, Arc::default(), 3, rx, result_tx);
    drop(tx);

    pool.join().await;
    assert!(result_rx.recv().await.is_none());
}

#[test]
fn reorder_holds_back_early_results() {
    let result = |seq| DecodeResult {
        seq,
        outcome: Outcome::Filtered,
    };
    let seqs = |results: Vec<DecodeResult>| results.iter().map(|r| r.seq).collect::<Vec<_>>();

    let mut reorder = Reorder::new();
    assert!(reorder.push(result(2)).is_empty());
    assert!(reorder.push(result(1)).is_empty());
    assert_eq!(reorder.pending(), 2);

    assert_eq!(seqs(reorder.push(result(0))), vec![0, 1, 2]);
    assert_eq!(reorder.pending(), 0);
    assert_eq!(seqs(reorder.push(result(3))), vec![3]);
}
