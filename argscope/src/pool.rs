// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Concurrent decoding. Samples are independent, so any worker may take any
//! of them; results carry the sample's sequence number and `Reorder` puts
//! them back in capture order.

use std::{collections::BTreeMap, sync::Arc};

use bytes::Bytes;
use log::{trace, warn};
use tokio::{
    sync::{
        mpsc::{Receiver, Sender},
        Mutex,
    },
    task::JoinHandle,
};

use crate::{
    config::ProbeConfig,
    error::DecodeError,
    events::{decode_event, Event},
    filter::ProcessFilter,
    header::decode_header,
    reader::SampleReader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub seq: u64,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Decoded(Event),
    /// Dropped by the process filter.
    Filtered,
    Failed(DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub seq: u64,
    pub outcome: Outcome,
}

fn process(sample: &RawSample, config: &ProbeConfig, filter: &ProcessFilter) -> Outcome {
    // A header that does not even decode is reported by decode_event below.
    if let Ok(header) = decode_header(&mut SampleReader::new(&sample.data)) {
        if !filter.should_trace(&header) {
            return Outcome::Filtered;
        }
    }

    match decode_event(&sample.data, config) {
        Ok(event) => Outcome::Decoded(event),
        Err(e) => Outcome::Failed(e),
    }
}

pub struct DecodePool {
    workers: Vec<JoinHandle<()>>,
}

impl DecodePool {
    /// Starts `workers` tasks pulling from `input`. Workers exit once
    /// `input` is closed and drained, or when `output` goes away.
    pub fn spawn(
        config: Arc<ProbeConfig>,
        filter: Arc<ProcessFilter>,
        workers: usize,
        input: Receiver<RawSample>,
        output: Sender<DecodeResult>,
    ) -> Self {
        let input = Arc::new(Mutex::new(input));

        let workers = (0..workers.max(1))
            .map(|id| {
                let input = input.clone();
                let output = output.clone();
                let config = config.clone();
                let filter = filter.clone();

                tokio::spawn(async move {
                    loop {
                        // Hold the lock only while waiting for the next sample.
                        let sample = input.lock().await.recv().await;
                        let Some(sample) = sample else {
                            trace!("[decoder {id}] input closed, stopping...");
                            return;
                        };

                        let outcome = process(&sample, &config, &filter);
                        let result = DecodeResult {
                            seq: sample.seq,
                            outcome,
                        };
                        if output.send(result).await.is_err() {
                            trace!("[decoder {id}] output closed, stopping...");
                            return;
                        }
                    }
                })
            })
            .collect();

        DecodePool { workers }
    }

    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                warn!("decoder task failed: {e}");
            }
        }
    }
}

/// Releases results in sequence order, holding back the ones that arrive
/// early. Sequence numbers must start at 0 and have no gaps.
#[derive(Debug, Default)]
pub struct Reorder {
    next: u64,
    pending: BTreeMap<u64, Outcome>,
}

impl Reorder {
    pub fn new() -> Self {
        Reorder::default()
    }

    pub fn push(&mut self, result: DecodeResult) -> Vec<DecodeResult> {
        self.pending.insert(result.seq, result.outcome);

        let mut ready = vec![];
        while let Some(outcome) = self.pending.remove(&self.next) {
            ready.push(DecodeResult {
                seq: self.next,
                outcome,
            });
            self.next += 1;
        }
        ready
    }

    /// Results still waiting for an earlier sequence number.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
