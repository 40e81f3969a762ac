// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{collections::HashSet, path::PathBuf, pin::Pin, sync::Arc};

use anyhow::{bail, Context as _, Result};
use argscope::{
    capture::CaptureRecords,
    config::{DisplayOptions, ProbeConfig, ProbePoint, DEFAULT_PREVIEW_LEN},
    filter::{FilterMode, ProcessFilter},
    formatting::{write_event, Formatter, FormattingStyle},
    pool::{DecodePool, DecodeResult, Outcome, RawSample, Reorder},
};
use clap::Parser;
use log::{debug, trace, warn};
use tokio::{
    io::AsyncWriteExt as _,
    sync::mpsc::{channel, Receiver},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Capture file: a sequence of `u32` little-endian lengths, each followed by one raw sample
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Probe point, `syscall:<nr>:<name>[:<arg>,...]` or `uprobe:<index>:<name>[:<arg>,...]`,
    /// where each arg is `name=type` (can be repeated)
    #[arg(short = 'P', long = "point", action = clap::ArgAction::Append, required = true)]
    points: Vec<ProbePoint>,

    /// Show buffers as a hex dump instead of an escaped preview
    #[arg(long = "dump-hex")]
    dump_hex: bool,

    /// Highlight hex dumps
    #[arg(long = "color")]
    color: bool,

    /// Number of buffer bytes shown in previews
    #[arg(long = "preview-len", default_value_t = DEFAULT_PREVIEW_LEN)]
    preview_len: usize,

    // Formatting style, `one-line` or `multi-line`
    #[arg(long = "format", value_enum, default_value_t = FormattingStyle::default())]
    style: FormattingStyle,

    /// Number of decoding tasks
    #[arg(short = 'j', long = "workers", default_value_t = 4)]
    workers: usize,

    /// Only show processes of this user
    #[arg(long = "uid", conflicts_with = "pid")]
    uid: Option<u32>,

    /// Only show this process
    #[arg(short = 'p', long = "pid")]
    pid: Option<u32>,

    /// Only show this thread of the process given with --pid
    #[arg(short = 't', long = "tid", requires = "pid")]
    tid: Option<u32>,

    /// Processes to hide in --uid mode (can be repeated or comma-separated)
    #[arg(long = "blacklist-pid", value_delimiter = ',', requires = "uid")]
    blacklist_pids: Vec<u32>,

    /// Threads to hide in --uid or --pid mode (can be repeated or comma-separated)
    #[arg(long = "blacklist-tid", value_delimiter = ',', conflicts_with = "tid")]
    blacklist_tids: Vec<u32>,
}

impl Args {
    fn probe_config(&self) -> Result<ProbeConfig> {
        let mut config = ProbeConfig::new(DisplayOptions {
            dump_hex: self.dump_hex,
            color: self.color,
            preview_len: self.preview_len,
        });
        for point in &self.points {
            config.add(point.clone())?;
        }
        Ok(config)
    }

    fn process_filter(&self) -> Result<ProcessFilter> {
        let blacklist_tids = self.blacklist_tids.iter().copied().collect::<HashSet<_>>();

        let mode = match (self.uid, self.pid, self.tid) {
            (Some(uid), None, None) => FilterMode::Uid {
                uid,
                blacklist_pids: self.blacklist_pids.iter().copied().collect(),
                blacklist_tids,
            },
            (None, Some(pid), None) => FilterMode::Pid {
                pid,
                blacklist_tids,
            },
            (None, Some(pid), Some(tid)) => FilterMode::PidTid { pid, tid },
            (None, None, None) => {
                if !blacklist_tids.is_empty() {
                    bail!("--blacklist-tid needs --uid or --pid");
                }
                FilterMode::All
            }
            _ => bail!("--uid, --pid and --tid select conflicting filter modes"),
        };

        Ok(ProcessFilter::new(mode).excluding_self(std::process::id()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Arc::new(args.probe_config()?);
    let filter = Arc::new(args.process_filter()?);
    let records = CaptureRecords::open(&args.input).await?;

    let (tx, rx) = channel(128);
    let (result_tx, result_rx) = channel(128);
    let pool = DecodePool::spawn(config, filter, args.workers, rx, result_tx);

    // A broken capture stops reading, but everything before it is still
    // decoded and printed.
    let reader = tokio::spawn(async move {
        for (seq, record) in records.enumerate() {
            let sample = RawSample {
                seq: seq as u64,
                data: record?,
            };
            if tx.send(sample).await.is_err() {
                bail!("decoder pool went away");
            }
        }
        Ok::<_, anyhow::Error>(())
    });

    let stats = print_results(result_rx, args.style).await?;
    pool.join().await;
    debug!(
        "{} events printed, {} filtered, {} failed",
        stats.printed, stats.filtered, stats.failed
    );

    reader.await.context("capture reader task failed")?
}

#[derive(Debug, Default)]
struct Stats {
    printed: usize,
    filtered: usize,
    failed: usize,
}

async fn print_results(mut rx: Receiver<DecodeResult>, style: FormattingStyle) -> Result<Stats> {
    let mut stdout = tokio::io::BufWriter::new(tokio::io::stdout());
    let mut reorder = Reorder::new();
    let mut stats = Stats::default();
    let mut output: Vec<u8> = vec![];

    while let Some(result) = rx.recv().await {
        for DecodeResult { seq, outcome } in reorder.push(result) {
            match outcome {
                Outcome::Decoded(event) => {
                    output.clear();
                    let pinned_output = Pin::new(&mut output);
                    let formatter = Formatter::new(pinned_output, style);
                    write_event(formatter, &event).await?;
                    stdout.write_all(&output).await?;
                    stats.printed += 1;
                }
                Outcome::Filtered => {
                    trace!("sample {seq} filtered out");
                    stats.filtered += 1;
                }
                Outcome::Failed(e) => {
                    warn!("dropping sample {seq}: {e}");
                    stats.failed += 1;
                }
            }
        }
    }

    if reorder.pending() > 0 {
        warn!("{} results never got in order", reorder.pending());
    }

    stdout.flush().await?;
    Ok(stats)
}
