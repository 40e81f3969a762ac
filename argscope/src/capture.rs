// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::path::Path;

use anyhow::{bail, Context as _};
use bytes::{Buf as _, Bytes};

/// Splits a capture file into its raw samples. Each record is a `u32`
/// little-endian length followed by that many bytes.
#[derive(Debug, Clone)]
pub struct CaptureRecords {
    data: Bytes,
    offset: usize,
}

impl CaptureRecords {
    pub fn new(data: Bytes) -> Self {
        CaptureRecords { data, offset: 0 }
    }

    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading capture {}", path.display()))?;
        Ok(CaptureRecords::new(Bytes::from(data)))
    }
}

impl Iterator for CaptureRecords {
    type Item = anyhow::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }

        let offset = self.offset;
        let result = (|| -> anyhow::Result<Bytes> {
            let Ok(len) = self.data.try_get_u32_le() else {
                bail!("capture offset {offset}: truncated record length");
            };
            let len = len as usize;
            if self.data.len() < len {
                bail!(
                    "capture offset {offset}: record of {len} bytes, only {} left",
                    self.data.len()
                );
            }
            self.offset += 4 + len;
            Ok(self.data.split_to(len))
        })();

        // Nothing after a broken record can be trusted.
        if result.is_err() {
            self.data.clear();
        }
        Some(result)
    }
}
