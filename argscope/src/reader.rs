// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::REGISTER_SIZE;
use bytes::{Buf as _, TryGetError};

use crate::error::{DecodeError, Result};

fn truncated(what: &'static str) -> impl FnOnce(TryGetError) -> DecodeError {
    move |e| DecodeError::Truncated {
        what,
        needed: e.requested,
        available: e.available,
    }
}

macro_rules! read_le {
    ($name:ident, $ty:ty, $get:ident) => {
        pub fn $name(&mut self, what: &'static str) -> Result<$ty> {
            self.buf.$get().map_err(truncated(what))
        }
    };
}

/// Forward-only cursor over one raw sample. All multi-byte values are
/// little-endian regardless of the host.
#[derive(Debug, Clone)]
pub struct SampleReader<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> SampleReader<'a> {
    pub fn new(sample: &'a [u8]) -> Self {
        SampleReader {
            buf: sample,
            len: sample.len(),
        }
    }

    pub fn consumed(&self) -> usize {
        self.len - self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Bytes not consumed yet.
    pub fn rest(&self) -> &'a [u8] {
        self.buf
    }

    read_le!(u8, u8, try_get_u8);
    read_le!(u16, u16, try_get_u16_le);
    read_le!(i16, i16, try_get_i16_le);
    read_le!(u32, u32, try_get_u32_le);
    read_le!(i32, i32, try_get_i32_le);
    read_le!(u64, u64, try_get_u64_le);
    read_le!(i64, i64, try_get_i64_le);

    pub fn bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(DecodeError::Truncated {
                what,
                needed: n,
                available: self.buf.len(),
            });
        }

        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N, what)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize, what: &'static str) -> Result<()> {
        self.bytes(n, what).map(|_| ())
    }

    /// A `u32` length followed by that many bytes. A length larger than the
    /// rest of the sample is reported as malformed rather than short.
    pub fn len_prefixed(&mut self, what: &'static str) -> Result<&'a [u8]> {
        let declared = self.u32(what)?;
        let available = self.remaining();
        if declared as usize > available {
            return Err(DecodeError::MalformedLength {
                what,
                declared,
                available,
            });
        }

        self.bytes(declared as usize, what)
    }

    pub fn register(&mut self) -> Result<RegisterValue> {
        let raw = self.array::<REGISTER_SIZE>("register")?;
        Ok(RegisterValue {
            address: u64::from_le_bytes(raw),
        })
    }
}

/// One register-sized slot: either a pointer or a raw scalar, the caller
/// decides which.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterValue {
    pub address: u64,
}

impl RegisterValue {
    pub fn is_null(&self) -> bool {
        self.address == 0
    }
}
