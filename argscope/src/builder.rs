// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Writes samples in the producer's format.

use argscope_common::{EventHeader, PaddingFooter, TASK_COMM_LEN};
use bytes::{BufMut as _, Bytes, BytesMut};

use crate::header::{encode_header, EventKind};

/// A header with the given identity, `uid` 0 and `ts` 0.
pub fn event_header(kind: EventKind, pid: u32, tid: u32, comm: &str, argnum: u8) -> EventHeader {
    let mut comm_bytes = [0u8; TASK_COMM_LEN];
    let len = comm.len().min(TASK_COMM_LEN - 1);
    comm_bytes[..len].copy_from_slice(&comm.as_bytes()[..len]);

    EventHeader {
        eventid: kind.id(),
        tid,
        pid,
        host_tid: tid,
        host_pid: pid,
        comm: comm_bytes,
        argnum,
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct SampleBuilder {
    buf: BytesMut,
}

impl SampleBuilder {
    pub fn new() -> Self {
        SampleBuilder::default()
    }

    pub fn header(mut self, header: &EventHeader) -> Self {
        encode_header(header, &mut self.buf);
        self
    }

    pub fn syscall_prelude(mut self, nr: u32, lr: u64, pc: u64, sp: u64) -> Self {
        self.buf.put_u32_le(nr);
        self.buf.put_u64_le(lr);
        self.buf.put_u64_le(pc);
        self.buf.put_u64_le(sp);
        self
    }

    pub fn syscall_exit_prelude(self, nr: u32, lr: u64, pc: u64, sp: u64, ret: i64) -> Self {
        let mut this = self.syscall_prelude(nr, lr, pc, sp);
        this.buf.put_i64_le(ret);
        this
    }

    pub fn uprobe_prelude(self, probe_index: u32, lr: u64, pc: u64, sp: u64) -> Self {
        self.syscall_prelude(probe_index, lr, pc, sp)
    }

    pub fn register(mut self, value: u64) -> Self {
        self.buf.put_u64_le(value);
        self
    }

    /// The two register reads of a followed pointer.
    pub fn pointer(self, outer: u64, inner: u64) -> Self {
        self.register(outer).register(inner)
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.buf.put_u32_le(value);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Appends the in-memory image of a `#[repr(C)]` layout without
    /// implicit padding. Only matches the wire format on little-endian hosts.
    #[cfg(test)]
    pub fn raw_struct<T: Copy>(self, value: &T) -> Self {
        assert!(
            cfg!(target_endian = "little"),
            "in-memory layouts are not wire layouts on big-endian hosts"
        );
        // SAFETY: T is a plain-old-data layout from argscope_common, whose
        // size assertions guarantee there are no uninitialized padding bytes.
        let bytes = unsafe {
            std::slice::from_raw_parts(value as *const T as *const u8, std::mem::size_of::<T>())
        };
        self.raw(bytes)
    }

    fn len_prefixed(mut self, data: &[u8]) -> Self {
        self.buf.put_u32_le(data.len() as u32);
        self.buf.put_slice(data);
        self
    }

    /// The footer closing a variable-length argument, and its pad.
    pub fn footer(mut self, index: u8, part_raw_size: u32) -> Self {
        self.buf.put_u8(index);
        self.buf.put_u32_le(part_raw_size);
        self.buf
            .put_bytes(0, PaddingFooter::pad_len(part_raw_size) as usize);
        self
    }

    pub fn string(self, index: u8, text: &[u8]) -> Self {
        self.len_prefixed(text).footer(index, text.len() as u32)
    }

    pub fn buffer(self, index: u8, data: &[u8]) -> Self {
        self.len_prefixed(data).footer(index, data.len() as u32)
    }

    pub fn string_array(self, index: u8, items: &[&[u8]]) -> Self {
        let total: usize = items.iter().map(|item| item.len()).sum();
        let this = items
            .iter()
            .fold(self.u32(items.len() as u32), |b, item| b.len_prefixed(item));
        this.footer(index, total as u32)
    }

    pub fn iovec(mut self, index: u8, base: u64, payload: &[u8]) -> Self {
        self.buf.put_u64_le(base);
        self.buf.put_u64_le(payload.len() as u64);
        self.len_prefixed(payload).footer(index, payload.len() as u32)
    }

    pub fn build(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Frames samples as a capture file: each one preceded by its `u32` length.
pub fn encode_capture<'a>(samples: impl IntoIterator<Item = &'a [u8]>) -> Bytes {
    let mut out = BytesMut::new();
    for sample in samples {
        out.put_u32_le(sample.len() as u32);
        out.put_slice(sample);
    }
    out.freeze()
}
