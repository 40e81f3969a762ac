// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::{EventHeader, SYSCALL_ENTER, SYSCALL_EXIT, UPROBE_ENTER};
use bytes::BufMut;

use crate::{error::Result, format_helpers::cstr_lossy, reader::SampleReader};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    SyscallEnter,
    SyscallExit,
    UprobeEnter,
}

impl EventKind {
    pub fn from_id(eventid: u32) -> Option<Self> {
        match eventid {
            SYSCALL_ENTER => Some(EventKind::SyscallEnter),
            SYSCALL_EXIT => Some(EventKind::SyscallExit),
            UPROBE_ENTER => Some(EventKind::UprobeEnter),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            EventKind::SyscallEnter => SYSCALL_ENTER,
            EventKind::SyscallExit => SYSCALL_EXIT,
            EventKind::UprobeEnter => UPROBE_ENTER,
        }
    }
}

/// Reads the fixed header. Nothing is validated beyond the byte count.
pub fn decode_header(reader: &mut SampleReader<'_>) -> Result<EventHeader> {
    Ok(EventHeader {
        ts: reader.u64("header ts")?,
        eventid: reader.u32("header eventid")?,
        host_tid: reader.u32("header host_tid")?,
        host_pid: reader.u32("header host_pid")?,
        tid: reader.u32("header tid")?,
        pid: reader.u32("header pid")?,
        uid: reader.u32("header uid")?,
        comm: reader.array("header comm")?,
        argnum: reader.u8("header argnum")?,
        padding: reader.array("header padding")?,
    })
}

pub fn encode_header(header: &EventHeader, out: &mut impl BufMut) {
    out.put_u64_le(header.ts);
    out.put_u32_le(header.eventid);
    out.put_u32_le(header.host_tid);
    out.put_u32_le(header.host_pid);
    out.put_u32_le(header.tid);
    out.put_u32_le(header.pid);
    out.put_u32_le(header.uid);
    out.put_slice(&header.comm);
    out.put_u8(header.argnum);
    out.put_slice(&header.padding);
}

pub trait HeaderExt {
    fn comm_str(&self) -> String;

    /// `<pid>_<tid>`, identifying the thread within its namespace.
    fn uuid(&self) -> String;

    fn kind(&self) -> Option<EventKind>;
}

impl HeaderExt for EventHeader {
    fn comm_str(&self) -> String {
        cstr_lossy(&self.comm)
    }

    fn uuid(&self) -> String {
        format!("{}_{}", self.pid, self.tid)
    }

    fn kind(&self) -> Option<EventKind> {
        EventKind::from_id(self.eventid)
    }
}
