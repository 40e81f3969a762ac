// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![no_std]

pub mod kernel_types;

/// Event kind ids carried in `EventHeader::eventid`.
pub const SYSCALL_ENTER: u32 = 456;
pub const SYSCALL_EXIT: u32 = 457;
pub const UPROBE_ENTER: u32 = 458;

pub const TASK_COMM_LEN: usize = 16;

/// Size of the fixed header at the front of every sample.
pub const HEADER_SIZE: usize = 56;

/// Size of the packed `{index, part_raw_size}` footer that follows every
/// variable-length argument payload.
pub const PADDING_FOOTER_SIZE: usize = 5;

/// Records written by the producer are aligned to this many bytes.
pub const RECORD_ALIGN: u32 = 4;

/// Width of a register/pointer slot on the wire.
pub const REGISTER_SIZE: usize = 8;

/// Width of the length prefix of strings and buffers.
pub const LEN_PREFIX_SIZE: usize = 4;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EventHeader {
    pub ts: u64,
    pub eventid: u32,
    pub host_tid: u32,
    pub host_pid: u32,
    pub tid: u32,
    pub pid: u32,
    pub uid: u32,
    pub comm: [u8; TASK_COMM_LEN],
    pub argnum: u8,
    pub padding: [u8; 7],
}

const _: () = assert!(core::mem::size_of::<EventHeader>() == HEADER_SIZE);

#[repr(C, packed)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PaddingFooter {
    pub index: u8,
    pub part_raw_size: u32,
}

const _: () = assert!(core::mem::size_of::<PaddingFooter>() == PADDING_FOOTER_SIZE);

impl PaddingFooter {
    /// Number of pad bytes following the footer. Zero when the segment is
    /// already aligned.
    pub const fn pad_len(part_raw_size: u32) -> u32 {
        let pad = RECORD_ALIGN
            - (part_raw_size % RECORD_ALIGN + PADDING_FOOTER_SIZE as u32 % RECORD_ALIGN)
                % RECORD_ALIGN;
        if pad == RECORD_ALIGN {
            0
        } else {
            pad
        }
    }
}

/// How an argument slot is declared by the probe point.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArgType {
    /// A plain scalar held in a register.
    Num = 0,
    /// A register holding an address, followed by the pointee.
    Pointer = 1,
    /// The structural value is written directly, without a pointer shell.
    Struct = 2,
}

/// The structural kind an argument is interpreted as.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AliasType {
    None = 0,
    Num = 1,
    Pointer = 2,
    Struct = 3,
    Buffer = 4,
    String = 5,
    StringArray = 6,
    Sigset = 7,
    Pollfd = 8,
    Timezone = 9,
    PthreadAttr = 10,
    Timeval = 11,
    Timespec = 12,
    Stat = 13,
    Statfs = 14,
    Sigaction = 15,
    Utsname = 16,
    Sockaddr = 17,
    Rusage = 18,
    Iovec = 19,
    EpollEvent = 20,
    Sysinfo = 21,
    Siginfo = 22,
    Msghdr = 23,
    Itimerspec = 24,
    StackT = 25,
}

impl AliasType {
    pub const ALL: [AliasType; 26] = [
        AliasType::None,
        AliasType::Num,
        AliasType::Pointer,
        AliasType::Struct,
        AliasType::Buffer,
        AliasType::String,
        AliasType::StringArray,
        AliasType::Sigset,
        AliasType::Pollfd,
        AliasType::Timezone,
        AliasType::PthreadAttr,
        AliasType::Timeval,
        AliasType::Timespec,
        AliasType::Stat,
        AliasType::Statfs,
        AliasType::Sigaction,
        AliasType::Utsname,
        AliasType::Sockaddr,
        AliasType::Rusage,
        AliasType::Iovec,
        AliasType::EpollEvent,
        AliasType::Sysinfo,
        AliasType::Siginfo,
        AliasType::Msghdr,
        AliasType::Itimerspec,
        AliasType::StackT,
    ];

    /// Kinds whose payload length is only known from the stream. These are
    /// followed by a `PaddingFooter`.
    pub const fn is_variable_length(self) -> bool {
        matches!(
            self,
            AliasType::Buffer | AliasType::String | AliasType::StringArray | AliasType::Iovec
        )
    }

    /// Kinds that never have a structural rendering.
    pub const fn is_scalar(self) -> bool {
        matches!(self, AliasType::None | AliasType::Num)
    }
}
