// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Producer-side layouts of the structures an argument can be captured as.
//!
//! All layouts are the LP64 little-endian ones (aarch64 / asm-generic), with
//! every alignment hole spelled out as an explicit `_pad` field so that the
//! wire image has no implicit padding. The size assertions below pin each
//! layout to the byte count the producer writes.

macro_rules! assert_wire_size {
    ($ty:ty, $size:expr) => {
        const _: () = assert!(core::mem::size_of::<$ty>() == $size);
    };
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Timeval {
    pub tv_sec: i64,  // seconds
    pub tv_usec: i64, // microseconds
}

/// Timezone structure for gettimeofday/settimeofday
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Timezone {
    pub tz_minuteswest: i32, // minutes west of Greenwich
    pub tz_dsttime: i32,     // type of DST correction
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Itimerspec {
    pub it_interval: Timespec,
    pub it_value: Timespec,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Pollfd {
    pub fd: i32,
    pub events: i16,
    pub revents: i16,
}

pub const SIGSET_WORDS: usize = 8;

/// Signal mask as captured: eight 32-bit words, bit `n` of the set being
/// signal `n + 1`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Sigset {
    pub words: [u32; SIGSET_WORDS],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EpollEvent {
    pub events: u32,
    pub _pad: u32,
    pub data: u64,
}

/// asm-generic `struct stat`, as used by aarch64.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Stat {
    pub st_dev: u64,
    pub st_ino: u64,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_rdev: u64,
    pub _pad1: u64,
    pub st_size: i64,
    pub st_blksize: i32,
    pub _pad2: i32,
    pub st_blocks: i64,
    pub st_atime: i64,
    pub st_atime_nsec: u64,
    pub st_mtime: i64,
    pub st_mtime_nsec: u64,
    pub st_ctime: i64,
    pub st_ctime_nsec: u64,
    pub _unused4: u32,
    pub _unused5: u32,
}

/// Filesystem statistics structure, matching the kernel's struct statfs
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Statfs {
    pub f_type: i64,       /* Type of filesystem */
    pub f_bsize: i64,      /* Optimal transfer block size */
    pub f_blocks: u64,     /* Total data blocks in filesystem */
    pub f_bfree: u64,      /* Free blocks in filesystem */
    pub f_bavail: u64,     /* Free blocks available to unprivileged user */
    pub f_files: u64,      /* Total inodes in filesystem */
    pub f_ffree: u64,      /* Free inodes in filesystem */
    pub f_fsid: [i32; 2],  /* Filesystem ID */
    pub f_namelen: i64,    /* Maximum length of filenames */
    pub f_frsize: i64,     /* Fragment size */
    pub f_flags: i64,      /* Mount flags of filesystem */
    pub f_spare: [i64; 4], /* Padding bytes reserved for future use */
}

pub const UNIX_PATH_MAX: usize = 108;

/// `struct sockaddr_un`
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SockaddrUn {
    pub sun_family: u16,
    pub sun_path: [u8; UNIX_PATH_MAX],
}

impl Default for SockaddrUn {
    fn default() -> Self {
        Self {
            sun_family: 0,
            sun_path: [0; UNIX_PATH_MAX],
        }
    }
}

/// Kernel `struct sigaction` (no sa_restorer reordering on aarch64).
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Sigaction {
    pub sa_handler: u64,
    pub sa_flags: u64,
    pub sa_restorer: u64,
    pub sa_mask: u64,
}

/// Resource usage structure, matching the kernel's struct rusage
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rusage {
    pub ru_utime: Timeval, // user CPU time used
    pub ru_stime: Timeval, // system CPU time used
    pub ru_maxrss: i64,    // maximum resident set size
    pub ru_ixrss: i64,     // integral shared memory size
    pub ru_idrss: i64,     // integral unshared data size
    pub ru_isrss: i64,     // integral unshared stack size
    pub ru_minflt: i64,    // page reclaims (soft page faults)
    pub ru_majflt: i64,    // page faults (hard page faults)
    pub ru_nswap: i64,     // swaps
    pub ru_inblock: i64,   // block input operations
    pub ru_oublock: i64,   // block output operations
    pub ru_msgsnd: i64,    // IPC messages sent
    pub ru_msgrcv: i64,    // IPC messages received
    pub ru_nsignals: i64,  // signals received
    pub ru_nvcsw: i64,     // voluntary context switches
    pub ru_nivcsw: i64,    // involuntary context switches
}

/// System information structure for sysinfo syscall
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Sysinfo {
    pub uptime: i64,     // Seconds since boot
    pub loads: [u64; 3], // 1, 5, and 15 minute load averages
    pub totalram: u64,   // Total usable main memory size
    pub freeram: u64,    // Available memory size
    pub sharedram: u64,  // Amount of shared memory
    pub bufferram: u64,  // Memory used by buffers
    pub totalswap: u64,  // Total swap space size
    pub freeswap: u64,   // Swap space still available
    pub procs: u16,      // Number of current processes
    pub _pad: u16,
    pub _pad2: u32,
    pub totalhigh: u64, // Total high memory size
    pub freehigh: u64,  // Available high memory size
    pub mem_unit: u32,  // Memory unit size in bytes
    pub _f: [u8; 4],
}

pub const SIGINFO_FIELDS_SIZE: usize = 112;

/// `siginfo_t`: the common prefix plus the raw signal-specific union.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Siginfo {
    pub si_signo: i32,
    pub si_errno: i32,
    pub si_code: i32,
    pub _pad: i32,
    pub fields: [u8; SIGINFO_FIELDS_SIZE],
}

impl Default for Siginfo {
    fn default() -> Self {
        Self {
            si_signo: 0,
            si_errno: 0,
            si_code: 0,
            _pad: 0,
            fields: [0; SIGINFO_FIELDS_SIZE],
        }
    }
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StackT {
    pub ss_sp: u64,
    pub ss_flags: i32,
    pub _pad: i32,
    pub ss_size: u64,
}

pub const UTSNAME_FIELD_LEN: usize = 65;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Utsname {
    pub sysname: [u8; UTSNAME_FIELD_LEN],
    pub nodename: [u8; UTSNAME_FIELD_LEN],
    pub release: [u8; UTSNAME_FIELD_LEN],
    pub version: [u8; UTSNAME_FIELD_LEN],
    pub machine: [u8; UTSNAME_FIELD_LEN],
    pub domainname: [u8; UTSNAME_FIELD_LEN],
}

impl Default for Utsname {
    fn default() -> Self {
        Self {
            sysname: [0; UTSNAME_FIELD_LEN],
            nodename: [0; UTSNAME_FIELD_LEN],
            release: [0; UTSNAME_FIELD_LEN],
            version: [0; UTSNAME_FIELD_LEN],
            machine: [0; UTSNAME_FIELD_LEN],
            domainname: [0; UTSNAME_FIELD_LEN],
        }
    }
}

/// Bionic LP64 `pthread_attr_t`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PthreadAttr {
    pub flags: u32,
    pub _pad: u32,
    pub stack_base: u64,
    pub stack_size: u64,
    pub guard_size: u64,
    pub sched_policy: i32,
    pub sched_priority: i32,
    pub _reserved: [u8; 16],
}

/// I/O vector structure for scatter-gather operations
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Iovec {
    pub iov_base: u64, // Base address of buffer
    pub iov_len: u64,  // Length of buffer
}

/// `struct user_msghdr`; the pointed-to name, iovecs and control data are
/// not captured.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Msghdr {
    pub msg_name: u64,
    pub msg_namelen: u32,
    pub _pad: u32,
    pub msg_iov: u64,
    pub msg_iovlen: u64,
    pub msg_control: u64,
    pub msg_controllen: u64,
    pub msg_flags: i32,
    pub _pad2: u32,
}

assert_wire_size!(Timespec, 16);
assert_wire_size!(Timeval, 16);
assert_wire_size!(Timezone, 8);
assert_wire_size!(Itimerspec, 32);
assert_wire_size!(Pollfd, 8);
assert_wire_size!(Sigset, 32);
assert_wire_size!(EpollEvent, 16);
assert_wire_size!(Stat, 128);
assert_wire_size!(Statfs, 120);
assert_wire_size!(SockaddrUn, 110);
assert_wire_size!(Sigaction, 32);
assert_wire_size!(Rusage, 144);
assert_wire_size!(Sysinfo, 112);
assert_wire_size!(Siginfo, 128);
assert_wire_size!(StackT, 24);
assert_wire_size!(Utsname, 390);
assert_wire_size!(PthreadAttr, 56);
assert_wire_size!(Iovec, 16);
assert_wire_size!(Msghdr, 56);
