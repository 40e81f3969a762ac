// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! One decoder per captured structure. Each reads its producer layout field
//! by field, in declaration order, so that the bytes consumed always equal
//! the layout size pinned in `argscope_common::kernel_types`.

use argscope_common::{
    kernel_types::{
        EpollEvent, Iovec, Itimerspec, Msghdr, Pollfd, PthreadAttr, Rusage, Sigaction, Siginfo,
        Sigset, SockaddrUn, StackT, Stat, Statfs, Sysinfo, Timespec, Timeval, Timezone, Utsname,
        SIGSET_WORDS,
    },
    LEN_PREFIX_SIZE,
};

use crate::{
    config::DisplayOptions,
    error::Result,
    format_helpers::{
        cstr_lossy, escape_preview, format_dev, format_epoll_events, format_file_type_from_mode,
        format_mode, format_poll_events, format_sched_policy, format_sigaction_flags,
        format_sighandler, format_signal_number, format_sockaddr_family, format_stack_flags,
        hex_dump, hex_string, trim_text, Fields,
    },
    reader::{RegisterValue, SampleReader},
};

pub trait Decode<'a>: Sized {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self>;
}

pub trait Render {
    fn render(&self, opts: &DisplayOptions) -> String;
}

pub fn render<'a, T: Decode<'a> + Render>(
    reader: &mut SampleReader<'a>,
    opts: &DisplayOptions,
) -> Result<String> {
    Ok(T::decode(reader)?.render(opts))
}

/// Fallback for structures that are not individually modeled: `size` raw
/// bytes shown as hex.
pub fn render_opaque(reader: &mut SampleReader<'_>, size: u32) -> Result<String> {
    let payload = reader.bytes(size as usize, "opaque struct")?;
    Ok(format!("([hex]{})", hex_string(payload)))
}

/// Length-prefixed raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenBuffer<'a>(pub &'a [u8]);

impl<'a> Decode<'a> for LenBuffer<'a> {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(LenBuffer(reader.len_prefixed("buffer")?))
    }
}

impl Render for LenBuffer<'_> {
    fn render(&self, opts: &DisplayOptions) -> String {
        if opts.dump_hex {
            if self.0.is_empty() {
                return "(len=0)".to_string();
            }
            format!("(len={})\n{}", self.0.len(), hex_dump(self.0, opts.color))
        } else {
            format!(
                "(len={}){}",
                self.0.len(),
                escape_preview(self.0, opts.preview_len)
            )
        }
    }
}

/// Length-prefixed text, trimmed of NULs and whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenString(pub String);

impl<'a> Decode<'a> for LenString {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(LenString(trim_text(reader.len_prefixed("string")?)))
    }
}

impl Render for LenString {
    fn render(&self, _opts: &DisplayOptions) -> String {
        format!("({})", self.0)
    }
}

/// A `u32` count followed by that many length-prefixed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArray(pub Vec<String>);

impl<'a> Decode<'a> for StringArray {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        let count = reader.u32("string array count")?;
        // Every element needs at least its length prefix; do not trust the
        // count for the allocation.
        let capacity = (count as usize).min(reader.remaining() / LEN_PREFIX_SIZE);
        let mut items = Vec::with_capacity(capacity);
        for _ in 0..count {
            items.push(trim_text(reader.len_prefixed("string array element")?));
        }
        Ok(StringArray(items))
    }
}

impl Render for StringArray {
    fn render(&self, _opts: &DisplayOptions) -> String {
        format!("[{}]", self.0.join(", "))
    }
}

/// A pointer value captured as-is.
impl<'a> Decode<'a> for RegisterValue {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        reader.register()
    }
}

impl Render for RegisterValue {
    fn render(&self, _opts: &DisplayOptions) -> String {
        format!("(0x{:x})", self.address)
    }
}

impl<'a> Decode<'a> for Timespec {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Timespec {
            tv_sec: reader.i64("timespec tv_sec")?,
            tv_nsec: reader.i64("timespec tv_nsec")?,
        })
    }
}

impl Render for Timespec {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("sec", self.tv_sec)
            .field("nsec", self.tv_nsec)
            .finish()
    }
}

impl<'a> Decode<'a> for Timeval {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Timeval {
            tv_sec: reader.i64("timeval tv_sec")?,
            tv_usec: reader.i64("timeval tv_usec")?,
        })
    }
}

impl Render for Timeval {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("sec", self.tv_sec)
            .field("usec", self.tv_usec)
            .finish()
    }
}

impl<'a> Decode<'a> for Timezone {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Timezone {
            tz_minuteswest: reader.i32("timezone tz_minuteswest")?,
            tz_dsttime: reader.i32("timezone tz_dsttime")?,
        })
    }
}

impl Render for Timezone {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("minuteswest", self.tz_minuteswest)
            .field("dsttime", self.tz_dsttime)
            .finish()
    }
}

impl<'a> Decode<'a> for Itimerspec {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Itimerspec {
            it_interval: Timespec::decode(reader)?,
            it_value: Timespec::decode(reader)?,
        })
    }
}

impl Render for Itimerspec {
    fn render(&self, opts: &DisplayOptions) -> String {
        Fields::new()
            .field("interval", self.it_interval.render(opts))
            .field("value", self.it_value.render(opts))
            .finish()
    }
}

impl<'a> Decode<'a> for Pollfd {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Pollfd {
            fd: reader.i32("pollfd fd")?,
            events: reader.i16("pollfd events")?,
            revents: reader.i16("pollfd revents")?,
        })
    }
}

impl Render for Pollfd {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("fd", self.fd)
            .field("events", format_poll_events(self.events))
            .field("revents", format_poll_events(self.revents))
            .finish()
    }
}

impl<'a> Decode<'a> for Sigset {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        let mut words = [0u32; SIGSET_WORDS];
        for word in words.iter_mut() {
            *word = reader.u32("sigset word")?;
        }
        Ok(Sigset { words })
    }
}

impl Render for Sigset {
    fn render(&self, _opts: &DisplayOptions) -> String {
        let words = self
            .words
            .iter()
            .map(|w| format!("0x{w:x}"))
            .collect::<Vec<_>>();
        format!("(sigs=[{}])", words.join(","))
    }
}

impl<'a> Decode<'a> for EpollEvent {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(EpollEvent {
            events: reader.u32("epoll_event events")?,
            _pad: reader.u32("epoll_event padding")?,
            data: reader.u64("epoll_event data")?,
        })
    }
}

impl Render for EpollEvent {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("events", format_epoll_events(self.events))
            .field("data", format_args!("0x{:x}", self.data))
            .finish()
    }
}

impl<'a> Decode<'a> for Stat {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Stat {
            st_dev: reader.u64("stat st_dev")?,
            st_ino: reader.u64("stat st_ino")?,
            st_mode: reader.u32("stat st_mode")?,
            st_nlink: reader.u32("stat st_nlink")?,
            st_uid: reader.u32("stat st_uid")?,
            st_gid: reader.u32("stat st_gid")?,
            st_rdev: reader.u64("stat st_rdev")?,
            _pad1: reader.u64("stat padding")?,
            st_size: reader.i64("stat st_size")?,
            st_blksize: reader.i32("stat st_blksize")?,
            _pad2: reader.i32("stat padding")?,
            st_blocks: reader.i64("stat st_blocks")?,
            st_atime: reader.i64("stat st_atime")?,
            st_atime_nsec: reader.u64("stat st_atime_nsec")?,
            st_mtime: reader.i64("stat st_mtime")?,
            st_mtime_nsec: reader.u64("stat st_mtime_nsec")?,
            st_ctime: reader.i64("stat st_ctime")?,
            st_ctime_nsec: reader.u64("stat st_ctime_nsec")?,
            _unused4: reader.u32("stat unused")?,
            _unused5: reader.u32("stat unused")?,
        })
    }
}

impl Render for Stat {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("dev", format_dev(self.st_dev))
            .field("ino", self.st_ino)
            .field(
                "mode",
                format_args!(
                    "{} {}",
                    format_file_type_from_mode(self.st_mode),
                    format_mode(self.st_mode)
                ),
            )
            .field("nlink", self.st_nlink)
            .field("uid", self.st_uid)
            .field("gid", self.st_gid)
            .field("rdev", format_dev(self.st_rdev))
            .field("size", self.st_size)
            .field("blksize", self.st_blksize)
            .field("blocks", self.st_blocks)
            .field("atime", format_args!("{}.{:09}", self.st_atime, self.st_atime_nsec))
            .field("mtime", format_args!("{}.{:09}", self.st_mtime, self.st_mtime_nsec))
            .field("ctime", format_args!("{}.{:09}", self.st_ctime, self.st_ctime_nsec))
            .finish()
    }
}

impl<'a> Decode<'a> for Statfs {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Statfs {
            f_type: reader.i64("statfs f_type")?,
            f_bsize: reader.i64("statfs f_bsize")?,
            f_blocks: reader.u64("statfs f_blocks")?,
            f_bfree: reader.u64("statfs f_bfree")?,
            f_bavail: reader.u64("statfs f_bavail")?,
            f_files: reader.u64("statfs f_files")?,
            f_ffree: reader.u64("statfs f_ffree")?,
            f_fsid: [reader.i32("statfs f_fsid")?, reader.i32("statfs f_fsid")?],
            f_namelen: reader.i64("statfs f_namelen")?,
            f_frsize: reader.i64("statfs f_frsize")?,
            f_flags: reader.i64("statfs f_flags")?,
            f_spare: [
                reader.i64("statfs f_spare")?,
                reader.i64("statfs f_spare")?,
                reader.i64("statfs f_spare")?,
                reader.i64("statfs f_spare")?,
            ],
        })
    }
}

impl Render for Statfs {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("type", format_args!("0x{:x}", self.f_type))
            .field("bsize", self.f_bsize)
            .field("blocks", self.f_blocks)
            .field("bfree", self.f_bfree)
            .field("bavail", self.f_bavail)
            .field("files", self.f_files)
            .field("ffree", self.f_ffree)
            .field("fsid", format_args!("[{}, {}]", self.f_fsid[0], self.f_fsid[1]))
            .field("namelen", self.f_namelen)
            .field("frsize", self.f_frsize)
            .field("flags", format_args!("0x{:x}", self.f_flags))
            .finish()
    }
}

impl<'a> Decode<'a> for SockaddrUn {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(SockaddrUn {
            sun_family: reader.u16("sockaddr family")?,
            sun_path: reader.array("sockaddr path")?,
        })
    }
}

impl Render for SockaddrUn {
    fn render(&self, _opts: &DisplayOptions) -> String {
        let fields = Fields::new().field("family", format_sockaddr_family(self.sun_family));

        let path = match self.sun_path.first() {
            // Abstract namespace: leading NUL, the name follows.
            Some(0) if self.sun_path.iter().any(|&b| b != 0) => {
                format!("@{}", cstr_lossy(&self.sun_path[1..]))
            }
            _ => cstr_lossy(&self.sun_path),
        };

        fields.field("path", format_args!("{path:?}")).finish()
    }
}

impl<'a> Decode<'a> for Sigaction {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Sigaction {
            sa_handler: reader.u64("sigaction sa_handler")?,
            sa_flags: reader.u64("sigaction sa_flags")?,
            sa_restorer: reader.u64("sigaction sa_restorer")?,
            sa_mask: reader.u64("sigaction sa_mask")?,
        })
    }
}

impl Render for Sigaction {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("handler", format_sighandler(self.sa_handler))
            .field("flags", format_sigaction_flags(self.sa_flags))
            .field("restorer", format_args!("0x{:x}", self.sa_restorer))
            .field("mask", format_args!("0x{:x}", self.sa_mask))
            .finish()
    }
}

impl<'a> Decode<'a> for Rusage {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Rusage {
            ru_utime: Timeval::decode(reader)?,
            ru_stime: Timeval::decode(reader)?,
            ru_maxrss: reader.i64("rusage ru_maxrss")?,
            ru_ixrss: reader.i64("rusage ru_ixrss")?,
            ru_idrss: reader.i64("rusage ru_idrss")?,
            ru_isrss: reader.i64("rusage ru_isrss")?,
            ru_minflt: reader.i64("rusage ru_minflt")?,
            ru_majflt: reader.i64("rusage ru_majflt")?,
            ru_nswap: reader.i64("rusage ru_nswap")?,
            ru_inblock: reader.i64("rusage ru_inblock")?,
            ru_oublock: reader.i64("rusage ru_oublock")?,
            ru_msgsnd: reader.i64("rusage ru_msgsnd")?,
            ru_msgrcv: reader.i64("rusage ru_msgrcv")?,
            ru_nsignals: reader.i64("rusage ru_nsignals")?,
            ru_nvcsw: reader.i64("rusage ru_nvcsw")?,
            ru_nivcsw: reader.i64("rusage ru_nivcsw")?,
        })
    }
}

impl Render for Rusage {
    fn render(&self, opts: &DisplayOptions) -> String {
        Fields::new()
            .field("utime", self.ru_utime.render(opts))
            .field("stime", self.ru_stime.render(opts))
            .field("maxrss", self.ru_maxrss)
            .field("ixrss", self.ru_ixrss)
            .field("idrss", self.ru_idrss)
            .field("isrss", self.ru_isrss)
            .field("minflt", self.ru_minflt)
            .field("majflt", self.ru_majflt)
            .field("nswap", self.ru_nswap)
            .field("inblock", self.ru_inblock)
            .field("oublock", self.ru_oublock)
            .field("msgsnd", self.ru_msgsnd)
            .field("msgrcv", self.ru_msgrcv)
            .field("nsignals", self.ru_nsignals)
            .field("nvcsw", self.ru_nvcsw)
            .field("nivcsw", self.ru_nivcsw)
            .finish()
    }
}

impl<'a> Decode<'a> for Sysinfo {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Sysinfo {
            uptime: reader.i64("sysinfo uptime")?,
            loads: [
                reader.u64("sysinfo loads")?,
                reader.u64("sysinfo loads")?,
                reader.u64("sysinfo loads")?,
            ],
            totalram: reader.u64("sysinfo totalram")?,
            freeram: reader.u64("sysinfo freeram")?,
            sharedram: reader.u64("sysinfo sharedram")?,
            bufferram: reader.u64("sysinfo bufferram")?,
            totalswap: reader.u64("sysinfo totalswap")?,
            freeswap: reader.u64("sysinfo freeswap")?,
            procs: reader.u16("sysinfo procs")?,
            _pad: reader.u16("sysinfo padding")?,
            _pad2: reader.u32("sysinfo padding")?,
            totalhigh: reader.u64("sysinfo totalhigh")?,
            freehigh: reader.u64("sysinfo freehigh")?,
            mem_unit: reader.u32("sysinfo mem_unit")?,
            _f: reader.array("sysinfo padding")?,
        })
    }
}

impl Render for Sysinfo {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("uptime", self.uptime)
            .field(
                "loads",
                format_args!("[{}, {}, {}]", self.loads[0], self.loads[1], self.loads[2]),
            )
            .field("totalram", self.totalram)
            .field("freeram", self.freeram)
            .field("sharedram", self.sharedram)
            .field("bufferram", self.bufferram)
            .field("totalswap", self.totalswap)
            .field("freeswap", self.freeswap)
            .field("procs", self.procs)
            .field("totalhigh", self.totalhigh)
            .field("freehigh", self.freehigh)
            .field("mem_unit", self.mem_unit)
            .finish()
    }
}

impl<'a> Decode<'a> for Siginfo {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Siginfo {
            si_signo: reader.i32("siginfo si_signo")?,
            si_errno: reader.i32("siginfo si_errno")?,
            si_code: reader.i32("siginfo si_code")?,
            _pad: reader.i32("siginfo padding")?,
            fields: reader.array("siginfo fields")?,
        })
    }
}

fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn le_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(word)
}

impl Render for Siginfo {
    fn render(&self, _opts: &DisplayOptions) -> String {
        let fields = Fields::new()
            .field("signo", format_signal_number(self.si_signo))
            .field("errno", self.si_errno)
            .field("code", self.si_code);

        // The union member in use depends on the signal.
        match self.si_signo {
            libc::SIGSEGV | libc::SIGBUS | libc::SIGILL | libc::SIGFPE | libc::SIGTRAP => fields
                .field("addr", format_args!("0x{:x}", le_u64(&self.fields, 0)))
                .finish(),
            libc::SIGCHLD => fields
                .field("pid", le_u32(&self.fields, 0) as i32)
                .field("uid", le_u32(&self.fields, 4))
                .field("status", le_u32(&self.fields, 8) as i32)
                .finish(),
            _ => fields
                .field("pid", le_u32(&self.fields, 0) as i32)
                .field("uid", le_u32(&self.fields, 4))
                .finish(),
        }
    }
}

impl<'a> Decode<'a> for StackT {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(StackT {
            ss_sp: reader.u64("stack_t ss_sp")?,
            ss_flags: reader.i32("stack_t ss_flags")?,
            _pad: reader.i32("stack_t padding")?,
            ss_size: reader.u64("stack_t ss_size")?,
        })
    }
}

impl Render for StackT {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("sp", format_args!("0x{:x}", self.ss_sp))
            .field("flags", format_stack_flags(self.ss_flags))
            .field("size", self.ss_size)
            .finish()
    }
}

impl<'a> Decode<'a> for Utsname {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Utsname {
            sysname: reader.array("utsname sysname")?,
            nodename: reader.array("utsname nodename")?,
            release: reader.array("utsname release")?,
            version: reader.array("utsname version")?,
            machine: reader.array("utsname machine")?,
            domainname: reader.array("utsname domainname")?,
        })
    }
}

impl Render for Utsname {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("sysname", cstr_lossy(&self.sysname))
            .field("nodename", cstr_lossy(&self.nodename))
            .field("release", cstr_lossy(&self.release))
            .field("version", cstr_lossy(&self.version))
            .field("machine", cstr_lossy(&self.machine))
            .field("domainname", cstr_lossy(&self.domainname))
            .finish()
    }
}

impl<'a> Decode<'a> for PthreadAttr {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(PthreadAttr {
            flags: reader.u32("pthread_attr flags")?,
            _pad: reader.u32("pthread_attr padding")?,
            stack_base: reader.u64("pthread_attr stack_base")?,
            stack_size: reader.u64("pthread_attr stack_size")?,
            guard_size: reader.u64("pthread_attr guard_size")?,
            sched_policy: reader.i32("pthread_attr sched_policy")?,
            sched_priority: reader.i32("pthread_attr sched_priority")?,
            _reserved: reader.array("pthread_attr reserved")?,
        })
    }
}

impl Render for PthreadAttr {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("flags", format_args!("0x{:x}", self.flags))
            .field("stack_base", format_args!("0x{:x}", self.stack_base))
            .field("stack_size", format_args!("0x{:x}", self.stack_size))
            .field("guard_size", format_args!("0x{:x}", self.guard_size))
            .field("sched_policy", format_sched_policy(self.sched_policy))
            .field("sched_priority", self.sched_priority)
            .finish()
    }
}

impl<'a> Decode<'a> for Iovec {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Iovec {
            iov_base: reader.u64("iovec iov_base")?,
            iov_len: reader.u64("iovec iov_len")?,
        })
    }
}

/// An iovec followed by the bytes captured from its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IovecPayload<'a> {
    pub iov: Iovec,
    pub payload: LenBuffer<'a>,
}

impl<'a> Decode<'a> for IovecPayload<'a> {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(IovecPayload {
            iov: Iovec::decode(reader)?,
            payload: LenBuffer::decode(reader)?,
        })
    }
}

impl Render for IovecPayload<'_> {
    fn render(&self, opts: &DisplayOptions) -> String {
        Fields::new()
            .field("base", format_args!("0x{:x}", self.iov.iov_base))
            .field("len", self.iov.iov_len)
            .field("buf", self.payload.render(opts))
            .finish()
    }
}

impl<'a> Decode<'a> for Msghdr {
    fn decode(reader: &mut SampleReader<'a>) -> Result<Self> {
        Ok(Msghdr {
            msg_name: reader.u64("msghdr msg_name")?,
            msg_namelen: reader.u32("msghdr msg_namelen")?,
            _pad: reader.u32("msghdr padding")?,
            msg_iov: reader.u64("msghdr msg_iov")?,
            msg_iovlen: reader.u64("msghdr msg_iovlen")?,
            msg_control: reader.u64("msghdr msg_control")?,
            msg_controllen: reader.u64("msghdr msg_controllen")?,
            msg_flags: reader.i32("msghdr msg_flags")?,
            _pad2: reader.u32("msghdr padding")?,
        })
    }
}

impl Render for Msghdr {
    fn render(&self, _opts: &DisplayOptions) -> String {
        Fields::new()
            .field("name", format_args!("0x{:x}", self.msg_name))
            .field("namelen", self.msg_namelen)
            .field("iov", format_args!("0x{:x}", self.msg_iov))
            .field("iovlen", self.msg_iovlen)
            .field("control", format_args!("0x{:x}", self.msg_control))
            .field("controllen", self.msg_controllen)
            .field("flags", format_args!("0x{:x}", self.msg_flags))
            .finish()
    }
}
