// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::fmt::Debug;

use argscope_common::kernel_types::{
    EpollEvent, Iovec, Itimerspec, Msghdr, Pollfd, PthreadAttr, Rusage, Sigaction, Siginfo,
    Sigset, SockaddrUn, StackT, Stat, Statfs, Sysinfo, Timespec, Timeval, Timezone, Utsname,
};

use crate::{
    builder::SampleBuilder,
    config::DisplayOptions,
    reader::SampleReader,
    structs::{Decode, IovecPayload, LenBuffer, LenString, Render, StringArray},
};

fn decode_layout<T>(value: &T) -> T
where
    T: Copy + PartialEq + Debug + for<'a> Decode<'a>,
{
    let sample = SampleBuilder::new().raw_struct(value).build();
    let mut reader = SampleReader::new(&sample);

    let decoded = T::decode(&mut reader).unwrap();
    assert_eq!(reader.consumed(), std::mem::size_of::<T>());
    assert_eq!(reader.remaining(), 0);
    decoded
}

fn check_layout<T>(value: T)
where
    T: Copy + PartialEq + Debug + for<'a> Decode<'a>,
{
    assert_eq!(decode_layout(&value), value);

    // Every byte is needed.
    let sample = SampleBuilder::new().raw_struct(&value).build();
    let mut reader = SampleReader::new(&sample[..sample.len() - 1]);
    assert!(T::decode(&mut reader).is_err());
}

fn render<T: Render>(value: &T) -> String {
    value.render(&DisplayOptions::default())
}

fn cbytes<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [0u8; N];
    out[..text.len()].copy_from_slice(text.as_bytes());
    out
}

#[test]
fn fixed_layouts_consume_their_size() {
    check_layout(Timespec {
        tv_sec: 1,
        tv_nsec: 2,
    });
    check_layout(Timeval {
        tv_sec: -1,
        tv_usec: 999_999,
    });
    check_layout(Timezone {
        tz_minuteswest: -60,
        tz_dsttime: 1,
    });
    check_layout(Itimerspec {
        it_interval: Timespec {
            tv_sec: 1,
            tv_nsec: 0,
        },
        it_value: Timespec {
            tv_sec: 0,
            tv_nsec: 5,
        },
    });
    check_layout(Pollfd {
        fd: 3,
        events: libc::POLLIN,
        revents: libc::POLLHUP,
    });
    check_layout(Sigset {
        words: [1, 2, 3, 4, 5, 6, 7, 8],
    });
    check_layout(EpollEvent {
        events: libc::EPOLLIN as u32,
        _pad: 0,
        data: u64::MAX,
    });
    check_layout(Stat {
        st_dev: 0x801,
        st_ino: 42,
        st_mode: 0o100644,
        st_nlink: 1,
        st_uid: 1000,
        st_gid: 1000,
        st_size: 1234,
        st_blksize: 4096,
        st_blocks: 8,
        st_atime: 1,
        st_atime_nsec: 2,
        st_mtime: 3,
        st_mtime_nsec: 4,
        st_ctime: 5,
        st_ctime_nsec: 6,
        ..Default::default()
    });
    check_layout(Statfs {
        f_type: 0xef53,
        f_bsize: 4096,
        f_blocks: 100,
        f_fsid: [7, 8],
        f_namelen: 255,
        f_spare: [1, 2, 3, 4],
        ..Default::default()
    });
    check_layout(SockaddrUn {
        sun_family: libc::AF_UNIX as u16,
        sun_path: cbytes("/tmp/sock"),
    });
    check_layout(Sigaction {
        sa_handler: 0x1000,
        sa_flags: 4,
        sa_restorer: 0x2000,
        sa_mask: 0x3000,
    });
    check_layout(Rusage {
        ru_utime: Timeval {
            tv_sec: 1,
            tv_usec: 2,
        },
        ru_maxrss: 3,
        ru_nivcsw: 4,
        ..Default::default()
    });
    check_layout(Sysinfo {
        uptime: 10,
        loads: [1, 2, 3],
        procs: 300,
        mem_unit: 1,
        freehigh: 9,
        ..Default::default()
    });
    check_layout(Siginfo {
        si_signo: libc::SIGCHLD,
        si_code: 1,
        ..Default::default()
    });
    check_layout(StackT {
        ss_sp: 0x1000,
        ss_flags: 2,
        _pad: 0,
        ss_size: 8192,
    });
    check_layout(Utsname {
        sysname: cbytes("Linux"),
        machine: cbytes("aarch64"),
        ..Default::default()
    });
    check_layout(PthreadAttr {
        flags: 1,
        stack_size: 0x10_0000,
        guard_size: 0x1000,
        sched_policy: libc::SCHED_FIFO,
        sched_priority: 10,
        ..Default::default()
    });
    check_layout(Iovec {
        iov_base: 0x1000,
        iov_len: 16,
    });
    check_layout(Msghdr {
        msg_name: 0x1000,
        msg_namelen: 16,
        msg_iov: 0x2000,
        msg_iovlen: 2,
        msg_flags: libc::MSG_DONTWAIT,
        ..Default::default()
    });
}

#[test]
fn time_renders() {
    assert_eq!(
        render(&Itimerspec {
            it_interval: Timespec::default(),
            it_value: Timespec {
                tv_sec: 5,
                tv_nsec: 0
            },
        }),
        "{interval={sec=0, nsec=0}, value={sec=5, nsec=0}}"
    );
    assert_eq!(
        render(&Timezone {
            tz_minuteswest: -60,
            tz_dsttime: 0
        }),
        "{minuteswest=-60, dsttime=0}"
    );
}

#[test]
fn flag_renders() {
    assert_eq!(
        render(&Pollfd {
            fd: 3,
            events: libc::POLLIN,
            revents: 0,
        }),
        "{fd=3, events=POLLIN, revents=0}"
    );
    assert_eq!(
        render(&EpollEvent {
            events: libc::EPOLLIN as u32,
            _pad: 0,
            data: 42,
        }),
        "{events=EPOLLIN, data=0x2a}"
    );
    assert_eq!(
        render(&StackT {
            ss_sp: 0x1000,
            ss_flags: libc::SS_DISABLE,
            _pad: 0,
            ss_size: 8192,
        }),
        "{sp=0x1000, flags=SS_DISABLE, size=8192}"
    );
    assert_eq!(
        render(&Sigaction {
            sa_handler: 1,
            sa_flags: libc::SA_SIGINFO as u64,
            sa_restorer: 0x1234,
            sa_mask: 1,
        }),
        "{handler=SIG_IGN, flags=SA_SIGINFO, restorer=0x1234, mask=0x1}"
    );
}

#[test]
fn sigset_renders_every_word() {
    let mut set = Sigset::default();
    set.words[0] = 1 << (libc::SIGINT - 1);
    assert_eq!(render(&set), "(sigs=[0x2,0x0,0x0,0x0,0x0,0x0,0x0,0x0])");
}

#[test]
fn stat_render() {
    let stat = Stat {
        st_mode: 0o100644,
        st_size: 1234,
        st_dev: 0x801,
        ..Default::default()
    };
    let rendered = render(&stat);
    assert!(rendered.starts_with("{dev=8:1, ino=0, mode=S_IFREG 0o644 (rw-r--r--),"));
    assert!(rendered.contains("size=1234"));
    assert!(rendered.contains("mtime=0.000000000"));
}

#[test]
fn sockaddr_paths() {
    let named = SockaddrUn {
        sun_family: libc::AF_UNIX as u16,
        sun_path: cbytes("/tmp/sock"),
    };
    assert_eq!(render(&named), r#"{family=AF_UNIX, path="/tmp/sock"}"#);

    let mut path = [0u8; 108];
    path[1..4].copy_from_slice(b"abc");
    let abstract_ns = SockaddrUn {
        sun_family: libc::AF_UNIX as u16,
        sun_path: path,
    };
    assert_eq!(render(&abstract_ns), r#"{family=AF_UNIX, path="@abc"}"#);

    assert_eq!(
        render(&SockaddrUn::default()),
        r#"{family=0, path=""}"#
    );
}

#[test]
fn siginfo_union_depends_on_signal() {
    let mut fault = Siginfo {
        si_signo: libc::SIGSEGV,
        si_code: 1,
        ..Default::default()
    };
    fault.fields[..8].copy_from_slice(&0xdeadu64.to_le_bytes());
    assert_eq!(
        render(&fault),
        "{signo=SIGSEGV, errno=0, code=1, addr=0xdead}"
    );

    let mut child = Siginfo {
        si_signo: libc::SIGCHLD,
        si_code: 1,
        ..Default::default()
    };
    child.fields[..4].copy_from_slice(&42u32.to_le_bytes());
    child.fields[4..8].copy_from_slice(&1000u32.to_le_bytes());
    assert_eq!(
        render(&child),
        "{signo=SIGCHLD, errno=0, code=1, pid=42, uid=1000, status=0}"
    );

    let kill = Siginfo {
        si_signo: libc::SIGTERM,
        ..Default::default()
    };
    assert_eq!(render(&kill), "{signo=SIGTERM, errno=0, code=0, pid=0, uid=0}");
}

#[test]
fn utsname_render() {
    let uts = Utsname {
        sysname: cbytes("Linux"),
        nodename: cbytes("localhost"),
        machine: cbytes("aarch64"),
        ..Default::default()
    };
    assert_eq!(
        render(&uts),
        "{sysname=Linux, nodename=localhost, release=, version=, machine=aarch64, domainname=}"
    );
}

#[test]
fn pthread_attr_render() {
    let attr = PthreadAttr {
        stack_size: 0x10_0000,
        guard_size: 0x1000,
        sched_policy: libc::SCHED_OTHER,
        ..Default::default()
    };
    assert_eq!(
        render(&attr),
        "{flags=0x0, stack_base=0x0, stack_size=0x100000, guard_size=0x1000, sched_policy=SCHED_OTHER, sched_priority=0}"
    );
}

#[test]
fn length_prefixed_values() {
    let sample = SampleBuilder::new()
        .u32(5)
        .raw(b"hello")
        .u32(8)
        .raw(b"/system\0")
        .build();
    let mut reader = SampleReader::new(&sample);

    let buffer = LenBuffer::decode(&mut reader).unwrap();
    assert_eq!(buffer.0, b"hello");
    assert_eq!(reader.consumed(), 4 + 5);
    assert_eq!(render(&buffer), r#"(len=5)"hello""#);

    let text = LenString::decode(&mut reader).unwrap();
    assert_eq!(render(&text), "(/system)");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn buffer_display_options() {
    let buffer = LenBuffer(b"abcdef\x00");

    let short = DisplayOptions {
        preview_len: 3,
        ..Default::default()
    };
    assert_eq!(buffer.render(&short), r#"(len=7)"abc"..."#);

    let dump = DisplayOptions {
        dump_hex: true,
        ..Default::default()
    };
    let rendered = buffer.render(&dump);
    assert!(rendered.starts_with("(len=7)\n00000000  61 62 63 64 65 66 00 "));
    assert!(rendered.ends_with("|abcdef.|"));

    assert_eq!(LenBuffer(b"").render(&dump), "(len=0)");
}

#[test]
fn string_arrays() {
    let sample = SampleBuilder::new()
        .u32(3)
        .u32(2)
        .raw(b"ls")
        .u32(3)
        .raw(b"-la")
        .u32(0)
        .build();
    let mut reader = SampleReader::new(&sample);

    let array = StringArray::decode(&mut reader).unwrap();
    assert_eq!(render(&array), "[ls, -la, ]");
    assert_eq!(reader.remaining(), 0);

    let empty = 0u32.to_le_bytes();
    let array = StringArray::decode(&mut SampleReader::new(&empty)).unwrap();
    assert_eq!(render(&array), "[]");

    // A count larger than the data must not be trusted.
    let lying = u32::MAX.to_le_bytes();
    assert!(StringArray::decode(&mut SampleReader::new(&lying)).is_err());
}

#[test]
fn iovec_with_payload() {
    let mut sample = SampleBuilder::new()
        .raw_struct(&Iovec {
            iov_base: 0x1000,
            iov_len: 2,
        })
        .u32(2)
        .raw(b"hi")
        .build()
        .to_vec();
    sample.push(0xff);
    let mut reader = SampleReader::new(&sample);

    let iov = IovecPayload::decode(&mut reader).unwrap();
    assert_eq!(reader.consumed(), 16 + 4 + 2);
    assert_eq!(render(&iov), r#"{base=0x1000, len=2, buf=(len=2)"hi"}"#);
}

#[test]
fn msghdr_render() {
    let hdr = Msghdr {
        msg_name: 0x1000,
        msg_namelen: 16,
        msg_iov: 0x2000,
        msg_iovlen: 1,
        ..Default::default()
    };
    assert_eq!(
        render(&hdr),
        "{name=0x1000, namelen=16, iov=0x2000, iovlen=1, control=0x0, controllen=0, flags=0x0}"
    );
}

#[test]
fn rusage_and_sysinfo_render() {
    let usage = Rusage {
        ru_utime: Timeval {
            tv_sec: 1,
            tv_usec: 5,
        },
        ru_maxrss: 2048,
        ..Default::default()
    };
    let rendered = render(&usage);
    assert!(rendered.starts_with("{utime={sec=1, usec=5}, stime={sec=0, usec=0}, maxrss=2048,"));
    assert!(rendered.ends_with("nivcsw=0}"));

    let info = Sysinfo {
        uptime: 100,
        loads: [1, 2, 3],
        procs: 42,
        ..Default::default()
    };
    let rendered = render(&info);
    assert!(rendered.starts_with("{uptime=100, loads=[1, 2, 3],"));
    assert!(rendered.contains("procs=42"));
}

#[test]
fn statfs_render() {
    let fs = Statfs {
        f_type: 0xef53,
        f_bsize: 4096,
        f_fsid: [1, 2],
        ..Default::default()
    };
    let rendered = render(&fs);
    assert!(rendered.starts_with("{type=0xef53, bsize=4096,"));
    assert!(rendered.contains("fsid=[1, 2]"));
}
