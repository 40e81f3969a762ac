// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{borrow::Cow, fmt::Display, fmt::Write as _};

const COLOR_RED: &str = "\x1b[31m";
const COLOR_RESET: &str = "\x1b[0m";

/// Accumulates `name=value` pairs and renders them as `{a=1, b=2}`.
#[derive(Debug, Default)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn new() -> Self {
        Fields::default()
    }

    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.0.push(format!("{name}={value}"));
        self
    }

    pub fn finish(self) -> String {
        format!("{{{}}}", self.0.join(", "))
    }
}

/// Text up to the first NUL.
pub fn cstr_lossy(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Text with NULs and whitespace stripped from both ends.
pub fn trim_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Printable ASCII is kept, everything else is escaped. Payloads longer
/// than `max` are cut and marked with `...`.
pub fn escape_preview(bytes: &[u8], max: usize) -> String {
    let shown = &bytes[..bytes.len().min(max)];
    let mut s = String::with_capacity(shown.len() + 5);
    s.push('"');
    for b in shown {
        s.extend(std::ascii::escape_default(*b).map(char::from));
    }
    s.push('"');
    if bytes.len() > max {
        s.push_str("...");
    }
    s
}

/// `hexdump -C` style listing, 16 bytes per line.
pub fn hex_dump(bytes: &[u8], color: bool) -> String {
    let mut out = String::new();

    for (line, chunk) in bytes.chunks(16).enumerate() {
        if line > 0 {
            out.push('\n');
        }

        let _ = write!(out, "{:08x}  ", line * 16);

        if color {
            out.push_str(COLOR_RED);
        }
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        if color {
            out.push_str(COLOR_RESET);
        }

        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push('|');
    }

    out
}

pub fn poll_bits_to_strs(event: i16) -> Vec<&'static str> {
    let mut strs = vec![];

    if event & libc::POLLIN != 0 {
        strs.push("POLLIN");
    }

    if event & libc::POLLPRI != 0 {
        strs.push("POLLPRI");
    }

    if event & libc::POLLOUT != 0 {
        strs.push("POLLOUT");
    }

    if event & libc::POLLRDHUP != 0 {
        strs.push("POLLRDHUP");
    }

    if event & libc::POLLERR != 0 {
        strs.push("POLLERR");
    }

    if event & libc::POLLHUP != 0 {
        strs.push("POLLHUP");
    }

    if event & libc::POLLNVAL != 0 {
        strs.push("POLLNVAL");
    }

    strs
}

pub fn format_poll_events(events: i16) -> String {
    let event_strs = poll_bits_to_strs(events);
    if event_strs.is_empty() {
        "0".to_string()
    } else {
        event_strs.join("|")
    }
}

pub fn format_epoll_events(events: u32) -> String {
    let defs = [
        (libc::EPOLLIN, "EPOLLIN"),
        (libc::EPOLLPRI, "EPOLLPRI"),
        (libc::EPOLLOUT, "EPOLLOUT"),
        (libc::EPOLLERR, "EPOLLERR"),
        (libc::EPOLLHUP, "EPOLLHUP"),
        (libc::EPOLLRDHUP, "EPOLLRDHUP"),
        (libc::EPOLLEXCLUSIVE, "EPOLLEXCLUSIVE"),
        (libc::EPOLLWAKEUP, "EPOLLWAKEUP"),
        (libc::EPOLLONESHOT, "EPOLLONESHOT"),
        (libc::EPOLLET, "EPOLLET"),
    ];
    format_bit_names(events as u64, &defs.map(|(bit, name)| (bit as u32 as u64, name)))
}

/// `NAME|NAME|0x<rest>`, or `0` for an empty mask.
pub fn format_bit_names(value: u64, defs: &[(u64, &'static str)]) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut parts = vec![];
    let mut rest = value;
    for (bit, name) in defs {
        if value & bit != 0 {
            parts.push(Cow::Borrowed(*name));
            rest &= !bit;
        }
    }
    if rest != 0 {
        parts.push(Cow::Owned(format!("0x{rest:x}")));
    }
    parts.join("|")
}

pub fn format_sigaction_flags(flags: u64) -> String {
    let defs = [
        (libc::SA_NOCLDSTOP as u32 as u64, "SA_NOCLDSTOP"),
        (libc::SA_NOCLDWAIT as u32 as u64, "SA_NOCLDWAIT"),
        (libc::SA_SIGINFO as u32 as u64, "SA_SIGINFO"),
        (0x0400_0000, "SA_RESTORER"),
        (libc::SA_ONSTACK as u32 as u64, "SA_ONSTACK"),
        (libc::SA_RESTART as u32 as u64, "SA_RESTART"),
        (libc::SA_NODEFER as u32 as u64, "SA_NODEFER"),
        (libc::SA_RESETHAND as u32 as u64, "SA_RESETHAND"),
    ];
    format_bit_names(flags, &defs)
}

pub fn format_sighandler(handler: u64) -> Cow<'static, str> {
    match handler {
        0 => Cow::Borrowed("SIG_DFL"),
        1 => Cow::Borrowed("SIG_IGN"),
        _ => Cow::Owned(format!("0x{handler:x}")),
    }
}

pub fn format_signal_number(signum: i32) -> Cow<'static, str> {
    match signum {
        libc::SIGHUP => Cow::Borrowed("SIGHUP"),
        libc::SIGINT => Cow::Borrowed("SIGINT"),
        libc::SIGQUIT => Cow::Borrowed("SIGQUIT"),
        libc::SIGILL => Cow::Borrowed("SIGILL"),
        libc::SIGTRAP => Cow::Borrowed("SIGTRAP"),
        libc::SIGABRT => Cow::Borrowed("SIGABRT"),
        libc::SIGBUS => Cow::Borrowed("SIGBUS"),
        libc::SIGFPE => Cow::Borrowed("SIGFPE"),
        libc::SIGKILL => Cow::Borrowed("SIGKILL"),
        libc::SIGUSR1 => Cow::Borrowed("SIGUSR1"),
        libc::SIGSEGV => Cow::Borrowed("SIGSEGV"),
        libc::SIGUSR2 => Cow::Borrowed("SIGUSR2"),
        libc::SIGPIPE => Cow::Borrowed("SIGPIPE"),
        libc::SIGALRM => Cow::Borrowed("SIGALRM"),
        libc::SIGTERM => Cow::Borrowed("SIGTERM"),
        libc::SIGSTKFLT => Cow::Borrowed("SIGSTKFLT"),
        libc::SIGCHLD => Cow::Borrowed("SIGCHLD"),
        libc::SIGCONT => Cow::Borrowed("SIGCONT"),
        libc::SIGSTOP => Cow::Borrowed("SIGSTOP"),
        libc::SIGTSTP => Cow::Borrowed("SIGTSTP"),
        libc::SIGTTIN => Cow::Borrowed("SIGTTIN"),
        libc::SIGTTOU => Cow::Borrowed("SIGTTOU"),
        libc::SIGURG => Cow::Borrowed("SIGURG"),
        libc::SIGXCPU => Cow::Borrowed("SIGXCPU"),
        libc::SIGXFSZ => Cow::Borrowed("SIGXFSZ"),
        libc::SIGVTALRM => Cow::Borrowed("SIGVTALRM"),
        libc::SIGPROF => Cow::Borrowed("SIGPROF"),
        libc::SIGWINCH => Cow::Borrowed("SIGWINCH"),
        libc::SIGIO => Cow::Borrowed("SIGIO"),
        libc::SIGPWR => Cow::Borrowed("SIGPWR"),
        libc::SIGSYS => Cow::Borrowed("SIGSYS"),
        _ => {
            if (34..=64).contains(&signum) {
                Cow::Owned(format!("SIGRT{}", signum - 34))
            } else {
                Cow::Owned(format!("UNKNOWN({signum})"))
            }
        }
    }
}

pub fn format_sockaddr_family(family: u16) -> Cow<'static, str> {
    match family {
        x if x == (libc::AF_UNIX as u16) => Cow::Borrowed("AF_UNIX"),
        x if x == (libc::AF_INET as u16) => Cow::Borrowed("AF_INET"),
        x if x == (libc::AF_INET6 as u16) => Cow::Borrowed("AF_INET6"),
        x if x == (libc::AF_NETLINK as u16) => Cow::Borrowed("AF_NETLINK"),
        x if x == (libc::AF_PACKET as u16) => Cow::Borrowed("AF_PACKET"),
        _ => Cow::Owned(format!("{family}")),
    }
}

pub fn format_sched_policy(policy: i32) -> Cow<'static, str> {
    match policy {
        libc::SCHED_OTHER => Cow::Borrowed("SCHED_OTHER"),
        libc::SCHED_FIFO => Cow::Borrowed("SCHED_FIFO"),
        libc::SCHED_RR => Cow::Borrowed("SCHED_RR"),
        libc::SCHED_BATCH => Cow::Borrowed("SCHED_BATCH"),
        libc::SCHED_IDLE => Cow::Borrowed("SCHED_IDLE"),
        _ => Cow::Owned(policy.to_string()),
    }
}

pub fn format_stack_flags(flags: i32) -> String {
    let defs = [
        (libc::SS_ONSTACK as u32 as u64, "SS_ONSTACK"),
        (libc::SS_DISABLE as u32 as u64, "SS_DISABLE"),
    ];
    format_bit_names(flags as u32 as u64, &defs)
}

pub fn format_file_type_from_mode(mode: u32) -> &'static str {
    match mode & libc::S_IFMT {
        libc::S_IFREG => "S_IFREG",
        libc::S_IFDIR => "S_IFDIR",
        libc::S_IFLNK => "S_IFLNK",
        libc::S_IFCHR => "S_IFCHR",
        libc::S_IFBLK => "S_IFBLK",
        libc::S_IFIFO => "S_IFIFO",
        libc::S_IFSOCK => "S_IFSOCK",
        _ => "unknown",
    }
}

pub fn format_mode(mode: u32) -> String {
    if mode == 0 {
        return "0".to_string();
    }
    // Show as octal and symbolic (e.g. rwxr-xr-x)
    let mut s = format!("0o{:03o}", mode & 0o777);
    s.push_str(" (");
    let perms = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    for (bit, chr) in perms.iter() {
        s.push(if (mode & bit) != 0 { *chr } else { '-' });
    }
    s.push(')');
    s
}

pub fn format_dev(dev: u64) -> String {
    if dev == 0 {
        return "0".to_string();
    }
    let major = (dev >> 8) & 0xfff | ((dev >> 32) & !0xfff);
    let minor = (dev & 0xff) | ((dev >> 12) & !0xff);
    format!("{major}:{minor}")
}
