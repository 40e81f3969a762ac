// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::collections::HashSet;

use argscope_common::EventHeader;

/// Which processes to keep. Exactly one mode is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    /// Every process of a user, minus blacklisted pids and tids.
    Uid {
        uid: u32,
        blacklist_pids: HashSet<u32>,
        blacklist_tids: HashSet<u32>,
    },
    /// One process, minus blacklisted threads.
    Pid {
        pid: u32,
        blacklist_tids: HashSet<u32>,
    },
    /// A single thread. Thread ids are only unique within a process.
    PidTid { pid: u32, tid: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessFilter {
    pub mode: FilterMode,
    /// The tracer itself, never traced.
    pub self_pid: Option<u32>,
}

impl ProcessFilter {
    pub fn new(mode: FilterMode) -> Self {
        ProcessFilter {
            mode,
            self_pid: None,
        }
    }

    pub fn excluding_self(mut self, pid: u32) -> Self {
        self.self_pid = Some(pid);
        self
    }

    pub fn should_trace(&self, header: &EventHeader) -> bool {
        if self.self_pid == Some(header.host_pid) {
            return false;
        }

        match &self.mode {
            FilterMode::All => true,
            FilterMode::Uid {
                uid,
                blacklist_pids,
                blacklist_tids,
            } => {
                *uid == header.uid
                    && !blacklist_pids.contains(&header.pid)
                    && !blacklist_tids.contains(&header.tid)
            }
            FilterMode::Pid {
                pid,
                blacklist_tids,
            } => *pid == header.pid && !blacklist_tids.contains(&header.tid),
            FilterMode::PidTid { pid, tid } => *pid == header.pid && *tid == header.tid,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(uid: u32, pid: u32, tid: u32) -> EventHeader {
        EventHeader {
            uid,
            pid,
            tid,
            host_pid: pid + 1000,
            host_tid: tid + 1000,
            ..Default::default()
        }
    }

    #[test]
    fn all_keeps_everything_but_self() {
        let filter = ProcessFilter::default().excluding_self(1100);
        assert!(filter.should_trace(&header(0, 1, 1)));
        assert!(!filter.should_trace(&header(0, 100, 100)));
    }

    #[test]
    fn uid_mode() {
        let filter = ProcessFilter::new(FilterMode::Uid {
            uid: 10123,
            blacklist_pids: HashSet::from([200]),
            blacklist_tids: HashSet::from([301]),
        });

        assert!(filter.should_trace(&header(10123, 100, 100)));
        assert!(!filter.should_trace(&header(0, 100, 100)));
        assert!(!filter.should_trace(&header(10123, 200, 200)));
        assert!(!filter.should_trace(&header(10123, 300, 301)));
        assert!(filter.should_trace(&header(10123, 300, 302)));
    }

    #[test]
    fn pid_mode() {
        let filter = ProcessFilter::new(FilterMode::Pid {
            pid: 100,
            blacklist_tids: HashSet::from([102]),
        });

        assert!(filter.should_trace(&header(0, 100, 101)));
        assert!(!filter.should_trace(&header(0, 100, 102)));
        assert!(!filter.should_trace(&header(0, 101, 101)));
    }

    #[test]
    fn pid_tid_mode() {
        let filter = ProcessFilter::new(FilterMode::PidTid { pid: 100, tid: 105 });

        assert!(filter.should_trace(&header(0, 100, 105)));
        assert!(!filter.should_trace(&header(0, 100, 100)));
        assert!(!filter.should_trace(&header(0, 200, 105)));
    }
}
