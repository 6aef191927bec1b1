//! Incremental rescan policy.
//!
//! Editors feed file events into [`TriggerPolicy`]; the policy decides when
//! a single file should be rescanned. Opens and saves rescan immediately;
//! edits wait for a quiet window, and every new edit restarts the window
//! (cancel-and-reschedule, not queue). The policy owns no timers and never
//! blocks: callers pass the current [`Instant`] in and poll [`due`] when
//! their own timer fires.
//!
//! Each issued [`ScanTicket`] carries a per-file sequence number. When two
//! scans of the same file race, only the latest ticket commits; stale
//! in-flight results are discarded so an old scan can never overwrite a
//! newer one. Full theme scans are a separate explicit entry point
//! ([`crate::corpus::scan_corpus`]) and do not interact with this policy;
//! they may interleave with per-file scans, last commit winning per file.
//!
//! [`due`]: TriggerPolicy::due

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default quiet window between an edit and its rescan.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Permission to run one local scan of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTicket {
    pub file: String,
    seq: u64,
}

/// What the policy decided for an incoming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Scan the file now; commit results with the ticket.
    Scan(ScanTicket),
    /// Wait; a scan becomes due at the given instant unless another edit
    /// restarts the window first.
    Debounced(Instant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    DebouncePending { deadline: Instant },
    Scanning,
}

#[derive(Debug)]
struct FileEntry {
    state: State,
    last_seq: u64,
}

/// Per-file scan trigger state machine.
#[derive(Debug)]
pub struct TriggerPolicy {
    debounce: Duration,
    files: HashMap<String, FileEntry>,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl TriggerPolicy {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            files: HashMap::new(),
        }
    }

    /// Policy with the quiet window taken from the theme's configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    fn entry(&mut self, file: &str) -> &mut FileEntry {
        self.files.entry(file.to_string()).or_insert(FileEntry {
            state: State::Idle,
            last_seq: 0,
        })
    }

    fn issue_ticket(&mut self, file: &str) -> ScanTicket {
        let entry = self.entry(file);
        entry.last_seq += 1;
        entry.state = State::Scanning;
        ScanTicket {
            file: file.to_string(),
            seq: entry.last_seq,
        }
    }

    /// A file was opened: scan right away.
    pub fn on_file_opened(&mut self, file: &str) -> Decision {
        Decision::Scan(self.issue_ticket(file))
    }

    /// A file was saved: scan right away, dropping any pending debounce.
    pub fn on_file_saved(&mut self, file: &str) -> Decision {
        Decision::Scan(self.issue_ticket(file))
    }

    /// A file was edited: (re)start the quiet window.
    pub fn on_file_changed(&mut self, file: &str, now: Instant) -> Decision {
        let deadline = now + self.debounce;
        self.entry(file).state = State::DebouncePending { deadline };
        Decision::Debounced(deadline)
    }

    /// Collect tickets for every file whose quiet window has expired.
    pub fn due(&mut self, now: Instant) -> Vec<ScanTicket> {
        let expired: Vec<String> = self
            .files
            .iter()
            .filter_map(|(file, entry)| match entry.state {
                State::DebouncePending { deadline } if deadline <= now => Some(file.clone()),
                _ => None,
            })
            .collect();

        let mut tickets: Vec<ScanTicket> = expired
            .into_iter()
            .map(|file| self.issue_ticket(&file))
            .collect();
        tickets.sort_by(|a, b| a.file.cmp(&b.file));
        tickets
    }

    /// The earliest pending deadline, for callers scheduling a wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.files
            .values()
            .filter_map(|entry| match entry.state {
                State::DebouncePending { deadline } => Some(deadline),
                _ => None,
            })
            .min()
    }

    /// Report a finished scan. Returns true when the ticket is still the
    /// latest for its file, i.e. the results may be committed to the
    /// diagnostic store. A stale ticket (a newer scan was requested in the
    /// meantime) must be discarded by the caller.
    pub fn commit(&mut self, ticket: &ScanTicket) -> bool {
        match self.files.get_mut(&ticket.file) {
            Some(entry) if entry.last_seq == ticket.seq => {
                if entry.state == State::Scanning {
                    entry.state = State::Idle;
                }
                true
            }
            _ => false,
        }
    }

    /// A file was closed or deleted; forget its state.
    pub fn forget(&mut self, file: &str) {
        self.files.remove(file);
    }
}
