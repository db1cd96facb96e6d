// * Push-style job progress: log lines and percent changes, then exactly one terminal event.

use crate::jobs::registry::{JobRegistry, JobStatus};
use futures::stream::{self, Stream};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    Log { message: String },
    Progress { percent: u8 },
    Completed { total: usize, has_file: bool, stopped_early: bool },
    Error { message: String },
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Completed { .. } | JobEvent::Error { .. })
    }
}

struct EventCursor {
    registry: JobRegistry,
    id: String,
    rx: watch::Receiver<u64>,
    sent_messages: usize,
    last_progress: Option<u8>,
    pending: VecDeque<JobEvent>,
    sender_gone: bool,
    done: bool,
}

impl EventCursor {
    // * Queues everything that changed since the last look.
    fn collect(&mut self) {
        let Some(job) = self.registry.get(&self.id) else {
            self.pending.push_back(JobEvent::Error {
                message: "Job not found".to_string(),
            });
            self.done = true;
            return;
        };

        for message in job.messages.iter().skip(self.sent_messages) {
            self.pending.push_back(JobEvent::Log {
                message: message.clone(),
            });
        }
        self.sent_messages = job.messages.len();

        if self.last_progress != Some(job.progress) {
            self.last_progress = Some(job.progress);
            self.pending.push_back(JobEvent::Progress {
                percent: job.progress,
            });
        }

        match job.status {
            JobStatus::Completed => {
                self.pending.push_back(JobEvent::Completed {
                    total: job.summary.map(|s| s.total).unwrap_or(0),
                    has_file: job.csv_path.is_some(),
                    stopped_early: job.stopped_early,
                });
                self.done = true;
            }
            JobStatus::Error => {
                self.pending.push_back(JobEvent::Error {
                    message: job.error.unwrap_or_else(|| "Unknown error".to_string()),
                });
                self.done = true;
            }
            JobStatus::Running if self.sender_gone => {
                // ! Entry evicted under us; no further updates can arrive
                self.pending.push_back(JobEvent::Error {
                    message: "Job is no longer tracked".to_string(),
                });
                self.done = true;
            }
            JobStatus::Running => {}
        }
    }
}

pub(crate) fn job_events(
    registry: JobRegistry,
    id: String,
    rx: watch::Receiver<u64>,
) -> impl Stream<Item = JobEvent> + Send + 'static {
    let cursor = EventCursor {
        registry,
        id,
        rx,
        sent_messages: 0,
        last_progress: None,
        pending: VecDeque::new(),
        sender_gone: false,
        done: false,
    };

    stream::unfold(cursor, |mut cursor| async move {
        loop {
            if let Some(event) = cursor.pending.pop_front() {
                return Some((event, cursor));
            }
            if cursor.done {
                return None;
            }

            // * Mark the current version seen before reading, so later bumps always wake us
            cursor.rx.borrow_and_update();
            cursor.collect();

            if cursor.pending.is_empty() && !cursor.done && cursor.rx.changed().await.is_err() {
                cursor.sender_gone = true;
            }
        }
    })
}
