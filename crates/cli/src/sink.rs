//! JSON-lines step sink: one event object per line.

use anyhow::{Context, Result};
use hulltrace::api::{Algorithm, Comparison, DualStepSink, Finished, Step, StepSink, TraceError};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Step {
        #[serde(skip_serializing_if = "Option::is_none")]
        lane: Option<Algorithm>,
        step: &'a Step,
    },
    Finished {
        finished: &'a Finished,
    },
    Comparison {
        same_vertex_set: bool,
        comparison: &'a Comparison,
    },
    Abort {
        error: String,
    },
}

/// Writes every event it receives. Sink callbacks cannot fail, so the first
/// I/O error is parked and returned by `finish`; later events are dropped.
pub struct JsonLines<W: Write> {
    out: W,
    lines: usize,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: 0,
            error: None,
        }
    }

    /// Flush and report the line count or the first write error.
    pub fn finish(&mut self) -> Result<usize> {
        if let Some(err) = self.error.take() {
            return Err(err.context("writing trace events"));
        }
        self.out.flush().context("flushing trace events")?;
        Ok(self.lines)
    }

    fn emit(&mut self, event: &Event<'_>) {
        if self.error.is_some() {
            return;
        }
        let res = serde_json::to_writer(&mut self.out, event)
            .map_err(anyhow::Error::from)
            .and_then(|_| self.out.write_all(b"\n").map_err(anyhow::Error::from));
        match res {
            Ok(()) => self.lines += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

impl<W: Write> StepSink for JsonLines<W> {
    fn on_step(&mut self, step: &Step) {
        if let Some(text) = step.narrative() {
            tracing::trace!("{text}");
        }
        self.emit(&Event::Step { lane: None, step });
    }

    fn on_finished(&mut self, finished: &Finished) {
        self.emit(&Event::Finished { finished });
    }

    fn on_abort(&mut self, err: &TraceError) {
        self.emit(&Event::Abort {
            error: err.to_string(),
        });
    }
}

impl<W: Write> DualStepSink for JsonLines<W> {
    fn on_step(&mut self, algorithm: Algorithm, step: &Step) {
        if let Some(text) = step.narrative() {
            tracing::trace!(lane = %algorithm, "{text}");
        }
        self.emit(&Event::Step {
            lane: Some(algorithm),
            step,
        });
    }

    fn on_lane_finished(&mut self, finished: &Finished) {
        self.emit(&Event::Finished { finished });
    }

    fn on_comparison(&mut self, comparison: &Comparison) {
        self.emit(&Event::Comparison {
            same_vertex_set: comparison.same_vertex_set(),
            comparison,
        });
    }

    fn on_abort(&mut self, err: &TraceError) {
        self.emit(&Event::Abort {
            error: err.to_string(),
        });
    }
}
