use crate::trace::{Algorithm, Finished, Step, Trace, TraceError};

/// One trace plus the bookkeeping a controller keeps for it.
pub(crate) struct Lane {
    trace: Box<dyn Trace>,
    pulled: usize,
    finished: Option<Finished>,
}

impl Lane {
    pub(crate) fn new(trace: Box<dyn Trace>) -> Self {
        Self {
            trace,
            pulled: 0,
            finished: None,
        }
    }

    pub(crate) fn algorithm(&self) -> Algorithm {
        self.trace.algorithm()
    }

    pub(crate) fn pulled(&self) -> usize {
        self.pulled
    }

    pub(crate) fn finished(&self) -> Option<&Finished> {
        self.finished.as_ref()
    }

    /// Pull the next step. `Ok(None)` once this lane has finished.
    ///
    /// A trace that runs dry without a `Finished` step is reported as an
    /// error so no partial hull is ever presented as final.
    pub(crate) fn pull(&mut self) -> Result<Option<Step>, TraceError> {
        if self.finished.is_some() {
            return Ok(None);
        }
        match self.trace.pull()? {
            Some(step) => {
                self.pulled += 1;
                if let Step::Finished(f) = &step {
                    self.finished = Some(f.clone());
                }
                Ok(Some(step))
            }
            None => Err(TraceError::Aborted {
                algorithm: self.trace.algorithm(),
                reason: format!("trace ended after {} steps without a result", self.pulled),
            }),
        }
    }
}
