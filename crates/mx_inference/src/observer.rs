//! Stack-scoped diagnostic observation of the inference engine.
//!
//! The observer mirrors the function-processing recursion with an explicit
//! stack: one frame per function being processed, the handler for a new
//! frame chosen by a pure predicate over the function's originating source
//! identity. Production code always runs the void handler; the recording
//! handler is substituted only for the designated diagnostic source, so the
//! disabled path costs nothing. Events are built lazily through
//! [`ObserverStack::trace_with`], which consults the active handler before
//! any formatting or allocation happens.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Originating source identity of a function (compilation unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Events emitted while an inference attempt runs.
///
/// The variant names rendered by [`TraceEvent::name`] are a stable contract
/// for test suites asserting trace output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    FunctionEntry {
        function: &'a str,
        parameters: usize,
    },
    ParameterMatched {
        index: usize,
        declared: String,
        actual: String,
    },
    TypeWidened {
        parameter: &'a str,
        from: String,
        to: String,
    },
    MultiplicityWidened {
        parameter: &'a str,
        from: String,
        to: String,
    },
    InferenceFailed {
        function: &'a str,
        reason: String,
    },
    CandidateMatched {
        function: &'a str,
    },
    ReturnTypeResolved {
        resolved: String,
    },
}

impl TraceEvent<'_> {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            TraceEvent::FunctionEntry { .. } => "function-entry",
            TraceEvent::ParameterMatched { .. } => "parameter-matched",
            TraceEvent::TypeWidened { .. } => "type-widened",
            TraceEvent::MultiplicityWidened { .. } => "multiplicity-widened",
            TraceEvent::InferenceFailed { .. } => "inference-failed",
            TraceEvent::CandidateMatched { .. } => "candidate-matched",
            TraceEvent::ReturnTypeResolved { .. } => "return-type-resolved",
        }
    }
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::FunctionEntry {
                function,
                parameters,
            } => write!(f, "{function}/{parameters}"),
            TraceEvent::ParameterMatched {
                index,
                declared,
                actual,
            } => write!(f, "#{index} {declared} <- {actual}"),
            TraceEvent::TypeWidened {
                parameter,
                from,
                to,
            }
            | TraceEvent::MultiplicityWidened {
                parameter,
                from,
                to,
            } => write!(f, "{parameter}: {from} ~> {to}"),
            TraceEvent::InferenceFailed { function, reason } => {
                write!(f, "{function}: {reason}")
            }
            TraceEvent::CandidateMatched { function } => f.write_str(function),
            TraceEvent::ReturnTypeResolved { resolved } => f.write_str(resolved),
        }
    }
}

/// A trace handler. Infallible by design: observation must never affect the
/// inference outcome.
pub trait InferenceObserver {
    /// A new function-processing frame was opened for `source`.
    fn enter(&self, _source: &SourceId) {}

    /// The current frame completed.
    fn exit(&self) {}

    /// A trace event at the given indentation depth.
    fn trace_event(&self, _event: &TraceEvent<'_>, _depth: usize) {}

    /// Whether this handler records anything. The engine skips event
    /// construction entirely when this is `false`.
    fn is_tracing(&self) -> bool {
        false
    }
}

/// The production handler: does nothing, costs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidObserver;

impl InferenceObserver for VoidObserver {}

/// Records rendered trace lines and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    lines: RefCell<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl InferenceObserver for RecordingObserver {
    fn enter(&self, source: &SourceId) {
        tracing::debug!(target: "mx_inference::observer", source = source.as_str(), "enter");
        self.lines.borrow_mut().push(format!("enter({source})"));
    }

    fn exit(&self) {
        tracing::debug!(target: "mx_inference::observer", "exit");
        self.lines.borrow_mut().push("exit".to_string());
    }

    fn trace_event(&self, event: &TraceEvent<'_>, depth: usize) {
        tracing::debug!(
            target: "mx_inference::observer",
            event = event.name(),
            depth,
            "{event}"
        );
        self.lines
            .borrow_mut()
            .push(format!("{}{}: {}", "  ".repeat(depth), event.name(), event));
    }

    fn is_tracing(&self) -> bool {
        true
    }
}

/// The explicit frame stack attached to engine execution.
///
/// `Idle -> Processing(frame)*`: frames nest via [`ObserverStack::enter`] /
/// [`ObserverStack::exit`], mirroring the function-processing recursion
/// rather than the native call stack, so trace depth stays controllable.
pub struct ObserverStack {
    base: Rc<dyn InferenceObserver>,
    frames: Vec<Rc<dyn InferenceObserver>>,
    diagnostic_source: Option<SourceId>,
    recorder: Option<Rc<RecordingObserver>>,
    tab: usize,
}

impl ObserverStack {
    /// A stack that never records: every frame inherits the void handler.
    pub fn silent() -> Self {
        Self {
            base: Rc::new(VoidObserver),
            frames: Vec::new(),
            diagnostic_source: None,
            recorder: None,
            tab: 0,
        }
    }

    /// A stack that substitutes the recording handler for frames whose
    /// source matches `source`; all other frames inherit their parent's
    /// handler.
    pub fn with_diagnostic_source(source: SourceId) -> Self {
        Self {
            base: Rc::new(VoidObserver),
            frames: Vec::new(),
            diagnostic_source: Some(source),
            recorder: Some(Rc::new(RecordingObserver::new())),
            tab: 0,
        }
    }

    fn top(&self) -> &Rc<dyn InferenceObserver> {
        self.frames.last().unwrap_or(&self.base)
    }

    /// Pushes a frame for the function originating from `source`.
    pub fn enter(&mut self, source: &SourceId) {
        let handler: Rc<dyn InferenceObserver> = match (&self.diagnostic_source, &self.recorder) {
            (Some(diagnostic), Some(recorder)) if diagnostic == source => recorder.clone(),
            _ => self.top().clone(),
        };
        handler.enter(source);
        self.frames.push(handler);
    }

    /// Pops the current frame.
    pub fn exit(&mut self) {
        if let Some(handler) = self.frames.pop() {
            handler.exit();
        }
    }

    /// Whether the active (top-of-stack) handler records.
    pub fn is_tracing(&self) -> bool {
        self.top().is_tracing()
    }

    pub fn shift_tab(&mut self) {
        self.tab += 1;
    }

    pub fn unshift_tab(&mut self) {
        self.tab = self.tab.saturating_sub(1);
    }

    /// Emits an event, building it only when the active handler records.
    pub fn trace_with<'a>(&self, build: impl FnOnce() -> TraceEvent<'a>) {
        let top = self.top();
        if top.is_tracing() {
            top.trace_event(&build(), self.tab);
        }
    }

    /// Lines recorded so far, empty when no diagnostic source is set.
    pub fn recorded_lines(&self) -> Vec<String> {
        self.recorder
            .as_ref()
            .map(|recorder| recorder.lines())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ObserverStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverStack")
            .field("frames", &self.frames.len())
            .field("diagnostic_source", &self.diagnostic_source)
            .field("tab", &self.tab)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_stack_never_traces() {
        let mut stack = ObserverStack::silent();
        assert!(!stack.is_tracing());
        stack.enter(&SourceId::new("app.mx"));
        assert!(!stack.is_tracing());
        stack.trace_with(|| unreachable!("event must not be built"));
        stack.exit();
    }

    #[test]
    fn diagnostic_source_selects_the_recording_handler() {
        let mut stack = ObserverStack::with_diagnostic_source(SourceId::new("probe.mx"));
        stack.enter(&SourceId::new("app.mx"));
        assert!(!stack.is_tracing());

        stack.enter(&SourceId::new("probe.mx"));
        assert!(stack.is_tracing());

        // A nested frame from another source inherits the recording handler.
        stack.enter(&SourceId::new("app.mx"));
        assert!(stack.is_tracing());

        stack.exit();
        stack.exit();
        assert!(!stack.is_tracing());
        stack.exit();

        let lines = stack.recorded_lines();
        assert!(lines.iter().any(|line| line == "enter(probe.mx)"));
        assert!(lines.iter().any(|line| line == "enter(app.mx)"));
        // Only the two recording frames log their exit; the outermost void
        // frame stays silent.
        assert_eq!(lines.iter().filter(|line| *line == "exit").count(), 2);
    }

    #[test]
    fn events_render_with_tab_depth() {
        let mut stack = ObserverStack::with_diagnostic_source(SourceId::new("probe.mx"));
        stack.enter(&SourceId::new("probe.mx"));
        stack.trace_with(|| TraceEvent::CandidateMatched { function: "map" });
        stack.shift_tab();
        stack.trace_with(|| TraceEvent::ReturnTypeResolved {
            resolved: "Integer".to_string(),
        });
        stack.unshift_tab();

        let lines = stack.recorded_lines();
        assert!(lines.contains(&"candidate-matched: map".to_string()));
        assert!(lines.contains(&"  return-type-resolved: Integer".to_string()));
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(
            TraceEvent::FunctionEntry {
                function: "f",
                parameters: 0
            }
            .name(),
            "function-entry"
        );
        assert_eq!(
            TraceEvent::InferenceFailed {
                function: "f",
                reason: String::new()
            }
            .name(),
            "inference-failed"
        );
    }
}
