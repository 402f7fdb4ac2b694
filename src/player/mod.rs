//! Host-facing playback lifecycle.
//!
//! State machine: `Created → Initializing → Ready ⇄ stepping → Terminated`,
//! with `Faulted` reachable from anywhere. The host drives one operation at
//! a time on one instance; every operation reports its outcome exclusively
//! through a [`Status`] return, never a panic and never an error type
//! crossing the boundary.

pub mod logging;
pub mod variables;

use std::fs;
use std::path::{Path, PathBuf};

use logging::Logger;
use variables::VariableTable;

use crate::exchange::OutputExchange;
use crate::source::{self, MessageKind, TraceSource};
use crate::utils::config::{
    BOOLEAN_VALID_IDX, INTEGER_OBJECT_COUNT_IDX, INTEGER_OUT_BASE_HI_IDX,
    INTEGER_OUT_BASE_LO_IDX, INTEGER_OUT_SIZE_IDX, STRING_TRACE_DIR_IDX, STRING_TRACE_FILE_IDX,
};
use crate::utils::error::{PlayerError, SourceError};

/// Outcome of a host-facing operation.
///
/// `Discard` is the expected boundary outcome ("no output this step",
/// primarily end-of-trace); `Fatal` means the instance must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Discard,
    Error,
    Fatal,
}

/// Lifecycle position of a player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initializing,
    Ready,
    Terminated,
    Faulted,
}

impl LifecycleState {
    fn name(self) -> &'static str {
        match self {
            LifecycleState::Created => "Created",
            LifecycleState::Initializing => "Initializing",
            LifecycleState::Ready => "Ready",
            LifecycleState::Terminated => "Terminated",
            LifecycleState::Faulted => "Faulted",
        }
    }
}

/// Status-query kinds mirrored from the co-simulation interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    DoStep,
    Pending,
    LastSuccessfulTime,
    Terminated,
}

/// Declared instance kind. Playback only makes sense for co-simulation,
/// but the declaration is accepted and stored either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    CoSimulation,
    ModelExchange,
}

/// Construction parameters for a playback instance
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub instance_name: String,
    pub kind: InstanceKind,
    pub guid: String,
    pub resource_location: Option<String>,
    pub visible: bool,
    pub logging_on: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            instance_name: String::new(),
            kind: InstanceKind::CoSimulation,
            guid: String::new(),
            resource_location: None,
            visible: false,
            logging_on: false,
        }
    }
}

/// One playback session.
///
/// Owns its trace source, variable table and output exchange exclusively.
/// Dropping the player releases everything.
pub struct Player {
    config: PlayerConfig,
    state: LifecycleState,
    vars: VariableTable,
    exchange: OutputExchange,
    source: Option<Box<dyn TraceSource>>,
    logger: Logger,
}

impl Player {
    /// Allocate an instance with a zeroed variable table and the default
    /// logging category set. Never fails.
    pub fn new(config: PlayerConfig) -> Self {
        let logger = Logger::new(&config.instance_name, config.logging_on);
        Self {
            config,
            state: LifecycleState::Created,
            vars: VariableTable::new(),
            exchange: OutputExchange::new(),
            source: None,
            logger,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn instance_name(&self) -> &str {
        &self.config.instance_name
    }

    /// Reconfigure the debug-logging sink. Always succeeds.
    pub fn set_debug_logging(&mut self, logging_on: bool, categories: &[&str]) -> Status {
        self.logger.set_enabled(logging_on);
        self.logger.set_categories(categories);
        self.logger
            .debug("api", &format!("set_debug_logging({logging_on})"));
        Status::Ok
    }

    /// Experiment parameters are accepted but unused by playback.
    pub fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Status {
        self.logger.debug(
            "api",
            &format!("setup_experiment({tolerance:?},{start_time},{stop_time:?})"),
        );
        Status::Ok
    }

    /// No-op hook; moves `Created → Initializing`.
    pub fn enter_initialization(&mut self) -> Status {
        self.logger.debug("api", "enter_initialization()");
        if self.state != LifecycleState::Created {
            return self.invalid_transition("enter_initialization");
        }
        self.state = LifecycleState::Initializing;
        Status::Ok
    }

    /// Resolve the trace location, construct a source for its format and
    /// open it. Any failure here is fatal: the instance cannot step.
    pub fn exit_initialization(&mut self) -> Status {
        self.logger.debug("api", "exit_initialization()");
        if self.state != LifecycleState::Initializing {
            return self.invalid_transition("exit_initialization");
        }
        match self.open_trace() {
            Ok(()) => {
                self.state = LifecycleState::Ready;
                Status::Ok
            }
            Err(e) => {
                self.logger.error("player", &e.to_string());
                self.state = LifecycleState::Faulted;
                Status::Fatal
            }
        }
    }

    fn open_trace(&mut self) -> Result<(), PlayerError> {
        let dir = PathBuf::from(&self.vars.strings[STRING_TRACE_DIR_IDX]);
        let mut file_name = self.vars.strings[STRING_TRACE_FILE_IDX].clone();
        if file_name.is_empty() {
            file_name = first_recognized_entry(&dir)?
                .ok_or_else(|| PlayerError::NoTraceFile(dir.clone()))?;
            self.logger
                .info("trace", &format!("resolved trace file {file_name}"));
        }

        let path = dir.join(file_name);
        let mut source = source::create_source(&path)?;
        source.open()?;
        self.source = Some(source);
        Ok(())
    }

    /// Advance playback by one step.
    ///
    /// Consumes exactly one message on success and publishes its bytes
    /// through the output exchange; an exhausted trace yields `Discard`
    /// with exported state untouched.
    pub fn step(&mut self, current_time: f64, step_size: f64, _no_set_state_prior: bool) -> Status {
        self.logger
            .debug("api", &format!("step({current_time},{step_size})"));
        if self.state != LifecycleState::Ready {
            return self.invalid_transition("step");
        }

        let source = match self.source.as_mut() {
            Some(source) => source,
            None => {
                self.state = LifecycleState::Faulted;
                return Status::Fatal;
            }
        };

        if !source.has_next() {
            self.logger
                .info("trace", "end of trace reached, discarding step");
            return Status::Discard;
        }

        let message = match source.read_next() {
            Ok(message) => message,
            Err(e) => {
                self.logger
                    .error("trace", &format!("error reading message: {e}"));
                self.state = LifecycleState::Faulted;
                return Status::Fatal;
            }
        };

        match message.kind {
            MessageKind::SensorView | MessageKind::SensorData => {
                let published = self.exchange.publish(&message.payload);
                self.vars.integers[INTEGER_OUT_BASE_LO_IDX] = published.base_lo;
                self.vars.integers[INTEGER_OUT_BASE_HI_IDX] = published.base_hi;
                self.vars.integers[INTEGER_OUT_SIZE_IDX] = published.len;
                if let Some(count) = message.object_count {
                    self.vars.integers[INTEGER_OBJECT_COUNT_IDX] = count as i32;
                }
                self.vars.booleans[BOOLEAN_VALID_IDX] = true;
                self.logger.debug(
                    "trace",
                    &format!(
                        "providing {:08X} {:08X}, {} bytes",
                        published.base_hi, published.base_lo, published.len
                    ),
                );
                Status::Ok
            }
            kind => {
                let e = PlayerError::UnsupportedMessage(kind);
                self.logger.error("player", &e.to_string());
                self.state = LifecycleState::Faulted;
                Status::Fatal
            }
        }
    }

    /// Bytes of the most recent publication, for in-process hosts that can
    /// hold a reference instead of decoding the exported address.
    pub fn retained_output(&self) -> &[u8] {
        self.exchange.retained()
    }

    /// Query-only no-op; moves `Ready → Terminated`.
    pub fn terminate(&mut self) -> Status {
        self.logger.debug("api", "terminate()");
        if self.state == LifecycleState::Faulted {
            return Status::Fatal;
        }
        self.state = LifecycleState::Terminated;
        Status::Ok
    }

    /// Close any open source and return to the freshly-constructed state.
    ///
    /// Policy: stepping after reset requires a new
    /// `enter_initialization`/`exit_initialization` pass; the trace is not
    /// reopened implicitly.
    pub fn reset(&mut self) -> Status {
        self.logger.debug("api", "reset()");
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.exchange.clear();
        self.vars.reset();
        self.logger.set_categories(&[]);
        self.state = LifecycleState::Created;
        Status::Ok
    }

    /// Boolean status query. Only `Terminated` is answerable: `Ok` with
    /// `true` once the trace is exhausted, `Discard` otherwise.
    pub fn get_boolean_status(&mut self, kind: StatusKind) -> (Status, bool) {
        if kind == StatusKind::Terminated {
            if let Some(source) = self.source.as_mut() {
                return if source.has_next() {
                    (Status::Discard, false)
                } else {
                    (Status::Ok, true)
                };
            }
        }
        (Status::Discard, false)
    }

    // Bulk typed accessors. Left-to-right with an all-or-report contract:
    // the first out-of-range reference fails the call, earlier writes stand.

    pub fn get_boolean(&self, refs: &[usize], out: &mut [bool]) -> Status {
        let result = self.vars.get_booleans(refs, out);
        self.report(result, "get_boolean")
    }

    pub fn set_boolean(&mut self, refs: &[usize], values: &[bool]) -> Status {
        let result = self.vars.set_booleans(refs, values);
        self.report(result, "set_boolean")
    }

    pub fn get_integer(&self, refs: &[usize], out: &mut [i32]) -> Status {
        let result = self.vars.get_integers(refs, out);
        self.report(result, "get_integer")
    }

    pub fn set_integer(&mut self, refs: &[usize], values: &[i32]) -> Status {
        let result = self.vars.set_integers(refs, values);
        self.report(result, "set_integer")
    }

    pub fn get_real(&self, refs: &[usize], out: &mut [f64]) -> Status {
        let result = self.vars.get_reals(refs, out);
        self.report(result, "get_real")
    }

    pub fn set_real(&mut self, refs: &[usize], values: &[f64]) -> Status {
        let result = self.vars.set_reals(refs, values);
        self.report(result, "set_real")
    }

    pub fn get_string(&self, refs: &[usize], out: &mut [String]) -> Status {
        let result = self.vars.get_strings(refs, out);
        self.report(result, "get_string")
    }

    pub fn set_string(&mut self, refs: &[usize], values: &[&str]) -> Status {
        let result = self.vars.set_strings(refs, values);
        self.report(result, "set_string")
    }

    // Optional capabilities this component intentionally does not
    // implement. All report uniformly instead of partially attempting.

    pub fn get_state(&self) -> Status {
        self.unsupported("get_state")
    }

    pub fn set_state(&self) -> Status {
        self.unsupported("set_state")
    }

    pub fn serialize_state(&self) -> Status {
        self.unsupported("serialize_state")
    }

    pub fn deserialize_state(&self) -> Status {
        self.unsupported("deserialize_state")
    }

    pub fn get_directional_derivative(&self) -> Status {
        self.unsupported("get_directional_derivative")
    }

    pub fn set_input_derivatives(&self) -> Status {
        self.unsupported("set_input_derivatives")
    }

    pub fn get_output_derivatives(&self) -> Status {
        self.unsupported("get_output_derivatives")
    }

    /// Async stepping never starts, so there is nothing to cancel.
    pub fn cancel_step(&self) -> Status {
        Status::Ok
    }

    /// Non-boolean status queries are not answerable.
    pub fn get_status(&self, _kind: StatusKind) -> Status {
        Status::Discard
    }

    fn unsupported(&self, op: &str) -> Status {
        self.logger.debug("api", &format!("{op}() not supported"));
        Status::Error
    }

    fn report(&self, result: Result<(), PlayerError>, op: &str) -> Status {
        match result {
            Ok(()) => Status::Ok,
            Err(e) => {
                self.logger.error("api", &format!("{op}: {e}"));
                Status::Error
            }
        }
    }

    fn invalid_transition(&mut self, op: &'static str) -> Status {
        if self.state == LifecycleState::Faulted {
            return Status::Fatal;
        }
        let e = PlayerError::InvalidTransition {
            op,
            state: self.state.name(),
        };
        self.logger.error("api", &e.to_string());
        Status::Error
    }
}

/// First directory entry (in sorted order) carrying a recognized trace
/// extension, or `None` if the directory holds no trace file.
fn first_recognized_entry(dir: &Path) -> Result<Option<String>, PlayerError> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(SourceError::Io)? {
        let entry = entry.map_err(SourceError::Io)?;
        let path = entry.path();
        if source::is_recognized_extension(&path) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names.into_iter().next())
}
