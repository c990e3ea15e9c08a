//! # lmscript runner
//!
//! Remote script execution: build the debug command, submit it to a
//! collector, poll the session and interpret the result.

pub mod command;
pub mod executor;
pub mod outcome;

pub use command::ScriptCommand;
pub use executor::{
    ExecutionOutcome, ExecutionState, JobHandle, PollPolicy, ScriptExecutor, POLL_INTERVAL,
    POLL_MAX_ATTEMPTS,
};
pub use outcome::{classify, PollClassification, ScriptResult};
