// * Engine: run orchestration, control signals, retry and politeness pacing

pub mod control;
pub mod orchestrator;
pub mod politeness;
pub mod retry;

pub use control::{control_channel, ControlError, ControlHandle, ControlReceiver, ControlSignal};
pub use orchestrator::{
    LogOnlySink, Orchestrator, ProgressSink, RunReport, RunRequest, ScrapeError,
};
