//! Process termination hook used by the fatal path

/// Exit status used when a fatal line terminates the process
pub const FATAL_EXIT_CODE: i32 = 1;

/// Terminates the process after a fatal line has been written and drained.
///
/// Swappable so tests can observe the exit instead of dying.
pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: i32);
}

/// Default handler: `std::process::exit`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}
