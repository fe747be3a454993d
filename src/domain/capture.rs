//! Capture session state machine

use std::fmt;

use thiserror::Error;

/// Capture session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Starting,
    Recording,
    Stopping,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an operation is invoked from a state that forbids it.
/// Programmer error in correct shell usage, but must be detectable
/// rather than silently ignored.
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

/// Capture lifecycle entity.
///
/// State machine:
///   IDLE -> STARTING   (begin_start)
///   STARTING -> RECORDING (confirm_start)
///   RECORDING -> STOPPING (begin_stop)
///   STOPPING -> IDLE   (finish_stop)
///   any -> IDLE        (reset, teardown path)
#[derive(Debug, Default)]
pub struct CaptureMachine {
    state: CaptureState,
}

impl CaptureMachine {
    /// Create a new machine in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to STARTING
    pub fn begin_start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start recording".to_string(),
            });
        }
        self.state = CaptureState::Starting;
        Ok(())
    }

    /// Transition from STARTING to RECORDING
    pub fn confirm_start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Starting {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "confirm start".to_string(),
            });
        }
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPING
    pub fn begin_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop recording".to_string(),
            });
        }
        self.state = CaptureState::Stopping;
        Ok(())
    }

    /// Transition from STOPPING to IDLE
    pub fn finish_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Stopping {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "finish stop".to_string(),
            });
        }
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Force back to IDLE from any state. Teardown path only; never fails.
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_idle() {
        let machine = CaptureMachine::new();
        assert!(machine.is_idle());
        assert!(!machine.is_recording());
    }

    #[test]
    fn full_cycle() {
        let mut machine = CaptureMachine::new();

        machine.begin_start().unwrap();
        assert_eq!(machine.state(), CaptureState::Starting);

        machine.confirm_start().unwrap();
        assert!(machine.is_recording());

        machine.begin_stop().unwrap();
        assert_eq!(machine.state(), CaptureState::Stopping);

        machine.finish_stop().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn begin_start_from_recording_fails() {
        let mut machine = CaptureMachine::new();
        machine.begin_start().unwrap();
        machine.confirm_start().unwrap();

        let err = machine.begin_start().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn begin_stop_from_idle_fails() {
        let mut machine = CaptureMachine::new();

        let err = machine.begin_stop().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);
    }

    #[test]
    fn begin_stop_from_starting_fails() {
        let mut machine = CaptureMachine::new();
        machine.begin_start().unwrap();

        let err = machine.begin_stop().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Starting);
    }

    #[test]
    fn reset_from_any_state() {
        let mut machine = CaptureMachine::new();
        machine.begin_start().unwrap();
        machine.confirm_start().unwrap();

        machine.reset();
        assert!(machine.is_idle());

        // Reset is safe when already idle
        machine.reset();
        assert!(machine.is_idle());
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Idle.to_string(), "idle");
        assert_eq!(CaptureState::Starting.to_string(), "starting");
        assert_eq!(CaptureState::Recording.to_string(), "recording");
        assert_eq!(CaptureState::Stopping.to_string(), "stopping");
    }
}
