//! Recording fakes for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::comm::{CommandOutput, Communicator};
use crate::error::ProvisionError;
use crate::guest::{Capability, GuestCapabilities};
use crate::ui::{Notice, Ui};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute { command: String, privileged: bool },
    Test { command: String, privileged: bool },
}

/// Communicator that records every call. Tests fail unless marked passing;
/// executes succeed unless given an exit code. Commands marked unreachable
/// fail as if the connection dropped.
#[derive(Debug, Default)]
pub struct FakeComm {
    passing: HashSet<String>,
    exit_codes: HashMap<String, i32>,
    unreachable: HashSet<String>,
    calls: RefCell<Vec<Call>>,
}

impl FakeComm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passing(mut self, command: &str) -> Self {
        self.passing.insert(command.to_string());
        self
    }

    pub fn exiting(mut self, command: &str, code: i32) -> Self {
        self.exit_codes.insert(command.to_string(), code);
        self
    }

    pub fn unreachable(mut self, command: &str) -> Self {
        self.unreachable.insert(command.to_string());
        self
    }

    fn connection_lost(&self, command: &str) -> Result<(), ProvisionError> {
        if self.unreachable.contains(command) {
            return Err(ProvisionError::ConnectionFailed {
                command: command.to_string(),
                stderr: "Connection reset by peer".into(),
            });
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn sudo_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Execute { command, .. } => Some(command),
                Call::Test { .. } => None,
            })
            .collect()
    }

    pub fn test_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Test { command, .. } => Some(command),
                Call::Execute { .. } => None,
            })
            .collect()
    }
}

impl Communicator for FakeComm {
    fn execute(&self, command: &str, privileged: bool) -> Result<CommandOutput, ProvisionError> {
        self.calls.borrow_mut().push(Call::Execute {
            command: command.to_string(),
            privileged,
        });
        self.connection_lost(command)?;
        let code = self.exit_codes.get(command).copied().unwrap_or(0);
        Ok(CommandOutput::from_code(code))
    }

    fn test(&self, command: &str, privileged: bool) -> Result<bool, ProvisionError> {
        self.calls.borrow_mut().push(Call::Test {
            command: command.to_string(),
            privileged,
        });
        self.connection_lost(command)?;
        Ok(self.passing.contains(command))
    }
}

/// Guest with a fixed capability set that counts invocations.
#[derive(Debug, Default)]
pub struct FakeGuest {
    supported: HashSet<Capability>,
    pub invoked: Cell<usize>,
}

impl FakeGuest {
    pub fn without_capabilities() -> Self {
        Self::default()
    }

    pub fn with(capability: Capability) -> Self {
        Self {
            supported: HashSet::from([capability]),
            invoked: Cell::new(0),
        }
    }
}

impl GuestCapabilities for FakeGuest {
    fn supports(&self, capability: Capability) -> bool {
        self.supported.contains(&capability)
    }

    fn invoke(&self, capability: Capability, _comm: &dyn Communicator) -> Result<(), ProvisionError> {
        if !self.supports(capability) {
            return Err(ProvisionError::UnsupportedCapability { capability });
        }
        self.invoked.set(self.invoked.get() + 1);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    pub notices: RefCell<Vec<Notice>>,
}

impl Ui for RecordingUi {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
