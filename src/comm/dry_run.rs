use std::cell::RefCell;

use super::{CommandOutput, Communicator};
use crate::error::ProvisionError;

/// Prints commands instead of running them.
///
/// Every test fails and every command succeeds, so a dry run walks the
/// path a freshly booted machine would take.
#[derive(Debug, Default)]
pub struct DryRun {
    issued: RefCell<Vec<String>>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands seen so far, prefixed with `[sudo] ` when privileged.
    pub fn issued(&self) -> Vec<String> {
        self.issued.borrow().clone()
    }
}

impl Communicator for DryRun {
    fn execute(&self, command: &str, privileged: bool) -> Result<CommandOutput, ProvisionError> {
        let line = if privileged {
            format!("[sudo] {command}")
        } else {
            command.to_string()
        };
        println!("{line}");
        self.issued.borrow_mut().push(line);
        Ok(CommandOutput::from_code(0))
    }

    fn test(&self, command: &str, privileged: bool) -> Result<bool, ProvisionError> {
        self.execute(command, privileged)?;
        Ok(false)
    }
}
