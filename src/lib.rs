//! Idempotent Docker provisioning of a machine over a shell transport.
//!
//! [`docker::DockerClient`] decides which commands to run; a
//! [`comm::Communicator`] runs them and a [`guest::GuestCapabilities`]
//! provider handles guest-specific steps such as starting the daemon.

pub mod comm;
pub mod config;
pub mod docker;
pub mod error;
pub mod guest;
pub mod provisioner;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::ProvisionError;
