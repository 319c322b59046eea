//! Jupyter Kernel Gateway client for codeact.
//!
//! Implements `codeact_core::ExecutionSession` against a Jupyter Kernel
//! Gateway: kernel lifecycle over REST, code execution over the kernel's
//! WebSocket channels endpoint.

pub mod gateway;
pub mod protocol;

pub use gateway::KernelGatewaySession;
