//! The codeact control loop — the heart of the runtime.
//!
//! One run follows a **Plan → Execute → Observe → Decide** cycle:
//!
//! 1. **Plan**: the task (plus optionally retrieved knowledge) becomes a
//!    markdown plan via one deterministic completion call
//! 2. **Execute**: the current code fragment runs in the remote kernel
//! 3. **Observe**: stdout/stderr are folded into the event stream, with
//!    repeated identical failures triggering a strategy-override directive
//! 4. **Decide**: the whole stream goes back to the completion provider,
//!    and the next code fragment is extracted from its response
//!
//! The loop ends when the about-to-run code contains the completion
//! sentinel, when a completion yields no extractable code, or when a
//! transport failure propagates. On every exit path the kernel session is
//! released exactly once.

pub mod error_tracker;
pub mod extract;
pub mod knowledge_injector;
pub mod orchestrator;
pub mod planner;
pub mod prompts;

pub use error_tracker::ErrorTracker;
pub use extract::extract_code_block;
pub use knowledge_injector::KnowledgeInjector;
pub use orchestrator::{Orchestrator, RunOutcome, RunState};
pub use planner::Planner;

#[cfg(test)]
pub(crate) mod test_helpers;
