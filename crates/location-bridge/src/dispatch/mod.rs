//! Command dispatch.
//!
//! Commands arrive one at a time from the embedding transport. The
//! [`CommandRouter`] hands each to its handler together with a one-shot
//! [`Reply`]; handlers either resolve it inline or park it until the
//! platform answers.

mod arguments;
mod command;
mod errors;
mod handlers;
mod outcome;
mod router;

pub use arguments::Fields;
pub use command::Command;
pub use errors::{DispatchError, ErrorCode};
pub use outcome::{Outcome, Reply};
pub use router::{CommandRouter, Handler};
