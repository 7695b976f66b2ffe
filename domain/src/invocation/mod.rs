//! Invocation requests.
//!
//! An [`InvocationRequest`] is one request to run a named tool with a set of
//! parameter values. A batch is the ordered list of requests derived from a
//! single user request; the same tool may appear more than once in a batch,
//! each occurrence identified by its own [`InvocationId`].

pub mod entities;

pub use entities::{InvocationId, InvocationRequest, InvocationState};
