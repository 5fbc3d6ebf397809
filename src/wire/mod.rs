//! Enum wire-representation registry
//!
//! Maps API string tokens to typed enumerants and flag sets.
//!
//! # Overview
//!
//! - [`wire_enum!`](crate::wire_enum) declares an enum with one token per
//!   enumerant and registers a static [`EnumMapping`] for it.
//! - [`wire_flags!`](crate::wire_flags) does the same for multi-valued
//!   options and enables [`FlagSet`].
//! - Decoding never fails on an unfamiliar token: [`Wire::Unknown`] keeps the
//!   raw text so callers decide whether to ignore, log or reject it.

mod canvas;
mod flags;
mod registry;

pub use canvas::{
    CourseInclude, CourseWorkflowState, EnrollmentState, EnrollmentType, SubmissionType,
};
pub use flags::{FlagSet, WireFlag};
pub use registry::{EnumMapping, Wire, WireEnum};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde;
}

#[cfg(test)]
mod tests;
