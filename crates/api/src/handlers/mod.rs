//! HTTP handlers, one module per resource.

pub mod file;
pub mod form;
pub mod movie;
