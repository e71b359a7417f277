//! Use-case services sitting between the handlers and the storage seams.

pub mod movie;
