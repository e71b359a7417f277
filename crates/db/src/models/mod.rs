//! Entity structs and transfer objects.
//!
//! Each submodule contains:
//! - The persisted entity and the `FromRow` shape it is loaded from
//! - The `Serialize` + `Deserialize` transfer object exchanged with clients

pub mod movie;
