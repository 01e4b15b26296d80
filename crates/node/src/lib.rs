//! Wiring, configuration and a development binary for the blob compression proof coordinator.

mod args;
pub use args::{
    BlobCoordinatorArgs, CoordinatorArgs, DatabaseArgs, DevArgs, GenesisArgs, PersistenceRetryArgs,
};

mod constants;

pub mod dev;

mod launch;
pub use launch::{resolve_chain_cursor, CoordinatorCollaborators};
