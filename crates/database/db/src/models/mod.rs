/// This module contains the blob database model.
pub mod blob;
