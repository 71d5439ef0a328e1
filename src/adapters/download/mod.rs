//! File saver implementations.

mod directory_saver;

pub use directory_saver::DirectoryFileSaver;
