pub mod classify;
pub mod extraction;
pub mod io;
pub mod registry;
pub mod shared;
pub mod sorting;
