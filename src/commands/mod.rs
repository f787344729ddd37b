//! Build stages driven by [`crate::Site`]

pub mod build;
pub mod clean;
