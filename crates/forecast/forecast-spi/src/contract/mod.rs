//! Contract module containing trait definitions for the regression oracle

mod regressor;
mod regressor_loader;

pub use regressor::Regressor;
pub use regressor_loader::RegressorLoader;
