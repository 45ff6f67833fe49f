// Messenger application built on the RSA core

pub mod config;
pub mod directory;
pub mod messenger;

pub use config::Config;
pub use directory::{Directory, LocalDirectory};
pub use messenger::Messenger;
