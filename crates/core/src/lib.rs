#![deny(warnings)]

pub mod audio;
pub mod config;
pub mod emotion;
pub mod session;
pub mod util;
