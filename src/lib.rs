pub mod commands;
pub mod http;
pub mod lifecycle;
pub mod nexus;
pub mod package;
pub mod runtime;
pub mod transfer;
