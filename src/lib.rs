//! AIPing plugin
//! Model catalog synchronization, model adapter shims and image tools for the
//! AIPing inference API

pub mod config;
pub mod modules;
pub mod providers;
