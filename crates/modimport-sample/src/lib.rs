//! Bindings generated from `decls/imports.decls.json` by the build script.
//!
//! Each surface is a module: attach provider functions, call `load()`, then
//! call through the forwarding functions.

/// A component handed back by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStub {
    pub id: u32,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStub {
    pub name: String,
}

include!(concat!(env!("OUT_DIR"), "/imports.rs"));
