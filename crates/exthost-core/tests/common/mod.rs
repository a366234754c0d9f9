//! Helpers shared by the exthost-core integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use exthost_core::{BufferConsole, CapabilitySet, ExtensionHost};
use serde_json::json;

/// A host writing to an in-memory console.
pub fn host() -> (ExtensionHost, BufferConsole) {
    let console = BufferConsole::new();
    (ExtensionHost::with_console(console.clone()), console)
}

/// A shared call counter for hooks.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn helpers() -> CapabilitySet {
    CapabilitySet::new("Helpers").with_operation("greet", |args| {
        let who = args["who"].as_str().unwrap_or("world");
        Ok(json!(format!("hello {who}")))
    })
}

pub fn utils() -> CapabilitySet {
    CapabilitySet::new("Utils").with_operation("double", |args| {
        let n = args.as_i64().ok_or("expected a number")?;
        Ok(json!(n * 2))
    })
}
