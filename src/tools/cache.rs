//! Per-run memo of tool outputs
//!
//! A model sometimes repeats a call it already made. Within one run the second
//! call for the same destination is answered from here, so each provider is hit
//! at most once per distinct argument set.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// `(tool name, serialized arguments)`. serde_json sorts object keys, so two
/// argument objects that differ only in key order share a key.
type CacheKey = (String, String);

fn cache_key(tool_name: &str, arguments: &Value) -> CacheKey {
    (tool_name.to_string(), arguments.to_string())
}

/// Successful tool outputs for one agent run; failures are never stored
#[derive(Default)]
pub struct ToolCache {
    entries: RwLock<HashMap<CacheKey, Value>>,
}

impl ToolCache {
    pub fn get(&self, tool_name: &str, arguments: &Value) -> Option<Value> {
        let entries = self.entries.read().ok()?;
        entries.get(&cache_key(tool_name, arguments)).cloned()
    }

    pub fn insert(&self, tool_name: &str, arguments: &Value, output: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(cache_key(tool_name, arguments), output);
        }
    }
}
