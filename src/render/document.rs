//! Intermediate tree for the broker configuration grammar.
//!
//! Renderers build a [`Document`] and serialize it in a single pass, so the
//! output depends only on the tree and never on call order elsewhere.
//!
//! ```text
//! key: 4222                  Value::Int
//! key: name                  Value::Bare
//! key: "text"                Value::Quoted
//! key: ["a", "b"]            Value::List of scalars
//! key: [                     Value::List containing maps
//!     {user: a, password: b} Value::Inline
//!     {                      Value::Block as list item
//!         ...
//!     }
//! ]
//! key {                      Value::Block
//!     ...
//! }
//! include ./accounts.conf    Document include
//! ```
//!
//! Strings are emitted verbatim. No quoting or escaping is applied beyond
//! wrapping `Quoted` values in double quotes.

use std::fmt::Write as _;

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bare(String),
    Quoted(String),
    List(Vec<Value>),
    /// Single-line map, used for list entries.
    Inline(Vec<Entry>),
    Block(Block),
}

impl Value {
    pub fn bare(value: impl Into<String>) -> Self {
        Value::Bare(value.into())
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Value::Quoted(value.into())
    }

    fn is_scalar(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Bare(_) | Value::Quoted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Ordered key/value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    entries: Vec<Entry>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.push(Entry::new(key, value));
        self
    }

    pub fn int(self, key: impl Into<String>, value: impl Into<i64>) -> Self {
        self.entry(key, Value::Int(value.into()))
    }

    pub fn bare(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry(key, Value::bare(value))
    }

    pub fn quoted(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry(key, Value::quoted(value))
    }

    pub fn block(self, key: impl Into<String>, block: Block) -> Self {
        self.entry(key, Value::Block(block))
    }

    pub fn list(self, key: impl Into<String>, items: Vec<Value>) -> Self {
        self.entry(key, Value::List(items))
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push(Entry::new(key, value));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// A complete configuration file: top-level entries followed by includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: Block,
    pub includes: Vec<String>,
}

impl Document {
    pub fn new(body: Block) -> Self {
        Self {
            body,
            includes: Vec::new(),
        }
    }

    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    /// Serialize the tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.body.entries() {
            write_entry(&mut out, 0, entry);
        }
        for path in &self.includes {
            out.push_str("include ");
            out.push_str(path);
            out.push('\n');
        }
        out
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_entry(out: &mut String, depth: usize, entry: &Entry) {
    indent(out, depth);
    match &entry.value {
        Value::Block(block) => {
            let _ = writeln!(out, "{} {{", entry.key);
            write_block_body(out, depth + 1, block);
            indent(out, depth);
            out.push_str("}\n");
        }
        Value::List(items) if !items.is_empty() && !items.iter().all(Value::is_scalar) => {
            let _ = writeln!(out, "{}: [", entry.key);
            for item in items {
                write_item(out, depth + 1, item);
            }
            indent(out, depth);
            out.push_str("]\n");
        }
        value => {
            let _ = writeln!(out, "{}: {}", entry.key, inline(value));
        }
    }
}

fn write_block_body(out: &mut String, depth: usize, block: &Block) {
    for entry in block.entries() {
        write_entry(out, depth, entry);
    }
}

fn write_item(out: &mut String, depth: usize, item: &Value) {
    indent(out, depth);
    match item {
        Value::Block(block) => {
            out.push_str("{\n");
            write_block_body(out, depth + 1, block);
            indent(out, depth);
            out.push_str("}\n");
        }
        value => {
            out.push_str(&inline(value));
            out.push('\n');
        }
    }
}

/// Single-line rendering. Blocks nested in an inline context collapse to
/// inline maps.
fn inline(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Bare(s) => s.clone(),
        Value::Quoted(s) => format!("\"{}\"", s),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().map(inline).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Inline(entries) => inline_map(entries),
        Value::Block(block) => inline_map(block.entries()),
    }
}

fn inline_map(entries: &[Entry]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|e| format!("{}: {}", e.key, inline(&e.value)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}
