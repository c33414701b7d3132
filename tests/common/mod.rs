//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use quantum_chat::models::Role;
use quantum_chat::store::MessageStore;
use tempfile::TempDir;

pub const SESSION_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Builder for a temp directory holding a transcript and a config file
pub struct TranscriptBuilder {
    temp_dir: TempDir,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, lines: Vec::new() }
    }

    /// Add a well-formed entry line
    pub fn with_entry(mut self, entry: EntryBuilder) -> Self {
        let index = self.lines.len();
        self.lines.push(entry.to_json(index));
        self
    }

    /// Add a raw line (malformed JSON, blank lines, ...)
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Write `chat.jsonl` and an empty `config.toml`, returning the directory
    pub fn build(self) -> TempDir {
        fs::write(self.temp_dir.path().join("chat.jsonl"), self.lines.join("\n"))
            .expect("Failed to write transcript");
        fs::write(self.temp_dir.path().join("config.toml"), "")
            .expect("Failed to write config");
        self.temp_dir
    }
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn transcript_path(dir: &TempDir) -> PathBuf {
    dir.path().join("chat.jsonl")
}

pub fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("config.toml")
}

/// Builder for one transcript line
pub struct EntryBuilder {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
    reactions: Vec<String>,
}

impl EntryBuilder {
    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap(),
            reactions: Vec::new(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn reaction(mut self, name: &str) -> Self {
        self.reactions.push(name.to_string());
        self
    }

    pub fn to_json(&self, index: usize) -> String {
        let role = match self.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        serde_json::json!({
            "session_id": SESSION_ID,
            "index": index,
            "role": role,
            "content": self.content,
            "timestamp": self.timestamp.to_rfc3339(),
            "reactions": self.reactions,
        })
        .to_string()
    }
}

/// Store with the given (role, content) entries appended in order
pub fn store_with(entries: &[(Role, &str)]) -> MessageStore {
    let mut store = MessageStore::new();
    for (role, content) in entries {
        store.append(*role, content).expect("Failed to append test entry");
    }
    store
}

/// Store with `count` alternating user/assistant entries
pub fn conversation(count: usize) -> MessageStore {
    let mut store = MessageStore::new();
    for i in 0..count {
        let (role, content) = if i % 2 == 0 {
            (Role::User, format!("question {} about qubits and gates", i))
        } else {
            (Role::Assistant, format!("answer {}: superposition explains it", i))
        };
        store.append(role, &content).expect("Failed to append test entry");
    }
    store
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}
