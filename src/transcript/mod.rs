//! Session transcripts as JSONL.
//!
//! # Error Handling Strategy
//!
//! Saving is all-or-nothing: the file is written beside its destination and
//! renamed into place, so a crash never leaves a half-written transcript.
//!
//! Loading follows a **graceful degradation** approach:
//!
//! - **Malformed lines**: logged with `tracing::warn!` and skipped.
//! - **Catastrophic corruption**: more than 50% bad lines, or 100 bad lines in
//!   a row, fails the whole load.
//! - **Oversized files**: anything over 10MB is rejected before reading.
//!
//! A loaded transcript is replayed into a fresh [`MessageStore`], either for
//! offline search or to continue the conversation in the interactive chat.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Reaction, Role};
use crate::store::{MessageStore, ReactionBoard};
use crate::utils::validate_file_size;

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// One entry as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub session_id: Uuid,
    pub index: usize,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

/// Which session wrote each entry.
///
/// Entries replayed from an earlier transcript keep the id they were saved
/// with; everything appended afterwards belongs to the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLog {
    current: Uuid,
    earlier: Vec<Uuid>,
}

impl SessionLog {
    pub fn new(current: Uuid) -> Self {
        Self { current, earlier: Vec::new() }
    }

    /// Continue after `earlier`, one id per restored entry
    pub fn resumed(current: Uuid, earlier: Vec<Uuid>) -> Self {
        Self { current, earlier }
    }

    pub fn current(&self) -> Uuid {
        self.current
    }

    pub fn session_for(&self, index: usize) -> Uuid {
        self.earlier.get(index).copied().unwrap_or(self.current)
    }
}

/// Store, reactions and per-entry session ids rebuilt from a transcript
#[derive(Debug, Clone, Default)]
pub struct RestoredSession {
    pub store: MessageStore,
    pub reactions: ReactionBoard,
    /// Session id of each restored entry, by store index
    pub sessions: Vec<Uuid>,
}

/// Build the on-disk lines for a session
pub fn transcript_lines(
    sessions: &SessionLog,
    store: &MessageStore,
    reactions: &ReactionBoard,
) -> Vec<TranscriptLine> {
    store
        .all()
        .iter()
        .map(|entry| TranscriptLine {
            session_id: sessions.session_for(entry.sequence_index),
            index: entry.sequence_index,
            role: entry.role,
            content: entry.content.clone(),
            timestamp: entry.timestamp,
            reactions: reactions.reactions(entry.sequence_index),
        })
        .collect()
}

/// Write the session atomically (temp file + rename)
pub fn save_transcript(
    path: &Path,
    sessions: &SessionLog,
    store: &MessageStore,
    reactions: &ReactionBoard,
) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    for line in transcript_lines(sessions, store, reactions) {
        let json = serde_json::to_string(&line).context("Failed to serialize transcript line")?;
        writeln!(file, "{}", json).context("Failed to write transcript line")?;
    }
    file.sync_all().context("Failed to flush transcript")?;
    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move transcript into place: {}", path.display()))?;

    tracing::info!(path = %path.display(), entries = store.len(), "saved transcript");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a transcript, skipping malformed lines
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is larger than 10MB, or if
/// more than 50% of its lines (or 100 consecutive lines) fail to parse.
pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptLine>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut skipped = 0;
    let mut total = 0;
    let mut consecutive_errors = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line from transcript")?;
        if line.trim().is_empty() {
            continue;
        }
        total += 1;

        match serde_json::from_str::<TranscriptLine>(&line) {
            Ok(parsed) => {
                lines.push(parsed);
                consecutive_errors = 0;
            }
            Err(e) => {
                tracing::warn!(line = line_num + 1, error = %e, "skipping malformed transcript line");
                skipped += 1;
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    bail!(
                        "Too many consecutive parse errors ({}) in transcript - file may be corrupted",
                        consecutive_errors
                    );
                }
            }
        }
    }

    if total > 0 {
        let failure_rate = skipped as f64 / total as f64;
        if failure_rate > 0.5 {
            bail!(
                "Too many parse failures in transcript: {} of {} lines failed ({:.1}%)",
                skipped,
                total,
                failure_rate * 100.0
            );
        }
    }

    if skipped > 0 {
        tracing::warn!(entries = lines.len(), skipped, "transcript loaded with skipped lines");
    }

    Ok(lines)
}

/// Replay transcript lines into a fresh store, in file order.
///
/// Indices are reassigned densely; blank entries are skipped and reactions
/// follow their entry to its new index.
pub fn restore(lines: &[TranscriptLine]) -> (MessageStore, ReactionBoard) {
    let restored = restore_session(lines);
    (restored.store, restored.reactions)
}

/// Like [`restore`], also keeping the session id each entry was saved with
pub fn restore_session(lines: &[TranscriptLine]) -> RestoredSession {
    let mut restored = RestoredSession::default();

    for line in lines {
        match restored.store.append_at(line.role, &line.content, line.timestamp) {
            Ok(index) => {
                restored.sessions.push(line.session_id);
                for reaction in &line.reactions {
                    // Index was just handed out, so this cannot miss
                    let _ = restored.reactions.add(&restored.store, index, *reaction);
                }
            }
            Err(e) => {
                tracing::warn!(index = line.index, error = %e, "skipping transcript entry");
            }
        }
    }

    restored
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample_store() -> (MessageStore, ReactionBoard) {
        let mut store = MessageStore::new();
        store.append(Role::Assistant, "Hello! How can I help?").unwrap();
        store.append(Role::User, "Tell me about ```qubits```").unwrap();
        let mut board = ReactionBoard::new();
        board.add(&store, 0, Reaction::Wave).unwrap();
        (store, board)
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.jsonl");
        let (store, board) = sample_store();
        let session = Uuid::new_v4();

        save_transcript(&path, &SessionLog::new(session), &store, &board).unwrap();
        let lines = load_transcript(&path).unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.session_id == session));
        assert_eq!(lines[0].reactions, vec![Reaction::Wave]);
        assert_eq!(lines[1].content, "Tell me about ```qubits```");
        assert!(!dir.path().join("chat.jsonl.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/chat.jsonl");
        let (store, board) = sample_store();
        save_transcript(&path, &SessionLog::new(Uuid::new_v4()), &store, &board).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_restore_reassigns_indices() {
        let ts = Utc::now();
        let session = Uuid::new_v4();
        let line = |index, content: &str| TranscriptLine {
            session_id: session,
            index,
            role: Role::User,
            content: content.to_string(),
            timestamp: ts,
            reactions: vec![Reaction::Entangled],
        };
        let lines = vec![line(0, "first"), line(1, "   "), line(2, "third")];

        let (store, board) = restore(&lines);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().content, "third");
        assert_eq!(board.reactions(1), vec![Reaction::Entangled]);
        assert_eq!(store.get(1).unwrap().timestamp, ts);
    }

    #[test]
    fn test_restore_session_keeps_ids_of_kept_entries() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let line = |session_id, content: &str| TranscriptLine {
            session_id,
            index: 0,
            role: Role::Assistant,
            content: content.to_string(),
            timestamp: Utc::now(),
            reactions: Vec::new(),
        };
        let lines = vec![line(a, "from a"), line(b, ""), line(b, "from b")];

        let restored = restore_session(&lines);

        assert_eq!(restored.store.len(), 2);
        assert_eq!(restored.sessions, vec![a, b]);
    }

    #[test]
    fn test_saved_lines_keep_earlier_sessions() {
        let (earlier, current) = (Uuid::new_v4(), Uuid::new_v4());
        let (store, board) = sample_store();
        let sessions = SessionLog::resumed(current, vec![earlier]);

        let lines = transcript_lines(&sessions, &store, &board);

        assert_eq!(lines[0].session_id, earlier);
        assert_eq!(lines[1].session_id, current);
        assert_eq!(sessions.current(), current);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_transcript(&dir.path().join("nope.jsonl")).unwrap_err();
        assert!(err.to_string().contains("Failed to open transcript"));
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(temp_path_for(Path::new("/a/b.jsonl")), PathBuf::from("/a/b.jsonl.tmp"));
    }
}
