//! JSONL audit log: append-only line-delimited JSON for governance runs.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so a tailing process never sees a torn line.
//! Fallback chain: primary file, then stderr with an `[MGOV-AUDIT]` prefix,
//! then silent discard — the pipeline must never fail because logging did.

#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StageStart,
    StageComplete,
    ArtifactWritten,
    StageFailed,
}

/// A single audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Pipeline stage (train, stress, score, report).
    pub stage: String,
    /// Model identifier the stage operated on.
    pub model_id: String,
    /// Artifact name for artifact events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    /// Stable error code for failure events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    /// Create an entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, stage: &str, model_id: &str) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
            stage: stage.to_string(),
            model_id: model_id.to_string(),
            artifact: None,
            error_code: None,
            details: None,
        }
    }
}

/// Append-only audit writer with graceful degradation.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    /// Log to the given JSONL file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Drop every entry; useful for library embedding and tests.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// Append one entry. Never fails; degrades to stderr, then discard.
    pub fn append(&self, entry: &AuditEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(line.as_bytes()));
            if written.is_ok() {
                return;
            }
            let _ = write!(std::io::stderr(), "[MGOV-AUDIT] {line}");
        }
    }

    /// Record the beginning of a stage.
    pub fn stage_start(&self, stage: &'static str, model_id: &str) {
        self.append(&AuditEntry::new(EventType::StageStart, stage, model_id));
    }

    /// Record a successfully completed stage.
    pub fn stage_complete(&self, stage: &'static str, model_id: &str, details: Option<String>) {
        let mut entry = AuditEntry::new(EventType::StageComplete, stage, model_id);
        entry.details = details;
        self.append(&entry);
    }

    /// Record a persisted artifact.
    pub fn artifact_written(&self, stage: &'static str, model_id: &str, artifact: &str) {
        let mut entry = AuditEntry::new(EventType::ArtifactWritten, stage, model_id);
        entry.artifact = Some(artifact.to_string());
        self.append(&entry);
    }

    /// Record a failed stage with its stable error code.
    pub fn stage_failed(&self, stage: &'static str, model_id: &str, code: &str, details: String) {
        let mut entry = AuditEntry::new(EventType::StageFailed, stage, model_id);
        entry.error_code = Some(code.to_string());
        entry.details = Some(details);
        self.append(&entry);
    }
}
