//! Testing utilities for galtag
//!
//! In-memory stand-ins for the collaborators the core talks to: the
//! filesystem, the remote index (at the command and at the transport level)
//! and the user-facing pickers. Each one is scripted with a builder and
//! records what it was asked, so tests can assert on call order.
//!
//! Only available when compiled with `cfg(test)`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Notify;

use crate::client::{QueryClient, RemoteCallError, Transport, commands};
use crate::fs::{DirEntry, EntryKind, FileSystem, FsError};
use crate::picker::{FileFilter, Picker};

type RemoteResult<T> = std::result::Result<T, RemoteCallError>;

fn not_found(path: &str) -> FsError {
    FsError::Io {
        path: path.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such entry"),
    }
}

/// Scripted in-memory filesystem
///
/// Directory listings are returned files first, then subdirectories, in the
/// order given. Paths that were never scripted do not exist.
///
/// # Examples
/// ```ignore
/// let fs = MockFs::new()
///     .dir("/root", &["a.png"], &["sub"])
///     .dir("/root/sub", &["b.png"], &[])
///     .inaccessible("/root/locked");
/// ```
#[derive(Debug, Default)]
pub struct MockFs {
    dirs: HashMap<String, Vec<DirEntry>>,
    texts: HashMap<String, String>,
    denied: HashSet<String>,
}

impl MockFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a directory listing
    #[must_use]
    pub fn dir(mut self, path: &str, files: &[&str], subdirs: &[&str]) -> Self {
        let child = |name: &str, kind| DirEntry::new(name, format!("{path}/{name}"), kind);
        let entries = files
            .iter()
            .map(|&name| child(name, EntryKind::File))
            .chain(subdirs.iter().map(|&name| child(name, EntryKind::Directory)))
            .collect();
        self.dirs.insert(path.to_string(), entries);
        self
    }

    /// Script a readable text file
    #[must_use]
    pub fn text(mut self, path: &str, content: &str) -> Self {
        self.texts.insert(path.to_string(), content.to_string());
        self
    }

    /// Make a path fail with permission denied
    #[must_use]
    pub fn inaccessible(mut self, path: &str) -> Self {
        self.denied.insert(path.to_string());
        self
    }

    fn check_access(&self, path: &str) -> Result<(), FsError> {
        if self.denied.contains(path) {
            return Err(FsError::Io {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        Ok(())
    }
}

impl FileSystem for MockFs {
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.check_access(path)?;
        self.dirs.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn read_text(&self, path: &str) -> Result<String, FsError> {
        self.check_access(path)?;
        self.texts.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

/// Scripted transport that answers commands with canned JSON
///
/// Commands without a scripted reply answer `null`.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: HashMap<String, Value>,
    failures: HashMap<String, String>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reply(mut self, command: &str, value: Value) -> Self {
        self.replies.insert(command.to_string(), value);
        self
    }

    #[must_use]
    pub fn fail(mut self, command: &str, message: &str) -> Self {
        self.failures.insert(command.to_string(), message.to_string());
        self
    }

    /// Every `(command, args)` pair received, in order
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }
}

impl Transport for MockTransport {
    async fn invoke(&self, command: &str, args: Value) -> RemoteResult<Value> {
        self.calls.borrow_mut().push((command.to_string(), args));
        if let Some(message) = self.failures.get(command) {
            return Err(RemoteCallError::Remote(message.clone()));
        }
        Ok(self.replies.get(command).cloned().unwrap_or(Value::Null))
    }
}

/// Scripted remote index
///
/// Every search variant answers with the same scripted path list. The tag
/// catalog is stateful: `create_tag` appends to it. Each call is logged as
/// `(command, subject)` where the subject is the query text, tag name or
/// image path the call was about.
#[derive(Debug, Default)]
pub struct MockClient {
    search_result: Vec<String>,
    search_gate: Option<Arc<Notify>>,
    failing_commands: HashMap<&'static str, String>,
    failing_paths: HashMap<String, String>,
    parameters: HashMap<String, String>,
    image_tags: HashMap<String, Vec<String>>,
    catalog: RefCell<Vec<String>>,
    saved: RefCell<Vec<Vec<String>>>,
    calls: RefCell<Vec<(&'static str, String)>>,
}

impl MockClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search_result(mut self, paths: &[&str]) -> Self {
        self.search_result = paths.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Fail all three search commands
    #[must_use]
    pub fn fail_searches(self, message: &str) -> Self {
        self.fail_command(commands::SEARCH_IMAGES, message)
            .fail_command(commands::SEARCH_WITH_TAGS, message)
            .fail_command(commands::SEARCH_WITH_TAGS_ADVANCED, message)
    }

    /// Hold every search until the gate is notified
    #[must_use]
    pub fn gate_searches(mut self, gate: Arc<Notify>) -> Self {
        self.search_gate = Some(gate);
        self
    }

    #[must_use]
    pub fn fail_command(mut self, command: &'static str, message: &str) -> Self {
        self.failing_commands.insert(command, message.to_string());
        self
    }

    /// Fail every per-image call for one path
    #[must_use]
    pub fn fail_path(mut self, path: &str, message: &str) -> Self {
        self.failing_paths.insert(path.to_string(), message.to_string());
        self
    }

    #[must_use]
    pub fn with_tags(self, tags: &[&str]) -> Self {
        *self.catalog.borrow_mut() = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, path: &str, parameters: &str) -> Self {
        self.parameters
            .insert(path.to_string(), parameters.to_string());
        self
    }

    #[must_use]
    pub fn with_image_tags(mut self, path: &str, tags: &[&str]) -> Self {
        self.image_tags.insert(
            path.to_string(),
            tags.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    /// Every path list passed to `save`, in order
    #[must_use]
    pub fn saved(&self) -> Vec<Vec<String>> {
        self.saved.borrow().clone()
    }

    /// Subjects of every call to `command`, in order
    #[must_use]
    pub fn calls_to(&self, command: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(name, _)| *name == command)
            .map(|(_, subject)| subject.clone())
            .collect()
    }

    fn record(&self, command: &'static str, subject: &str) -> RemoteResult<()> {
        self.calls.borrow_mut().push((command, subject.to_string()));
        if let Some(message) = self.failing_commands.get(command) {
            return Err(RemoteCallError::Remote(message.clone()));
        }
        if let Some(message) = self.failing_paths.get(subject) {
            return Err(RemoteCallError::Remote(message.clone()));
        }
        Ok(())
    }

    async fn searched(&self, command: &'static str, subject: &str) -> RemoteResult<Vec<String>> {
        if let Some(gate) = &self.search_gate {
            gate.notified().await;
        }
        self.record(command, subject)?;
        Ok(self.search_result.clone())
    }
}

impl QueryClient for MockClient {
    async fn search(&self, text: &str) -> RemoteResult<Vec<String>> {
        self.searched(commands::SEARCH_IMAGES, text).await
    }

    async fn search_by_tags(&self, tags: &[String]) -> RemoteResult<Vec<String>> {
        self.searched(commands::SEARCH_WITH_TAGS, &tags.join(","))
            .await
    }

    async fn search_by_tags_advanced(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> RemoteResult<Vec<String>> {
        let subject = format!("+{} -{}", positive.join(","), negative.join(","));
        self.searched(commands::SEARCH_WITH_TAGS_ADVANCED, &subject)
            .await
    }

    async fn save(&self, paths: &[String]) -> RemoteResult<String> {
        self.record(commands::SAVE_IMAGES, &paths.len().to_string())?;
        self.saved.borrow_mut().push(paths.to_vec());
        Ok(format!("saved {}", paths.len()))
    }

    async fn list_tags(&self) -> RemoteResult<Vec<String>> {
        self.record(commands::GET_TAGS, "")?;
        Ok(self.catalog.borrow().clone())
    }

    async fn create_tag(&self, name: &str) -> RemoteResult<Vec<String>> {
        self.record(commands::CREATE_TAG, name)?;
        let mut catalog = self.catalog.borrow_mut();
        catalog.push(name.to_string());
        Ok(catalog.clone())
    }

    async fn attach_tag(&self, path: &str, _tag: &str) -> RemoteResult<()> {
        self.record(commands::ADD_TAG_TO_IMAGE, path)
    }

    async fn detach_tag(&self, path: &str, _tag: &str) -> RemoteResult<()> {
        self.record(commands::REMOVE_TAG_FROM_IMAGE, path)
    }

    async fn auto_tag(&self, tag: &str, _paths: &[String], _strict: bool) -> RemoteResult<()> {
        self.record(commands::AUTO_TAG, tag)
    }

    async fn extract_parameters(&self, path: &str) -> RemoteResult<String> {
        self.record(commands::READ_PARAMETERS, path)?;
        Ok(self.parameters.get(path).cloned().unwrap_or_default())
    }

    async fn extract_tags(&self, path: &str) -> RemoteResult<Vec<String>> {
        self.record(commands::READ_TAGS, path)?;
        Ok(self.image_tags.get(path).cloned().unwrap_or_default())
    }
}

/// Picker that returns a predetermined answer
#[derive(Debug, Clone, Default)]
pub struct MockPicker {
    /// Answer for every pick; `None` simulates a cancelled dialog
    pub answer: Option<String>,
}

impl MockPicker {
    #[must_use]
    pub fn new(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
        }
    }

    /// Create a picker that simulates the user closing the dialog
    #[must_use]
    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl Picker for MockPicker {
    async fn pick_file(&self, _filter: &FileFilter) -> Option<String> {
        self.answer.clone()
    }

    async fn pick_directory(&self) -> Option<String> {
        self.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fs_listing_order() {
        let fs = MockFs::new().dir("/d", &["a.png", "b.png"], &["sub"]);
        let entries = fs.list_dir("/d").await.unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "sub"]);
        assert!(entries[2].is_dir());
        assert_eq!(entries[2].path, "/d/sub");
    }

    #[tokio::test]
    async fn test_mock_fs_missing_and_denied() {
        let fs = MockFs::new().dir("/d", &[], &[]).inaccessible("/d");
        assert!(fs.list_dir("/d").await.is_err());
        assert!(fs.read_text("/nope.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_call_log() {
        let client = MockClient::new().fail_path("/bad.png", "nope");
        client.attach_tag("/ok.png", "t").await.unwrap();
        assert!(client.attach_tag("/bad.png", "t").await.is_err());

        assert_eq!(
            client.calls_to(commands::ADD_TAG_TO_IMAGE),
            vec!["/ok.png", "/bad.png"]
        );
    }

    #[tokio::test]
    async fn test_mock_picker() {
        assert_eq!(
            MockPicker::new("/x").pick_text_file().await.as_deref(),
            Some("/x")
        );
        assert_eq!(MockPicker::cancelled().pick_directory().await, None);
    }
}
