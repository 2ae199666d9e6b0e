//! File and directory pickers
//!
//! A picker asks the user for a path. `None` means the user cancelled, which
//! callers treat as a no-op rather than an error.

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use crate::scanner::MEDIA_EXTENSIONS;

/// Named set of accepted file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const IMAGES: Self = Self {
        name: "Images",
        extensions: &MEDIA_EXTENSIONS,
    };

    pub const TEXT: Self = Self {
        name: "Text",
        extensions: &["txt"],
    };

    /// Whether the path's extension is in the filter, ignoring case
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        path.rsplit_once('.').is_some_and(|(_, ext)| {
            self.extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }
}

/// User-interactive path selection
pub trait Picker {
    async fn pick_file(&self, filter: &FileFilter) -> Option<String>;

    async fn pick_directory(&self) -> Option<String>;

    /// Pick a log file for import
    async fn pick_text_file(&self) -> Option<String> {
        self.pick_file(&FileFilter::TEXT).await
    }
}

/// Picker that asks for a path on the terminal
///
/// An empty answer cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptPicker;

impl PromptPicker {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn ask(prompt: String, filter: Option<FileFilter>) -> Option<String> {
        let answer = tokio::task::spawn_blocking(move || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), String> {
                    match filter {
                        Some(filter) if !input.is_empty() && !filter.accepts(input) => Err(
                            format!("expected one of: {}", filter.extensions.join(", ")),
                        ),
                        _ => Ok(()),
                    }
                })
                .interact_text()
        })
        .await;

        match answer {
            Ok(Ok(path)) => {
                let path = path.trim();
                (!path.is_empty()).then(|| path.to_string())
            }
            Ok(Err(e)) => {
                warn!(error = %e, "prompt failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "prompt task failed");
                None
            }
        }
    }
}

impl Picker for PromptPicker {
    async fn pick_file(&self, filter: &FileFilter) -> Option<String> {
        Self::ask(format!("{} file (empty to cancel)", filter.name), Some(*filter)).await
    }

    async fn pick_directory(&self) -> Option<String> {
        Self::ask("Directory (empty to cancel)".to_string(), None).await
    }
}
