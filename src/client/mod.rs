//! Query client for the remote index
//!
//! The remote index owns persistence, tag storage, search and tag inference.
//! This module is the thin request/response boundary in front of it:
//!
//! - [`QueryClient`]: the operations the gallery and tag stores rely on
//! - [`Transport`]: one raw command round trip carrying JSON arguments
//! - [`CommandClient`]: implements `QueryClient` over any `Transport` using the
//!   index's command names and argument keys
//!
//! The client performs no local evaluation: results are returned exactly as
//! the remote side sent them, and no call is retried.

mod error;
pub mod http;

pub use error::RemoteCallError;
pub use http::HttpTransport;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

type Result<T> = std::result::Result<T, RemoteCallError>;

/// Command names understood by the remote index
pub mod commands {
    pub const READ_PARAMETERS: &str = "read_parameters";
    pub const READ_TAGS: &str = "read_tags";
    pub const SAVE_IMAGES: &str = "save_images";
    pub const SEARCH_IMAGES: &str = "search_images";
    pub const SEARCH_WITH_TAGS: &str = "search_with_tags";
    pub const SEARCH_WITH_TAGS_ADVANCED: &str = "search_with_tags_advanced";
    pub const CREATE_TAG: &str = "create_tag";
    pub const GET_TAGS: &str = "get_tags";
    pub const AUTO_TAG: &str = "auto_tag";
    pub const ADD_TAG_TO_IMAGE: &str = "add_tag_to_image";
    pub const REMOVE_TAG_FROM_IMAGE: &str = "remove_tag_from_image";
}

/// Operations offered by the remote index
///
/// Paths are plain strings and are the identity of an image on the remote side.
pub trait QueryClient {
    /// Free-text search
    async fn search(&self, text: &str) -> Result<Vec<String>>;

    /// Search for images carrying the given tags (match semantics are remote)
    async fn search_by_tags(&self, tags: &[String]) -> Result<Vec<String>>;

    /// Images tagged with every `positive` tag and none of the `negative` ones
    async fn search_by_tags_advanced(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> Result<Vec<String>>;

    /// Persist the working set, returning the remote confirmation text
    async fn save(&self, paths: &[String]) -> Result<String>;

    /// Full tag catalog
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// Create a tag, returning the updated catalog
    async fn create_tag(&self, name: &str) -> Result<Vec<String>>;

    async fn attach_tag(&self, path: &str, tag: &str) -> Result<()>;

    async fn detach_tag(&self, path: &str, tag: &str) -> Result<()>;

    /// Ask the index to tag matching images automatically
    ///
    /// `strict` raises the matching threshold (fewer automatic matches).
    async fn auto_tag(&self, tag: &str, paths: &[String], strict: bool) -> Result<()>;

    /// Generation parameters embedded in one file
    async fn extract_parameters(&self, path: &str) -> Result<String>;

    /// Tags the index holds for one file
    async fn extract_tags(&self, path: &str) -> Result<Vec<String>>;
}

/// A single command round trip to the remote index
pub trait Transport {
    /// Send `command` with a JSON object of arguments and return the JSON reply
    ///
    /// # Errors
    ///
    /// Returns `RemoteCallError` on transport failure or a remote-side error.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value>;
}

#[derive(Serialize)]
struct NoArgs {}

#[derive(Serialize)]
struct SrcArgs<'a> {
    src: &'a str,
}

#[derive(Serialize)]
struct ImagesArgs<'a> {
    images: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryArgs<'a> {
    query_text: &'a str,
}

#[derive(Serialize)]
struct TagsArgs<'a> {
    tags: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedArgs<'a> {
    positive_tags: &'a [String],
    negative_tags: &'a [String],
}

#[derive(Serialize)]
struct TagArgs<'a> {
    tag: &'a str,
}

#[derive(Serialize)]
struct AutoTagArgs<'a> {
    tag: &'a str,
    images: &'a [String],
    strict: bool,
}

#[derive(Serialize)]
struct ImageTagArgs<'a> {
    image: &'a str,
    tag: &'a str,
}

/// [`QueryClient`] speaking the index's command protocol over a [`Transport`]
#[derive(Debug, Clone)]
pub struct CommandClient<T> {
    transport: T,
}

impl<T: Transport> CommandClient<T> {
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<A, R>(&self, command: &str, args: &A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let args = serde_json::to_value(args).map_err(|e| RemoteCallError::Encode {
            command: command.to_string(),
            reason: e.to_string(),
        })?;
        debug!(command, "invoking remote command");
        let reply = self.transport.invoke(command, args).await?;
        serde_json::from_value(reply).map_err(|e| RemoteCallError::Decode {
            command: command.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T: Transport> QueryClient for CommandClient<T> {
    async fn search(&self, text: &str) -> Result<Vec<String>> {
        self.call(commands::SEARCH_IMAGES, &QueryArgs { query_text: text })
            .await
    }

    async fn search_by_tags(&self, tags: &[String]) -> Result<Vec<String>> {
        self.call(commands::SEARCH_WITH_TAGS, &TagsArgs { tags }).await
    }

    async fn search_by_tags_advanced(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> Result<Vec<String>> {
        let args = AdvancedArgs {
            positive_tags: positive,
            negative_tags: negative,
        };
        self.call(commands::SEARCH_WITH_TAGS_ADVANCED, &args).await
    }

    async fn save(&self, paths: &[String]) -> Result<String> {
        self.call(commands::SAVE_IMAGES, &ImagesArgs { images: paths })
            .await
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        self.call(commands::GET_TAGS, &NoArgs {}).await
    }

    async fn create_tag(&self, name: &str) -> Result<Vec<String>> {
        self.call(commands::CREATE_TAG, &TagArgs { tag: name }).await
    }

    async fn attach_tag(&self, path: &str, tag: &str) -> Result<()> {
        self.call(commands::ADD_TAG_TO_IMAGE, &ImageTagArgs { image: path, tag })
            .await
    }

    async fn detach_tag(&self, path: &str, tag: &str) -> Result<()> {
        self.call(
            commands::REMOVE_TAG_FROM_IMAGE,
            &ImageTagArgs { image: path, tag },
        )
        .await
    }

    async fn auto_tag(&self, tag: &str, paths: &[String], strict: bool) -> Result<()> {
        let args = AutoTagArgs {
            tag,
            images: paths,
            strict,
        };
        self.call(commands::AUTO_TAG, &args).await
    }

    async fn extract_parameters(&self, path: &str) -> Result<String> {
        self.call(commands::READ_PARAMETERS, &SrcArgs { src: path })
            .await
    }

    async fn extract_tags(&self, path: &str) -> Result<Vec<String>> {
        self.call(commands::READ_TAGS, &SrcArgs { src: path }).await
    }
}
