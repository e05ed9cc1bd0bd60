//! HDFS input through the WebHDFS REST gateway.
//!
//! Only the three read-side operations the importer needs are used:
//! `GETFILESTATUS`, `LISTSTATUS` and `OPEN`. `OPEN` answers with a redirect to
//! a datanode, which reqwest follows.

use super::{EntryKind, SourceEntry, SourceFs};
use crate::error::{CliError, ImportError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::{ParseError, Url};

/// Scheme recorded in image `source` metadata for HDFS inputs.
const SOURCE_SCHEME: &str = "webhdfs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum FileType {
    File,
    Directory,
    Symlink,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileStatus {
    path_suffix: String,
    #[serde(rename = "type")]
    kind: FileType,
}

#[derive(Debug, Deserialize)]
struct FileStatusResponse {
    #[serde(rename = "FileStatus")]
    file_status: FileStatus,
}

#[derive(Debug, Deserialize)]
struct FileStatusesResponse {
    #[serde(rename = "FileStatuses")]
    file_statuses: FileStatuses,
}

#[derive(Debug, Deserialize)]
struct FileStatuses {
    #[serde(rename = "FileStatus")]
    file_status: Vec<FileStatus>,
}

#[derive(Debug, Deserialize)]
struct RemoteExceptionResponse {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    exception: String,
    #[serde(default)]
    message: String,
}

/// WebHDFS client scoped to one namenode.
#[derive(Debug, Clone)]
pub struct WebHdfs {
    client: Client,
    base: Url,
    user: Option<String>,
}

impl WebHdfs {
    /// Creates a client for the namenode HTTP endpoint at `base_url`
    /// (e.g. `http://namenode:9870`).
    ///
    /// Without an explicit `user` the OS login user is used, as Hadoop's
    /// simple authentication does.
    pub fn new(base_url: &str, user: Option<String>) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(CliError::InvalidArguments {
                reason: format!("WebHDFS URL must be http(s)://host[:port], got {base_url}"),
            }
            .into());
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            user: user.or_else(login_user),
        })
    }

    /// Resolves a possibly relative HDFS path the way Hadoop does: relative
    /// paths live under the user's home directory.
    fn absolute_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            return path.to_string();
        }
        match &self.user {
            Some(user) => format!("/user/{user}/{path}"),
            None => format!("/{path}"),
        }
    }

    fn op_url(&self, path: &str, op: &str) -> Result<Url> {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            // the filesystem root is addressed as `/webhdfs/v1/`
            segments.push("");
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ImportError::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["webhdfs", "v1"])
            .extend(segments);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("op", op);
            if let Some(user) = &self.user {
                query.append_pair("user.name", user);
            }
        }
        Ok(url)
    }

    fn location(&self, path: &str) -> String {
        let host = self.base.host_str().unwrap_or_default();
        match self.base.port() {
            Some(port) => format!("{SOURCE_SCHEME}://{host}:{port}{path}"),
            None => format!("{SOURCE_SCHEME}://{host}{path}"),
        }
    }

    async fn get(&self, path: &str, op: &str) -> Result<reqwest::Response> {
        let url = self.op_url(path, op)?;
        log::debug!("WebHDFS {op} {url}");

        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(remote_error(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, op: &str) -> Result<T> {
        Ok(self.get(path, op).await?.json::<T>().await?)
    }

    async fn file_status(&self, path: &str) -> Result<FileStatus> {
        let response: FileStatusResponse = self.get_json(path, "GETFILESTATUS").await?;
        Ok(response.file_status)
    }

    async fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        let response: FileStatusesResponse = self.get_json(path, "LISTSTATUS").await?;
        Ok(response.file_statuses.file_status)
    }

    fn entry(&self, path: &str, kind: EntryKind) -> SourceEntry {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        SourceEntry {
            path: path.to_string(),
            location: self.location(path),
            name,
            kind,
        }
    }
}

impl SourceFs for WebHdfs {
    fn describe(&self) -> &'static str {
        "HDFS"
    }

    async fn walk(&self, root: &str) -> Result<Vec<SourceEntry>> {
        let root = self.absolute_path(root);

        let root_kind = match self.file_status(&root).await {
            Ok(status) => status.kind,
            Err(ImportError::RemoteFs { status: 404, .. }) => {
                log::debug!("{root} not found on HDFS");
                return Ok(vec![self.entry(&root, EntryKind::Other)]);
            }
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        let mut pending = vec![(root, root_kind)];

        while let Some((path, kind)) = pending.pop() {
            match kind {
                FileType::Directory => {
                    let mut children = self.list_status(&path).await?;
                    if children.is_empty() {
                        log::warn!("Did not find any files in the HDFS directory [{path}]");
                    }
                    children.sort_by(|a, b| a.path_suffix.cmp(&b.path_suffix));

                    // Reverse push so the smallest name pops first
                    for child in children.into_iter().rev() {
                        pending.push((join(&path, &child.path_suffix), child.kind));
                    }
                }
                FileType::File => entries.push(self.entry(&path, EntryKind::File)),
                FileType::Symlink => entries.push(self.entry(&path, EntryKind::Other)),
            }
        }

        Ok(entries)
    }

    async fn read(&self, entry: &SourceEntry) -> Result<Vec<u8>> {
        let bytes = self.get(&entry.path, "OPEN").await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// HDFS skips name the full location rather than the bare file name.
    fn unsupported_label(&self, entry: &SourceEntry) -> String {
        entry.location.clone()
    }
}

#[cfg(unix)]
fn login_user() -> Option<String> {
    users::get_current_username().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn login_user() -> Option<String> {
    None
}

fn join(parent: &str, child: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}

fn remote_error(status: StatusCode, body: &str) -> ImportError {
    match serde_json::from_str::<RemoteExceptionResponse>(body) {
        Ok(response) => ImportError::RemoteFs {
            status: status.as_u16(),
            exception: response.remote_exception.exception,
            message: response.remote_exception.message,
        },
        Err(_) => ImportError::RemoteFs {
            status: status.as_u16(),
            exception: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: body.trim().to_string(),
        },
    }
}
