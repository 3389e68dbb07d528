use axum::http::{HeaderMap, HeaderValue};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{FileEntry, FileStore, RemoteFile};

const GITHUB_API: &str = "https://api.github.com";

/// GithubContents 把一个 GitHub 仓库当作文件数据库使用。
///
/// 通过 Contents API 读写仓库里的文件，每次写入就是一次提交。
/// 读取时记下文件的 sha 作为 revision token，覆盖写入时带上它，
/// token 过期（文件已被别人改过）远端返回 409/422，映射为
/// [`Error::Conflict`]，不做重试和冲突合并。
#[derive(Clone)]
pub struct GithubContents {
    client: reqwest::Client,
    owner: String,
    repo: String,
}

impl GithubContents {
    /// 使用指定的 GitHub Token 绑定一个仓库。
    ///
    /// ```ignore
    /// let store = GithubContents::new("your_token", "alice", "blog")?;
    /// ```
    pub fn new(token: &str, owner: &str, repo: &str) -> Result<Self> {
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Validation("token contains invalid characters"))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::ACCEPT,
                    HeaderValue::from_static("application/vnd.github+json"),
                );
                headers.insert(
                    "X-GitHub-Api-Version",
                    HeaderValue::from_static("2022-11-28"),
                );
                headers.insert(header::AUTHORIZATION, auth);
                headers
            })
            .build()?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn content_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            GITHUB_API, self.owner, self.repo, path
        )
    }
}

#[derive(Deserialize)]
struct ContentFile {
    sha: String,
    content: String,
}

#[derive(Deserialize)]
struct DirEntry {
    name: String,
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    committer: Committer<'a>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

impl FileStore for GithubContents {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>> {
        let resp = self.client.get(self.content_url(path)).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let file: ContentFile = resp.error_for_status()?.json().await?;

        // Contents API 返回的 base64 带换行
        let encoded: String = file.content.split_whitespace().collect();
        let content = BASE64
            .decode(encoded)
            .map_err(|_| Error::FormatError("invalid base64 in contents response"))?;

        Ok(Some(RemoteFile {
            content,
            sha: file.sha,
        }))
    }

    async fn list(&self, dir: &str) -> Result<Vec<FileEntry>> {
        let resp = self.client.get(self.content_url(dir)).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let entries: Vec<DirEntry> = resp.error_for_status()?.json().await?;

        Ok(entries
            .into_iter()
            .filter(|e| e.kind == "file")
            .map(|e| FileEntry {
                name: e.name,
                path: e.path,
                sha: e.sha,
            })
            .collect())
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<String> {
        let body = PutRequest {
            message,
            content: BASE64.encode(content),
            sha,
            committer: Committer {
                name: "gitcms",
                email: "gitcms@cms.local",
            },
        };

        let resp = self
            .client
            .put(self.content_url(path))
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(Error::Conflict),
            _ => {
                let resp: PutResponse = resp.error_for_status()?.json().await?;
                Ok(resp.content.sha)
            }
        }
    }
}
