mod categories;
mod posts;
mod settings;

pub use categories::{CategoryPatch, CategoryStore};
pub use posts::PostStore;
pub use settings::SettingsStore;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

/// 远端读到的一个文件：解码后的字节内容和 revision token。
///
/// token（即 Contents API 的 sha）标识读取时刻的精确字节内容，
/// 覆盖写入时必须带上它，缺失表示文件尚不存在。
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: Vec<u8>,
    pub sha: String,
}

/// 目录枚举出的一个条目。
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
}

/// 远端文件存储的原语接口。
///
/// 集合层只依赖这三个操作。生产实现是
/// [`crate::github::GithubContents`]，测试用 [`testing::MemoryStore`]。
pub trait FileStore: Send + Sync {
    /// 读取文件，不存在返回 `None`。
    fn read(&self, path: &str)
    -> impl std::future::Future<Output = Result<Option<RemoteFile>>> + Send;

    /// 枚举目录下的文件，目录不存在返回空列表。
    fn list(&self, dir: &str)
    -> impl std::future::Future<Output = Result<Vec<FileEntry>>> + Send;

    /// 提交一次写入，返回新的 revision token。
    ///
    /// 更新已有文件必须带上读到的 `sha`，token 过期远端会拒绝
    /// （[`crate::error::Error::Conflict`]），这里不做重试。
    fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 读取并解析一个 JSON 文件，404 视为 `None`。
pub async fn read_json<T, S>(store: &S, path: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: FileStore,
{
    match store.read(path).await? {
        Some(file) => Ok(Some(serde_json::from_slice(&file.content)?)),
        None => Ok(None),
    }
}

/// 序列化并提交一个 JSON 文件。
///
/// 提交前重新读取一次当前 token（文件不存在视为新建，不是错误），
/// 与读取集合内容是两次独立请求。这意味着基于过期内存状态的整写
/// 依然能成功提交，并发写者之间 last-writer-wins，集合层不做协调。
pub async fn write_json<T, S>(store: &S, path: &str, value: &T, message: &str) -> Result<String>
where
    T: Serialize,
    S: FileStore,
{
    let sha = store.read(path).await?.map(|f| f.sha);
    let content = serde_json::to_vec_pretty(value)?;
    store.write(path, &content, message, sha.as_deref()).await
}


#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::{Error, Result};

    use super::{FileEntry, FileStore, RemoteFile};

    /// 内存版 [`FileStore`]，模拟 Contents API 的 token 语义：
    /// 每次成功写入轮换 token，带过期 token 的写入被拒绝。
    #[derive(Default)]
    pub struct MemoryStore {
        files: Mutex<HashMap<String, (Vec<u8>, String)>>,
        seq: Mutex<u64>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn next_sha(&self) -> String {
            let mut seq = self.seq.lock().unwrap();
            *seq += 1;
            format!("sha-{}", seq)
        }

        pub fn raw(&self, path: &str) -> Option<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .map(|(content, _)| content.clone())
        }

        pub fn insert(&self, path: &str, content: &[u8]) {
            let sha = self.next_sha();
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), (content.to_vec(), sha));
        }
    }

    impl FileStore for MemoryStore {
        async fn read(&self, path: &str) -> Result<Option<RemoteFile>> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .get(path)
                .map(|(content, sha)| RemoteFile {
                    content: content.clone(),
                    sha: sha.clone(),
                }))
        }

        async fn list(&self, dir: &str) -> Result<Vec<FileEntry>> {
            let prefix = format!("{}/", dir.trim_end_matches('/'));
            let files = self.files.lock().unwrap();

            let mut entries: Vec<FileEntry> = files
                .iter()
                .filter(|(path, _)| path.starts_with(&prefix))
                .map(|(path, (_, sha))| FileEntry {
                    name: path.rsplit('/').next().unwrap_or(path).to_string(),
                    path: path.clone(),
                    sha: sha.clone(),
                })
                .collect();

            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        }

        async fn write(
            &self,
            path: &str,
            content: &[u8],
            _message: &str,
            sha: Option<&str>,
        ) -> Result<String> {
            let new_sha = self.next_sha();
            let mut files = self.files.lock().unwrap();

            match (files.get(path), sha) {
                (Some((_, current)), Some(given)) if current != given => {
                    return Err(Error::Conflict);
                }
                (Some(_), None) | (None, Some(_)) => return Err(Error::Conflict),
                _ => {}
            }

            files.insert(path.to_string(), (content.to_vec(), new_sha.clone()));
            Ok(new_sha)
        }
    }
}
