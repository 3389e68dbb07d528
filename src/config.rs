use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 文章存储策略。
///
/// - `Json`：整个集合存在一个 JSON 数组文件里
/// - `Markdown`：每篇文章一个带 front matter 的 Markdown 文件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostsStorage {
    Json,
    #[default]
    Markdown,
}

/// 本地持久化配置。
///
/// 两个凭证槽位（token 和 `owner/repo` 仓库标识）加上文章存储策略，
/// 序列化为一个 TOML 文件。配置对象由 [`crate::app::App`] 持有并显式传递，
/// 不存在全局可变状态。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub token: Option<String>,
    pub repo: Option<String>,

    #[serde(default)]
    pub posts_storage: PostsStorage,
}

impl Config {
    /// 从 TOML 文件加载配置，文件不存在视为空配置。
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 把当前配置写回 TOML 文件。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|_| Error::FormatError("failed to serialize config"))?;
        Ok(fs::write(path, content)?)
    }

    /// 保存 token 和仓库标识。
    ///
    /// 仓库标识接受 `owner/repo`，也接受完整 URL
    /// （`https://github.com/owner/repo.git`），会归一化为 `owner/repo`。
    /// token 格式只做宽松检查，不匹配已知前缀仅告警，不报错。
    pub fn configure(&mut self, token: impl Into<String>, repo_url: &str) {
        let token = token.into();
        if !token.starts_with("ghp_") && !token.starts_with("github_pat_") {
            tracing::warn!("token does not look like a github personal access token");
        }

        let repo = repo_url
            .trim()
            .trim_start_matches("https://github.com/")
            .trim_end_matches('/')
            .trim_end_matches(".git")
            .to_string();

        self.token = Some(token);
        self.repo = Some(repo);
    }

    /// token 和仓库标识是否都已配置。
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.repo.is_some()
    }

    /// 清空凭证。
    pub fn logout(&mut self) {
        self.token = None;
        self.repo = None;
    }

    /// 拆分仓库标识为 `(owner, repo)`。
    pub fn repo_info(&self) -> Result<(&str, &str)> {
        let repo = self.repo.as_deref().ok_or(Error::NotConfigured)?;
        repo.split_once('/')
            .ok_or(Error::FormatError("repository identifier must be owner/repo"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_normalizes_repo_url() {
        let mut config = Config::default();
        config.configure("ghp_xxx", "https://github.com/alice/blog.git");

        assert_eq!(config.repo.as_deref(), Some("alice/blog"));
        assert_eq!(config.repo_info().unwrap(), ("alice", "blog"));
    }

    #[test]
    fn test_is_configured_lifecycle() {
        let mut config = Config::default();
        assert!(!config.is_configured());

        config.token = Some("ghp_xxx".into());
        // 只有 token 不算配置完成
        assert!(!config.is_configured());

        config.configure("ghp_xxx", "alice/blog");
        assert!(config.is_configured());

        config.logout();
        assert!(!config.is_configured());
        assert!(config.repo_info().is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let config = Config::load(dir.path().join("gitcms.toml")).expect("加载失败");

        assert!(!config.is_configured());
        assert_eq!(config.posts_storage, PostsStorage::Markdown);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("gitcms.toml");

        let mut config = Config {
            posts_storage: PostsStorage::Json,
            ..Default::default()
        };
        config.configure("ghp_xxx", "alice/blog");
        config.save(&path).expect("保存失败");

        let reloaded = Config::load(&path).expect("加载失败");
        assert!(reloaded.is_configured());
        assert_eq!(reloaded.repo.as_deref(), Some("alice/blog"));
        assert_eq!(reloaded.posts_storage, PostsStorage::Json);
    }
}
