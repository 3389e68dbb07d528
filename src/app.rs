use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config::{Config, PostsStorage};
use crate::error::{Error, Result};
use crate::github::GithubContents;

/// 应用程序上下文
///
/// [`App`] 持有共享配置和配置文件路径，按当前配置构造绑定仓库的
/// [`GithubContents`]，提供统一访问入口。配置是显式传入的对象，
/// 不读取任何全局状态。
#[derive(Clone)]
pub struct App {
    config: Arc<RwLock<Config>>,
    config_path: Arc<PathBuf>,
}

impl App {
    /// 创建一个新的 [`App`] 实例
    pub fn new(config: Config, config_path: impl Into<PathBuf>) -> App {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path: Arc::new(config_path.into()),
        }
    }

    /// 读取当前配置的一个快照
    pub fn config(&self) -> Config {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// 修改配置并持久化到配置文件
    pub fn update_config(&self, f: impl FnOnce(&mut Config)) -> Result<()> {
        let mut config = self.config.write().expect("config lock poisoned");
        f(&mut config);
        config.save(self.config_path.as_ref())
    }

    /// 文章存储策略
    pub fn posts_storage(&self) -> PostsStorage {
        self.config.read().expect("config lock poisoned").posts_storage
    }

    /// 按当前配置构造仓库客户端
    ///
    /// 未配置时直接返回 [`Error::NotConfigured`]，不发起任何网络请求。
    pub fn contents(&self) -> Result<GithubContents> {
        let config = self.config.read().expect("config lock poisoned");

        let token = config.token.as_deref().ok_or(Error::NotConfigured)?;
        let (owner, repo) = config.repo_info()?;

        GithubContents::new(token, owner, repo)
    }
}
