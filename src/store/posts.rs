use chrono::Utc;
use futures::future::try_join_all;

use crate::config::PostsStorage;
use crate::content::{Post, parse_date};
use crate::error::{Error, Result};

use super::{FileStore, read_json, write_json};

const POSTS_JSON: &str = "src/data/posts.json";
const POSTS_DIR: &str = "content/posts";

/// 文章集合。
///
/// 两种存储策略共用同一套接口和同一个规范的 [`Post`] 表示：
///
/// - [`PostsStorage::Json`]：整个集合是一个 JSON 数组文件，
///   每次变更整读整写
/// - [`PostsStorage::Markdown`]：每篇文章一个带 front matter 的
///   Markdown 文件，文件名由 slug 决定
///
/// 寻址统一用 slug；JSON 模式下历史数据可能没有 slug，此时退回
/// 按 id 匹配。
pub struct PostStore<S> {
    store: S,
    storage: PostsStorage,
}

impl<S: FileStore> PostStore<S> {
    pub fn new(store: S, storage: PostsStorage) -> Self {
        Self { store, storage }
    }

    /// 全量文章列表，按日期倒序。
    pub async fn list(&self) -> Result<Vec<Post>> {
        let mut posts = match self.storage {
            PostsStorage::Json => read_json::<Vec<Post>, _>(&self.store, POSTS_JSON)
                .await?
                .unwrap_or_default(),
            PostsStorage::Markdown => self.list_markdown().await?,
        };

        posts.sort_by_key(|p| std::cmp::Reverse(parse_date(&p.date)));
        Ok(posts)
    }

    /// 按 slug（或 id）获取单篇文章。
    pub async fn get(&self, key: &str) -> Result<Post> {
        self.list()
            .await?
            .into_iter()
            .find(|p| matches_key(p, key))
            .ok_or(Error::NotFound)
    }

    /// 新建文章，返回其 slug。
    pub async fn create(&self, mut post: Post) -> Result<String> {
        let slug = post.slug_or_generated();
        if slug.is_empty() {
            return Err(Error::Validation("post title produces an empty slug"));
        }
        post.slug = Some(slug.clone());

        match self.storage {
            PostsStorage::Json => {
                let mut posts = read_json::<Vec<Post>, _>(&self.store, POSTS_JSON)
                    .await?
                    .unwrap_or_default();

                post.id = Some(Utc::now().timestamp_millis().to_string());
                post.created_at = Some(Utc::now().to_rfc3339());
                let message = format!("Create post: {}", post.title);
                posts.insert(0, post);

                write_json(&self.store, POSTS_JSON, &posts, &message).await?;
            }
            PostsStorage::Markdown => {
                let path = markdown_path(&slug);
                let message = format!("Create post: {}", post.title);

                // 新建不带 token，文件已存在会被远端拒绝
                self.store
                    .write(&path, post.to_markdown().as_bytes(), &message, None)
                    .await?;
            }
        }

        Ok(slug)
    }

    /// 整体覆盖一篇文章，返回其 slug。
    pub async fn update(&self, key: &str, mut post: Post) -> Result<String> {
        match self.storage {
            PostsStorage::Json => {
                let mut posts = read_json::<Vec<Post>, _>(&self.store, POSTS_JSON)
                    .await?
                    .unwrap_or_default();

                let current = posts
                    .iter_mut()
                    .find(|p| matches_key(p, key))
                    .ok_or(Error::NotFound)?;

                // id 和创建时间从旧值继承
                post.id = current.id.clone();
                post.created_at = current.created_at.clone();
                if post.slug.is_none() {
                    post.slug = current.slug.clone();
                }
                let slug = post.slug_or_generated();
                post.slug = Some(slug.clone());

                let message = format!("Update post: {}", post.title);
                *current = post;

                write_json(&self.store, POSTS_JSON, &posts, &message).await?;
                Ok(slug)
            }
            PostsStorage::Markdown => {
                let slug = match post.slug.as_deref() {
                    Some(s) if !s.is_empty() => s.to_string(),
                    _ => key.to_string(),
                };
                post.slug = Some(slug.clone());

                let path = markdown_path(&slug);
                // slug 变化时旧文件拿不到 token，等价于新建
                let sha = self.store.read(&path).await?.map(|f| f.sha);
                let message = format!("Update post: {}", post.title);

                self.store
                    .write(
                        &path,
                        post.to_markdown().as_bytes(),
                        &message,
                        sha.as_deref(),
                    )
                    .await?;
                Ok(slug)
            }
        }
    }

    /// 删除一篇文章。
    ///
    /// Markdown 模式尚未实现删除，保持与界面约定一致返回
    /// [`Error::Unsupported`]。
    pub async fn delete(&self, key: &str) -> Result<()> {
        match self.storage {
            PostsStorage::Json => {
                let mut posts = read_json::<Vec<Post>, _>(&self.store, POSTS_JSON)
                    .await?
                    .unwrap_or_default();

                let before = posts.len();
                posts.retain(|p| !matches_key(p, key));
                if posts.len() == before {
                    return Err(Error::NotFound);
                }

                let message = format!("Delete post: {}", key);
                write_json(&self.store, POSTS_JSON, &posts, &message).await?;
                Ok(())
            }
            PostsStorage::Markdown => {
                Err(Error::Unsupported("delete is not implemented for markdown posts"))
            }
        }
    }

    async fn list_markdown(&self) -> Result<Vec<Post>> {
        let entries = self.store.list(POSTS_DIR).await?;

        let fetches = entries
            .into_iter()
            .filter(|e| e.name.ends_with(".md"))
            .map(|entry| async move {
                let file = self
                    .store
                    .read(&entry.path)
                    .await?
                    .ok_or(Error::NotFound)?;
                let raw = String::from_utf8(file.content)
                    .map_err(|_| Error::FormatError("post file is not valid utf-8"))?;

                let slug = entry.name.trim_end_matches(".md");
                Post::from_markdown(&raw, slug, &file.sha)
            });

        try_join_all(fetches).await
    }
}

fn matches_key(post: &Post, key: &str) -> bool {
    post.slug.as_deref() == Some(key) || post.id.as_deref() == Some(key)
}

fn markdown_path(slug: &str) -> String {
    format!("{}/{}.md", POSTS_DIR, slug)
}
