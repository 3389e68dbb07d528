use serde::Deserialize;
use serde_json::Value;

use crate::content::Category;
use crate::error::{Error, Result};

use super::{FileStore, read_json, write_json};

const CATEGORIES_JSON: &str = "src/data/categories.json";

/// 分类更新字段，缺省的字段保持原值。
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
}

/// 分类集合，单个 JSON 文件整读整写。
///
/// 历史文件可能是纯字符串数组（只有分类名），读取时归一化为
/// [`Category`] 对象；写回固定用对象形式。
pub struct CategoryStore<S> {
    store: S,
}

impl<S: FileStore> CategoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 全部分类，可见的在前，组内按名称排序。
    pub async fn list(&self) -> Result<Vec<Category>> {
        let raw = read_json::<Value, _>(&self.store, CATEGORIES_JSON)
            .await?
            .unwrap_or(Value::Array(Vec::new()));

        let mut categories = normalize(raw)?;
        Category::sort(&mut categories);
        Ok(categories)
    }

    /// 新建分类，名字已存在时静默跳过。
    pub async fn create(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("category name must not be empty"));
        }

        let mut categories = self.list().await?;
        if categories.iter().any(|c| c.name == name) {
            return Ok(());
        }

        categories.push(Category::new(name));
        self.save(&categories, &format!("Create category: {}", name))
            .await
    }

    /// 重命名或改可见性。
    ///
    /// 改名时 `id` 跟随新名字；不检查新名字是否与现有分类冲突。
    pub async fn update(&self, id: &str, patch: CategoryPatch) -> Result<()> {
        let mut categories = self.list().await?;

        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound)?;

        if let Some(name) = patch.name {
            category.id = name.clone();
            category.name = name;
        }
        if let Some(visible) = patch.visible {
            category.visible = visible;
        }

        self.save(&categories, &format!("Update category: {}", id))
            .await
    }

    /// 删除分类。
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut categories = self.list().await?;

        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(Error::NotFound);
        }

        self.save(&categories, &format!("Delete category: {}", id))
            .await
    }

    async fn save(&self, categories: &[Category], message: &str) -> Result<()> {
        write_json(&self.store, CATEGORIES_JSON, &categories, message).await?;
        Ok(())
    }
}

fn normalize(raw: Value) -> Result<Vec<Category>> {
    let Value::Array(items) = raw else {
        return Err(Error::FormatError("categories file must be a json array"));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(Category::new(name)),
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            _ => Err(Error::FormatError(
                "category entry must be a string or an object",
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::store::testing::MemoryStore;

    use super::*;

    fn store() -> CategoryStore<MemoryStore> {
        CategoryStore::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_list_normalizes_legacy_string_array() {
        let s = store();
        s.store
            .insert(CATEGORIES_JSON, br#"["filosofia", "estoicismo"]"#);

        let categories = s.list().await.expect("列表失败");
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.visible));
        assert_eq!(categories[0].id, categories[0].name);
    }

    #[tokio::test]
    async fn test_create_skips_existing_name() {
        let s = store();
        s.create("rust").await.expect("创建失败");
        s.create("rust").await.expect("重复创建应静默跳过");

        assert_eq!(s.list().await.expect("列表失败").len(), 1);
    }

    #[tokio::test]
    async fn test_update_rekeys_id_on_rename() {
        let s = store();
        s.create("old-name").await.expect("创建失败");

        s.update(
            "old-name",
            CategoryPatch {
                name: Some("new-name".to_string()),
                visible: Some(false),
            },
        )
        .await
        .expect("更新失败");

        let categories = s.list().await.expect("列表失败");
        assert_eq!(categories[0].id, "new-name");
        assert_eq!(categories[0].name, "new-name");
        assert!(!categories[0].visible);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let s = store();
        assert!(matches!(
            s.delete("missing").await,
            Err(Error::NotFound)
        ));
    }
}
