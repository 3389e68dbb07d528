use serde_json::{Map, Value};

use crate::content::Settings;
use crate::error::Result;

use super::{FileStore, read_json, write_json};

const SETTINGS_JSON: &str = "src/data/settings.json";

/// 站点设置，单例 JSON 文档。
pub struct SettingsStore<S> {
    store: S,
}

impl<S: FileStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 读取设置，文件不存在时返回默认值。
    pub async fn get(&self) -> Result<Settings> {
        Ok(read_json::<Settings, _>(&self.store, SETTINGS_JSON)
            .await?
            .unwrap_or_default())
    }

    /// 浅合并一组字段并写回。
    pub async fn update(&self, patch: Map<String, Value>) -> Result<Settings> {
        let mut settings = self.get().await?;
        settings.merge(patch);

        write_json(&self.store, SETTINGS_JSON, &settings, "Update settings").await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::store::testing::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_get_missing_file_returns_defaults() {
        let s = SettingsStore::new(MemoryStore::new());
        let settings = s.get().await.expect("读取失败");

        assert_eq!(settings.site_title, "O CAMINHO DO HOMEM");
        assert!(settings.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_persists() {
        let s = SettingsStore::new(MemoryStore::new());

        let Value::Object(patch) = json!({"siteTitle": "New"}) else {
            unreachable!()
        };
        s.update(patch).await.expect("更新失败");

        let settings = s.get().await.expect("读取失败");
        assert_eq!(settings.site_title, "New");
        assert_eq!(settings.site_subtitle, "FILOSOFIA APLICADA");
        assert!(settings.updated_at.is_some());
    }
}
