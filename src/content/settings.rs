use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 站点全局设置，单例文档。
///
/// 标题和副标题是固定字段，其余键保留在开放的扁平映射里，
/// 更新是浅合并。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_site_title")]
    pub site_title: String,

    #[serde(default = "default_site_subtitle")]
    pub site_subtitle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_site_title() -> String {
    "O CAMINHO DO HOMEM".to_string()
}

fn default_site_subtitle() -> String {
    "FILOSOFIA APLICADA".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            site_subtitle: default_site_subtitle(),
            updated_at: None,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// 浅合并一组字段并盖上更新时间戳。
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            match key.as_str() {
                "siteTitle" => {
                    if let Value::String(s) = value {
                        self.site_title = s;
                    }
                }
                "siteSubtitle" => {
                    if let Value::String(s) = value {
                        self.site_subtitle = s;
                    }
                }
                "updatedAt" => {}
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }

        self.updated_at = Some(Utc::now().to_rfc3339());
    }
}
