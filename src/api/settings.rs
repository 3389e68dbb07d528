use axum::extract::State;
use axum::Json;
use serde_json::{Map, Value};

use crate::app::App;
use crate::content::Settings;
use crate::error::Result;
use crate::store::SettingsStore;

fn settings(app: &App) -> Result<SettingsStore<crate::github::GithubContents>> {
    Ok(SettingsStore::new(app.contents()?))
}

/// 站点设置，不存在时返回默认值。
pub async fn get(State(app): State<App>) -> Result<Json<Settings>> {
    settings(&app)?.get().await.map(Json)
}

/// 浅合并一组设置字段。
pub async fn update(
    State(app): State<App>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<Settings>> {
    settings(&app)?.update(patch).await.map(Json)
}
