use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app::App;
use crate::content::Category;
use crate::error::Result;
use crate::store::{CategoryPatch, CategoryStore};

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

fn categories(app: &App) -> Result<CategoryStore<crate::github::GithubContents>> {
    Ok(CategoryStore::new(app.contents()?))
}

/// 分类列表，可见的在前。
pub async fn list(State(app): State<App>) -> Result<Json<Vec<Category>>> {
    categories(&app)?.list().await.map(Json)
}

/// 新建分类，重名静默跳过。
pub async fn create(
    State(app): State<App>,
    Json(req): Json<CreateCategory>,
) -> Result<StatusCode> {
    categories(&app)?.create(&req.name).await?;
    Ok(StatusCode::CREATED)
}

/// 重命名或改可见性。
pub async fn update(
    Path(id): Path<String>,
    State(app): State<App>,
    Json(patch): Json<CategoryPatch>,
) -> Result<StatusCode> {
    categories(&app)?.update(&id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 删除分类。
pub async fn remove(
    Path(id): Path<String>,
    State(app): State<App>,
) -> Result<StatusCode> {
    categories(&app)?.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
