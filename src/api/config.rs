use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    pub token: String,
    pub repo: String,
}

/// 配置状态，token 本身不回传。
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub configured: bool,
    pub repo: Option<String>,
}

/// 当前是否已配置仓库。
pub async fn status(State(app): State<App>) -> Json<ConfigStatus> {
    let config = app.config();

    Json(ConfigStatus {
        configured: config.is_configured(),
        repo: config.repo,
    })
}

/// 保存 token 和仓库标识。
pub async fn configure(
    State(app): State<App>,
    Json(req): Json<ConfigureRequest>,
) -> Result<Json<ConfigStatus>> {
    if req.token.trim().is_empty() || req.repo.trim().is_empty() {
        return Err(Error::Validation("token and repo must not be empty"));
    }

    app.update_config(|config| config.configure(req.token.clone(), &req.repo))?;

    let config = app.config();
    Ok(Json(ConfigStatus {
        configured: config.is_configured(),
        repo: config.repo,
    }))
}

/// 清空凭证。
pub async fn logout(State(app): State<App>) -> Result<StatusCode> {
    app.update_config(|config| config.logout())?;
    Ok(StatusCode::NO_CONTENT)
}
