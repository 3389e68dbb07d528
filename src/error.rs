use std::io;

use axum::response::IntoResponse;
use reqwest::StatusCode;

pub type Result<T> = core::result::Result<T, Error>;

/// 统一错误类型。
///
/// 覆盖 CMS 所有失败场景：
///
/// - [`Error::NotConfigured`]：尚未配置 token 或仓库
/// - [`Error::NotFound`]：远端文件或实体不存在
/// - [`Error::Conflict`]：revision token 过期，提交被远端拒绝
/// - [`Error::Transport`]：网络或认证层错误
/// - [`Error::Validation`]：请求数据不合法
/// - [`Error::Unsupported`]：保留的未实现操作（如上传）
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 尚未配置 GitHub token 或仓库标识
    #[error("github repository not configured")]
    NotConfigured,

    /// 远端文件或实体不存在
    #[error("not found")]
    NotFound,

    /// 写入时 revision token 已过期
    #[error("remote file changed since it was read")]
    Conflict,

    /// 底层网络错误
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// 请求数据不合法
    #[error("{0}")]
    Validation(&'static str),

    /// 未实现的操作
    #[error("{0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    FormatError(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::NotConfigured => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Error::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            Error::Conflict => (StatusCode::CONFLICT, self.to_string()).into_response(),
            Error::Transport(e) => {
                tracing::error!(%e, "github api transport error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway")
            }
            .into_response(),
            Error::Validation(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::Unsupported(s) => {
                (StatusCode::NOT_IMPLEMENTED, s.to_string()).into_response()
            }
            Error::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Error::Yaml(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Error::Toml(e) => (StatusCode::BAD_REQUEST, e.message().to_string()).into_response(),
            Error::FormatError(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
        }
    }
}
