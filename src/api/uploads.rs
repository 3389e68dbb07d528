use crate::error::{Error, Result};

/// 文件上传占位接口。
///
/// GitHub 后端没有对象存储，统一返回 501，前端应改用外部图片 URL。
pub async fn upload() -> Result<()> {
    Err(Error::Unsupported(
        "file upload is not supported by the github backend, use external image urls",
    ))
}
