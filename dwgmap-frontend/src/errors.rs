use thiserror::Error;

use dwgmap_engine::errors::EngineError;
use dwgmap_io::IoError;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("解码 DWG 失败: {0}")]
    Decode(#[from] IoError),
    #[error("几何提取失败: {0}")]
    Extract(#[from] EngineError),
}
