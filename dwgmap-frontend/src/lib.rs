pub mod cli;
pub mod errors;
pub mod loader;
pub mod palette;

use std::path::Path;

use tracing::info;

use dwgmap_config::AppConfig;
use dwgmap_engine::extract::{GeoBatch, extract_geometry};
use dwgmap_io::{DocumentLoader, DwgFacade};

use errors::FrontendError;

/// 宿主边界操作：解码指定图纸并按给定中央子午线提取 WGS84 几何。
///
/// 解码失败以类型化错误返回，不会降级为空结果；返回的批次满足
/// 平行序列对齐契约，调用方独占所有权。
pub fn extract_georeferenced_geometry(
    path: &Path,
    central_meridian_deg: f64,
) -> Result<GeoBatch, FrontendError> {
    let loader = DwgFacade::new();
    let document = loader.load(path)?;
    let batch = extract_geometry(&document, central_meridian_deg)?;
    info!(
        path = %path.display(),
        segments = batch.segment_count(),
        labels = batch.label_count(),
        "图纸地理提取完成"
    );
    Ok(batch)
}

/// 启动 CLI 演示或返回错误。
pub fn run_cli_demo(config: &AppConfig) -> Result<(), FrontendError> {
    info!("启动 CLI 演示前端");
    cli::run_demo(config)
}
