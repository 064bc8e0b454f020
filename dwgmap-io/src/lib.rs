//! 外部 DWG 解码器边界。
//!
//! 真实的二进制 DWG 解码由外部库承担，本 crate 只约定其输出契约
//! （`DocumentLoader` 产出 [`Document`]），并以固定演示内容的桩实现
//! 支撑演示模式。解码器的正确性不在此处验证，管线其余部分只依赖
//! 它产出的文档结构。

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use dwgmap_core::document::Document;
use dwgmap_core::geometry::Point2;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid drawing content: {0}")]
    InvalidDrawing(String),
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, IoError>;
}

/// DWG 解码门面。当前为演示桩：校验文件可读且带有 DWG 版本标识，
/// 然后返回固定演示内容；链接真实解码器后由其替换。
pub struct DwgFacade;

impl DwgFacade {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for DwgFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let data = fs::read(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        // DWG 文件以 "AC10xx" 版本标识开头；完整的结构校验属于真实
        // 解码器的职责，这里只做最小的内容识别。
        if !data.starts_with(b"AC10") {
            return Err(IoError::InvalidDrawing(format!(
                "文件 {} 缺少 DWG 版本标识",
                path.display()
            )));
        }

        debug!(
            path = %path.display(),
            bytes = data.len(),
            "演示桩解码：返回固定演示内容"
        );
        Ok(demo_document())
    }
}

/// 固定演示文档：一条 "Roads" 图层的红色线段、一条 "Parcels" 图层的
/// 绿色三顶点多段线，以及一个宗地号文字标注。坐标按图纸约定存储
/// （x=北向，y=东向，米）。
pub fn demo_document() -> Document {
    let mut document = Document::new();
    document.add_line(
        Point2::new(4_500_000.0, 500_000.0),
        Point2::new(4_501_000.0, 501_000.0),
        1,
        "Roads",
    );
    document.add_polyline(
        [
            Point2::new(4_500_500.0, 500_500.0),
            Point2::new(4_500_600.0, 500_600.0),
            Point2::new(4_500_500.0, 500_700.0),
        ],
        false,
        3,
        "Parcels",
    );
    document.add_text(
        Point2::new(4_500_550.0, 500_600.0),
        "101/5",
        2.5,
        0.0,
        2,
        "Parcels",
    );
    document
}
