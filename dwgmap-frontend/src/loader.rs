use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use dwgmap_config::AppConfig;
use dwgmap_core::document::Document;
use dwgmap_io::{DocumentLoader, DwgFacade, demo_document};

/// 文档来源，便于前端呈现加载信息。
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Dwg(PathBuf),
    Demo,
}

/// 统一封装加载后的文档与元信息。
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: Document,
    pub source: DocumentSource,
}

/// 按优先级加载图纸：环境变量 `DWGMAP_CLI_SAMPLE_DWG` 指定的路径、
/// 配置中的默认图纸路径、内置演示内容。解码失败时告警并回退到
/// 演示内容——这是 CLI 演示专属的降级策略，宿主边界操作
/// [`crate::extract_georeferenced_geometry`] 不做任何回退。
pub fn load_document_from_env_or_demo(config: &AppConfig) -> LoadedDocument {
    let candidate = env::var_os("DWGMAP_CLI_SAMPLE_DWG")
        .map(PathBuf::from)
        .or_else(|| config.frontend.drawing_path.clone());

    if let Some(path) = candidate {
        let loader = DwgFacade::new();
        match loader.load(&path) {
            Ok(document) => {
                info!(path = %path.display(), "从 DWG 加载文档成功");
                return LoadedDocument {
                    document,
                    source: DocumentSource::Dwg(path),
                };
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载 DWG 失败，回退到内置演示内容");
            }
        }
    }

    LoadedDocument {
        document: demo_document(),
        source: DocumentSource::Demo,
    }
}
