use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            projection: ProjectionConfig::default(),
            frontend: FrontendConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `DWGMAP_CONFIG`，否则寻找
    /// `./config/default.toml`。若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("DWGMAP_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 投影配置。中央子午线由调用方指定，常用取值为 3 度带的
/// 27/30/33/36/39/42/45。
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "ProjectionConfig::default_central_meridian")]
    pub central_meridian: f64,
}

impl ProjectionConfig {
    fn default_central_meridian() -> f64 {
        27.0
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            central_meridian: Self::default_central_meridian(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FrontendConfig {
    /// 默认加载的图纸路径；缺省时 CLI 回退到内置演示内容。
    #[serde(default)]
    pub drawing_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let cfg = AppConfig::discover().expect("discover should succeed");
        assert_eq!(cfg.logging.level, "info");
        assert!((cfg.projection.central_meridian - 27.0).abs() < f64::EPSILON);
        assert!(cfg.frontend.drawing_path.is_none());
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [projection]
            central_meridian = 33.0

            [frontend]
            drawing_path = "../samples/site_plan.dwg"
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert!((cfg.projection.central_meridian - 33.0).abs() < f64::EPSILON);
        assert_eq!(
            cfg.frontend
                .drawing_path
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("../samples/site_plan.dwg".to_string())
        );
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [projection]
            central_meridian = 42.0
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "info");
        assert!((cfg.projection.central_meridian - 42.0).abs() < f64::EPSILON);
        assert!(cfg.frontend.drawing_path.is_none());
    }

    #[test]
    fn malformed_file_surfaces_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "projection = 'not a table'").unwrap();

        match AppConfig::from_file(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("期望 Parse 错误，实际为 {other:?}"),
        }
    }
}
