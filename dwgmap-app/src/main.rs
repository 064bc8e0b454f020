use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dwgmap_config::{AppConfig, ConfigError};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_override: Option<PathBuf> = None;
    let mut drawing_override: Option<PathBuf> = None;
    let mut meridian_override: Option<f64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("`--config` 需要提供配置文件路径");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            "--dwg" => {
                let Some(path) = args.next() else {
                    eprintln!("`--dwg` 需要提供图纸路径");
                    std::process::exit(1);
                };
                drawing_override = Some(PathBuf::from(path));
            }
            "--dom" => {
                let Some(value) = args.next() else {
                    eprintln!("`--dom` 需要提供中央子午线度数");
                    std::process::exit(1);
                };
                match value.parse::<f64>() {
                    Ok(parsed) => meridian_override = Some(parsed),
                    Err(_) => {
                        eprintln!("无法解析中央子午线度数：{value}");
                        std::process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("未知参数：{other}");
                std::process::exit(1);
            }
        }
    }

    let mut config = load_configuration(config_override);
    if let Some(path) = drawing_override {
        config.frontend.drawing_path = Some(path);
    }
    if let Some(meridian) = meridian_override {
        config.projection.central_meridian = meridian;
    }

    init_logging(&config);
    info!(
        central_meridian = config.projection.central_meridian,
        "启动 dwgmap 应用"
    );

    if let Err(err) = dwgmap_frontend::run_cli_demo(&config) {
        error!(error = %err, "执行 CLI 演示失败");
        std::process::exit(1);
    }
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
