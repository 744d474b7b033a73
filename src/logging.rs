//! 日志初始化

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// 默认日志级别，`RUST_LOG`存在时以其为准
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "blogwright=debug,rig=info,info"
    } else {
        "blogwright=info,warn"
    }
}

/// 初始化stderr日志输出，重复调用时忽略
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
