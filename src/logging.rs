//! ログ初期化

use tracing_subscriber::EnvFilter;

/// RUST_LOG があればそれを使い、なければ -v の有無で info / debug
pub fn init(verbose: bool) {
    let default = if verbose { "philsan_qr=debug" } else { "philsan_qr=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // 二重初期化（テスト等）は無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
