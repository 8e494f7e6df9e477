//! 启动配置：solitaire.json（或命令行第一个参数指定的文件）+ 环境变量覆盖

use mini_solitaire::engine::GameConfig;
use mini_solitaire::solitaire::DeckSource;
use std::path::PathBuf;

/// 默认配置文件，位于工作目录
pub const DEFAULT_CONFIG: &str = "solitaire.json";
/// `SOLITAIRE_DEBUG=1` 打开调试绘制
pub const DEBUG_ENV: &str = "SOLITAIRE_DEBUG";
/// `SOLITAIRE_SEED=<u64>` 固定洗牌种子
pub const SEED_ENV: &str = "SOLITAIRE_SEED";

/// 读取配置；文件缺失或解析失败时使用默认值
pub fn load_config() -> GameConfig {
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let path = explicit.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let mut config = match GameConfig::load(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) if explicit.is_some() => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            GameConfig::default()
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no config file, using defaults");
            GameConfig::default()
        }
    };

    if std::env::var(DEBUG_ENV).is_ok_and(|v| v == "1") {
        config.debug = true;
    }
    if let Ok(raw) = std::env::var(SEED_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(seed) => config.seed = Some(seed),
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", SEED_ENV),
        }
    }

    config
}

pub fn deck_source(config: &GameConfig) -> DeckSource {
    match config.seed {
        Some(seed) => DeckSource::Seeded(seed),
        None => DeckSource::Random,
    }
}
