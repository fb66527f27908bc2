use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
};

use crate::{config::ManagerPreferences, logging, utils::logging::Type};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

/// 初始化 log4rs 控制台日志
pub fn init_logger(level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(
            Logger::builder()
                .appender("stdout")
                .additive(false)
                .build("app", level),
        )
        .build(Root::builder().appender("stdout").build(LevelFilter::Warn))
        .context("failed to build log4rs config")?;

    log4rs::init_config(config).map_err(|e| anyhow!("logger already initialized: {e}"))?;
    logging!(info, Type::Setup, "日志系统已初始化，级别: {}", level);
    Ok(())
}

/// Initialize logging using the level named in the preferences.
pub fn init_logger_from(prefs: &ManagerPreferences) -> Result<()> {
    let level = prefs
        .log_level
        .parse::<LevelFilter>()
        .with_context(|| format!("invalid log level: {}", prefs.log_level))?;
    init_logger(level)
}
