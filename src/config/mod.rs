//! 配置管理
//!
//! 配置来源依次为 `config.toml`、`config.{APP_ENV}.toml`、`GRADESYS_` 前缀环境变量。

mod r#impl;
mod structs;

pub use structs::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::load().expect("config.toml should load");
        assert!(config.server.workers > 0);
        assert!(config.analysis.recent_days > 0);
        assert!(!config.deepseek.base_url.is_empty());
    }
}
