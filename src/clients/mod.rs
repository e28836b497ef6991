//! 外部服务客户端

pub mod deepseek;

pub use deepseek::{ChatCompletion, DeepSeekClient, DeepSeekError};
