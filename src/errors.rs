//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradesys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GradeSysError {
            $($variant(String),)*
        }

        impl GradeSysError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradeSysError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradeSysError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradeSysError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradeSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradeSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradesys_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "IO Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Template("E012", "Template Render Error"),
    ExternalService("E013", "External Service Error"),
    EngineNotConfigured("E014", "Analysis Engine Not Configured"),
    InvalidState("E015", "Invalid State Transition"),
}

impl GradeSysError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradeSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradeSysError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradeSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradeSysError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GradeSysError {
    fn from(err: std::io::Error) -> Self {
        GradeSysError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GradeSysError {
    fn from(err: serde_json::Error) -> Self {
        GradeSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradeSysError {
    fn from(err: chrono::ParseError) -> Self {
        GradeSysError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for GradeSysError {
    fn from(err: reqwest::Error) -> Self {
        GradeSysError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradeSysError>;
