//! GradeSys - 学生学籍成绩与分析报告后端服务
//!
//! 基于 Actix Web 和 SeaORM 构建，按固定分数段生成模板化的学业分析报告，
//! 可选接入 DeepSeek 生成报告。
//!
//! # 架构
//! - `analysis`: 成绩统计、画像、提示词与本地报告生成
//! - `cache`: 缓存层（Moka）
//! - `clients`: 外部服务客户端（DeepSeek）
//! - `config`: 配置管理
//! - `engine`: 分析报告生成引擎
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 速率限制中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod analysis;
pub mod cache;
pub mod clients;
pub mod config;
pub mod engine;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
