//! # Schema Registry
//!
//! 每个 stream 的 schema 生命周期管理。
//!
//! 负责：
//! - 编译 Draft 4 validator（SCHEMA 消息到达时）
//! - 同名 stream 重新声明时覆盖旧 schema
//! - 按 stream 校验 RECORD
//!
//! ## 使用示例
//!
//! ```ignore
//! use schema_registry::SchemaRegistry;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.declare("users", schema, vec!["id".into()])?;
//! registry.validate("users", &record)?;
//! ```

mod multiple_of;
mod registry;

pub use registry::{SchemaRegistry, StreamState};
