//! # Dispatcher
//!
//! 数据投递模块。
//!
//! 负责：
//! - 累积已校验的 record 直到达到 batch_size
//! - 将 payload 通过 HTTP POST 投递到 REST 端点
//! - 非 2xx 响应或传输失败即为致命错误，不重试

pub mod batch;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use batch::BatchAccumulator;
pub use contracts::{BatchSender, Payload};
pub use dispatcher::{create_sink, SinkKind, TargetSink};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{LogSink, RestSink, RestSinkConfig};
