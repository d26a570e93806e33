//! # Engine
//!
//! 管道驱动：逐行读取 tap 输出，解码、校验、攒批并投递，
//! 结束时返回最后的 checkpoint 与运行统计。
//!
//! ## 使用示例
//!
//! ```ignore
//! use engine::{emit_checkpoint, Driver};
//! use ingestion::LineSource;
//!
//! let outcome = Driver::from_config(sink, &config).run(LineSource::stdin()).await?;
//! emit_checkpoint(&mut tokio::io::stdout(), outcome.checkpoint.as_ref()).await?;
//! ```

mod checkpoint;
mod driver;
mod summary;

pub use checkpoint::emit_checkpoint;
pub use driver::Driver;
pub use summary::{RunOutcome, RunSummary};
