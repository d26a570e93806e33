//! Pipeline 指标收集模块
//!
//! 消息、record、投递相关的 Prometheus 指标，以及用于运行摘要的在线统计。

use metrics::{counter, gauge, histogram};

/// 记录收到的消息
pub fn record_message_received(kind: &str) {
    counter!(
        "target_rest_messages_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// 记录通过校验的 record
pub fn record_record_accepted(stream: &str) {
    counter!(
        "target_rest_records_accepted_total",
        "stream" => stream.to_string()
    )
    .increment(1);
}

/// 记录 schema 声明
pub fn record_schema_declared(stream: &str, stream_count: usize) {
    counter!(
        "target_rest_schemas_declared_total",
        "stream" => stream.to_string()
    )
    .increment(1);
    gauge!("target_rest_streams").set(stream_count as f64);
}

/// 记录一次 payload 投递
pub fn record_batch_sent(sink_name: &str, records: usize, latency_ms: f64) {
    counter!(
        "target_rest_batches_sent_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
    counter!(
        "target_rest_records_sent_total",
        "sink" => sink_name.to_string()
    )
    .increment(records as u64);
    histogram!("target_rest_batch_size").record(records as f64);
    histogram!("target_rest_send_latency_ms").record(latency_ms);
}

/// 记录致命错误 (按错误类型)
pub fn record_pipeline_error(kind: &str) {
    counter!(
        "target_rest_errors_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// 统计摘要
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "n/a");
        }
        write!(
            f,
            "mean={:.2} std={:.2} min={:.2} max={:.2} (n={})",
            self.mean, self.std_dev, self.min, self.max, self.count
        )
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }

    /// 生成摘要
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            count: self.count,
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }
}
