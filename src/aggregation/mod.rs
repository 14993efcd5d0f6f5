//! Cross-instance aggregation: confusion matrices and metric averages.

pub mod averager;
pub mod confusion;

pub use averager::{AveragedMetrics, MetricsAccumulator, MetricsAverager};
pub use confusion::ConfusionMatrix;
