//! Chart-ready data for monthly rainfall summaries.
//!
//! Each month is drawn as one stacked bar built from three series (minimum,
//! maximum, total). The segments are deltas, and every segment also carries
//! the cumulative height it ends at, which is what a tooltip shows.
//!
//! The default top segment is `total - (max - min)`, so a bar ends at
//! `total + min`. [`Stacking::TrueTotal`] ends it at the monthly total.

/// Decomposition of one monthly summary into stackable segments
pub mod segments {
    use rain_core::MonthlySummary;
    use serde::Serialize;

    /// The statistic a stacked segment stands for, in stacking order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum Statistic {
        Minimum,
        Maximum,
        Total,
    }

    impl Statistic {
        /// Bottom to top.
        pub const STACK_ORDER: [Statistic; 3] =
            [Statistic::Minimum, Statistic::Maximum, Statistic::Total];

        pub fn name(&self) -> &'static str {
            match self {
                Statistic::Minimum => "Minimum",
                Statistic::Maximum => "Maximum",
                Statistic::Total => "Total",
            }
        }

        /// Legend name of the series drawing this statistic.
        pub fn series_name(&self) -> &'static str {
            match self {
                Statistic::Minimum => "Minimum Rainfall",
                Statistic::Maximum => "Maximum Rainfall",
                Statistic::Total => "Total Rainfall",
            }
        }
    }

    /// How the top (total) segment is sized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub enum Stacking {
        /// Top segment is `total - (max - min)`: the bar ends at `total + min`.
        #[default]
        OffsetTotal,
        /// Top segment is `total - max`: the bar ends at the monthly total and
        /// the cumulative annotations are exactly min, max and total.
        TrueTotal,
    }

    /// One segment of a stacked bar.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct Segment {
        pub statistic: Statistic,
        /// Height drawn for this segment.
        pub value: f64,
        /// Height of the stack at the top of this segment.
        pub cumulative: f64,
    }

    /// The three segments of one month, bottom to top.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StackedBar {
        pub category: String,
        pub segments: [Segment; 3],
    }

    impl StackedBar {
        pub fn segment(&self, statistic: Statistic) -> &Segment {
            match statistic {
                Statistic::Minimum => &self.segments[0],
                Statistic::Maximum => &self.segments[1],
                Statistic::Total => &self.segments[2],
            }
        }

        /// Total drawn height of the bar.
        pub fn height(&self) -> f64 {
            self.segments[2].cumulative
        }
    }

    /// Decompose a summary with the default [`Stacking::OffsetTotal`].
    pub fn decompose(summary: &MonthlySummary) -> StackedBar {
        decompose_with(summary, Stacking::default())
    }

    /// Segment values are not clamped: a negative top segment means the
    /// summary's total is below its maximum.
    pub fn decompose_with(summary: &MonthlySummary, stacking: Stacking) -> StackedBar {
        let min_segment = summary.min();
        let max_delta = summary.max() - summary.min();
        let total_delta = match stacking {
            Stacking::TrueTotal => summary.total() - summary.max(),
            Stacking::OffsetTotal => summary.total() - max_delta,
        };

        // Offset starts at zero for every bar.
        let mut offset = 0.0;
        let values = [min_segment, max_delta, total_delta];
        let segments = std::array::from_fn(|i| {
            offset += values[i];
            Segment {
                statistic: Statistic::STACK_ORDER[i],
                value: values[i],
                cumulative: offset,
            }
        });

        StackedBar {
            category: summary.label(),
            segments,
        }
    }

}

/// The three aligned series of a stacked monthly chart
pub mod series {
    use crate::segments::{decompose_with, Stacking, Statistic};
    use rain_core::RainfallDataset;
    use serde::Serialize;
    use std::fmt;

    pub const X_AXIS_LABEL: &str = "Dates";
    pub const Y_AXIS_LABEL: &str = "Rainfall (millimeters)";

    /// One month's point within a series.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct SeriesPoint {
        pub category: String,
        pub statistic: Statistic,
        /// Segment height to draw.
        pub value: f64,
        /// Stack height at the top of the segment; with
        /// [`Stacking::TrueTotal`] this is the statistic itself.
        pub cumulative: f64,
    }

    /// Hover text, e.g. "1/2024: Maximum is 30.0 millimeters".
    impl fmt::Display for SeriesPoint {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}: {} is {:.1} millimeters",
                self.category,
                self.statistic.name(),
                self.cumulative
            )
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ChartSeries {
        pub name: &'static str,
        pub statistic: Statistic,
        pub points: Vec<SeriesPoint>,
    }

    /// Everything a renderer needs to draw the stacked monthly bar chart.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StackedChart {
        pub title: String,
        pub x_label: &'static str,
        pub y_label: &'static str,
        pub stacking: Stacking,
        pub categories: Vec<String>,
        /// Minimum, maximum and total series, bottom to top.
        pub series: Vec<ChartSeries>,
    }

    impl StackedChart {
        pub fn from_dataset(dataset: &RainfallDataset) -> Self {
            Self::from_dataset_with(dataset, Stacking::default())
        }

        /// Series points follow the dataset's (year, month) order so all
        /// three series share the x-axis.
        pub fn from_dataset_with(dataset: &RainfallDataset, stacking: Stacking) -> Self {
            let bars: Vec<_> = dataset
                .summaries()
                .iter()
                .map(|summary| decompose_with(summary, stacking))
                .collect();

            let series = Statistic::STACK_ORDER
                .iter()
                .map(|&statistic| ChartSeries {
                    name: statistic.series_name(),
                    statistic,
                    points: bars
                        .iter()
                        .map(|bar| {
                            let segment = bar.segment(statistic);
                            SeriesPoint {
                                category: bar.category.clone(),
                                statistic,
                                value: segment.value,
                                cumulative: segment.cumulative,
                            }
                        })
                        .collect(),
                })
                .collect();

            log::debug!("chart: built {} stacked bars", bars.len());
            Self {
                title: dataset.date_range_label(),
                x_label: X_AXIS_LABEL,
                y_label: Y_AXIS_LABEL,
                stacking,
                categories: bars.into_iter().map(|bar| bar.category).collect(),
                series,
            }
        }

        pub fn series(&self, statistic: Statistic) -> Option<&ChartSeries> {
            self.series.iter().find(|s| s.statistic == statistic)
        }
    }

}

pub use segments::{decompose, decompose_with, Segment, StackedBar, Stacking, Statistic};
pub use series::{ChartSeries, SeriesPoint, StackedChart};
