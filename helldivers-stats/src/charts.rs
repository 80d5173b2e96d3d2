//! Chart data for the analysis and comparison figures.
//!
//! Figures are plain values: titles, panels and labelled series. Turning
//! them into pixels or terminal bars is the caller's business.
use serde::{Deserialize, Serialize};

use crate::compare::Comparison;
use crate::config::{AnalysisConfig, ChartCfg};
use crate::counters::RawCounters;
use crate::kills::EnemyKillBreakdown;
use crate::metrics::{DerivedMetrics, SAMPLES_PER_MISSION};
use crate::numbers::{finite_or_zero, i64_to_f64, u64_to_f64};

/// How a panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Bar,
    /// One bar per series for every category.
    GroupedBar,
    /// Slices labelled with their share of the whole.
    Pie,
}

/// How bar values are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `{:.2}`
    TwoDecimals,
    /// `{:.1}`
    OneDecimal,
    /// `{:.0}`
    Whole,
    /// Whole number with thousands separators.
    Thousands,
}

impl ValueFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        let value = finite_or_zero(value);
        match self {
            Self::TwoDecimals => format!("{value:.2}"),
            Self::OneDecimal => format!("{value:.1}"),
            Self::Whole => format!("{value:.0}"),
            Self::Thousands => group_thousands(&format!("{value:.0}")),
        }
    }
}

/// Insert `,` between every group of three integer digits.
#[must_use]
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

/// A labelled value. `display` overrides the formatted label, e.g. to show
/// unscaled XP above a scaled bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl DataPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value: finite_or_zero(value),
            display: None,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// Values for one subject (or the only subject) in a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub points: Vec<DataPoint>,
}

impl Series {
    #[must_use]
    pub const fn unnamed(points: Vec<DataPoint>) -> Self {
        Self { name: None, points }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: Some(name.into()),
            points,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub kind: PanelKind,
    pub format: ValueFormat,
    pub series: Vec<Series>,
}

impl Panel {
    fn new(title: impl Into<String>, kind: PanelKind, format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            kind,
            format,
            series: Vec::new(),
        }
    }

    fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Formatted label for a point, honouring its display override.
    #[must_use]
    pub fn label_for(&self, point: &DataPoint) -> String {
        point
            .display
            .clone()
            .unwrap_or_else(|| self.format.format(point.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Figure {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            panels: Vec::new(),
        }
    }
}

fn kill_points(kills: &EnemyKillBreakdown) -> Vec<DataPoint> {
    kills
        .entries()
        .into_iter()
        .map(|(name, count)| DataPoint::new(name, u64_to_f64(count)))
        .collect()
}

fn pie_points(kills: &EnemyKillBreakdown) -> Vec<DataPoint> {
    kills
        .nonzero_entries()
        .into_iter()
        .map(|(name, count)| DataPoint::new(name, u64_to_f64(count)))
        .collect()
}

/// Kills by enemy type as a bar panel and a pie of the non-empty factions.
#[must_use]
pub fn kill_distribution_figure(kills: &EnemyKillBreakdown, cfg: &ChartCfg) -> Figure {
    let mut figure = Figure::new("Enemy Kill Distribution Analysis");
    if cfg.hide_empty_kill_panels && kills.charted_total() == 0 {
        return figure;
    }
    figure.panels.push(
        Panel::new("Kills by Enemy Type", PanelKind::Bar, ValueFormat::Whole)
            .with_series(Series::unnamed(kill_points(kills))),
    );
    let slices = pie_points(kills);
    if !slices.is_empty() {
        figure.panels.push(
            Panel::new("Enemy Kills Distribution", PanelKind::Pie, ValueFormat::OneDecimal)
                .with_series(Series::unnamed(slices)),
        );
    }
    figure
}

/// Efficiency, combat style and stratagem usage panels.
#[must_use]
pub fn performance_figure(metrics: &DerivedMetrics) -> Figure {
    let efficiency = metrics
        .efficiency
        .entries()
        .into_iter()
        .map(|(name, value)| DataPoint::new(name, value))
        .collect();
    let combat = metrics
        .combat_style
        .entries()
        .into_iter()
        .map(|(name, kills)| DataPoint::new(name, i64_to_f64(kills)))
        .collect();
    let stratagems = metrics
        .stratagem_efficiency
        .entries()
        .into_iter()
        .map(|(name, value)| DataPoint::new(name, value))
        .collect();

    let mut figure = Figure::new("Combat Performance Analysis");
    figure.panels = vec![
        Panel::new(
            "Performance Metrics per Mission",
            PanelKind::Bar,
            ValueFormat::TwoDecimals,
        )
        .with_series(Series::unnamed(efficiency)),
        Panel::new(
            "Combat Style Distribution",
            PanelKind::Bar,
            ValueFormat::Thousands,
        )
        .with_series(Series::unnamed(combat)),
        Panel::new(
            "Stratagem Usage per Mission",
            PanelKind::Bar,
            ValueFormat::TwoDecimals,
        )
        .with_series(Series::unnamed(stratagems)),
    ];
    figure
}

/// Label for the scaled XP bar, e.g. `XP per Mission (÷100)`.
#[must_use]
pub fn scaled_xp_label(xp_scale: f64) -> String {
    format!("XP per Mission (÷{})", ValueFormat::Whole.format(xp_scale))
}

/// Reward bars and, when any mission was played, a won/failed pie.
#[must_use]
pub fn rewards_figure(raw: &RawCounters, metrics: &DerivedMetrics, cfg: &ChartCfg) -> Figure {
    let rewards = vec![
        DataPoint::new(SAMPLES_PER_MISSION, metrics.samples_per_mission),
        DataPoint::new(
            scaled_xp_label(cfg.xp_scale),
            metrics.xp_per_mission / cfg.xp_scale,
        )
        .with_display(ValueFormat::OneDecimal.format(metrics.xp_per_mission)),
    ];

    let mut figure = Figure::new("Rewards and Mission Success Metrics");
    figure.panels.push(
        Panel::new(
            "Reward Metrics per Mission",
            PanelKind::Bar,
            ValueFormat::OneDecimal,
        )
        .with_series(Series::unnamed(rewards)),
    );
    if raw.missions_played > 0 {
        figure.panels.push(
            Panel::new("Mission Success Rate", PanelKind::Pie, ValueFormat::OneDecimal)
                .with_series(Series::unnamed(vec![
                    DataPoint::new("Successful Missions", u64_to_f64(raw.missions_won)),
                    DataPoint::new("Failed Missions", u64_to_f64(raw.missions_failed())),
                ])),
        );
    }
    figure
}

/// The three single-subject figures in display order.
#[must_use]
pub fn analysis_figures(raw: &RawCounters, metrics: &DerivedMetrics, cfg: &ChartCfg) -> Vec<Figure> {
    vec![
        kill_distribution_figure(&EnemyKillBreakdown::from_counters(raw), cfg),
        performance_figure(metrics),
        rewards_figure(raw, metrics, cfg),
    ]
}

fn grouped_panel(
    title: &str,
    format: ValueFormat,
    names: [&str; 2],
    rows: &[crate::compare::ComparisonRow],
) -> Panel {
    let mut panel = Panel::new(title, PanelKind::GroupedBar, format);
    for (idx, name) in names.into_iter().enumerate() {
        let points = rows
            .iter()
            .map(|row| DataPoint::new(row.metric.clone(), row.values[idx]))
            .collect();
        panel.series.push(Series::named(name, points));
    }
    panel
}

/// Efficiency, combat style and success metrics for two subjects.
#[must_use]
pub fn comparison_metrics_figure(comparison: &Comparison, config: &AnalysisConfig) -> Figure {
    let names = comparison.names();
    let mut figure = Figure::new(format!("Comparison of {} and {}", names[0], names[1]));
    let mut success = grouped_panel(
        "Success Metrics Comparison",
        ValueFormat::OneDecimal,
        names,
        &comparison.success_rows(config.charts.xp_scale),
    );
    for (series, subject) in success.series.iter_mut().zip(&comparison.subjects) {
        if let Some(xp) = series.points.last_mut() {
            xp.display = Some(ValueFormat::Whole.format(subject.metrics.xp_per_mission));
        }
    }
    figure.panels = vec![
        grouped_panel(
            "Efficiency Metrics Comparison",
            ValueFormat::TwoDecimals,
            names,
            &comparison.efficiency_rows(&config.comparison.efficiency_metrics),
        ),
        grouped_panel(
            "Combat Style Comparison",
            ValueFormat::Thousands,
            names,
            &comparison.combat_rows(),
        ),
        success,
    ];
    figure
}

/// Kill counts, kill shares and a pie per subject.
#[must_use]
pub fn comparison_kills_figure(comparison: &Comparison) -> Figure {
    let names = comparison.names();
    let mut figure = Figure::new(format!(
        "Enemy Kill Distribution Comparison: {} vs {}",
        names[0], names[1]
    ));
    figure.panels.push(grouped_panel(
        "Kills by Enemy Type",
        ValueFormat::Whole,
        names,
        &comparison.kill_rows(),
    ));
    figure.panels.push(grouped_panel(
        "Kill Share by Enemy Type",
        ValueFormat::TwoDecimals,
        names,
        &comparison.kill_share_rows(),
    ));
    for subject in &comparison.subjects {
        let slices = pie_points(&subject.kills);
        if slices.is_empty() {
            continue;
        }
        figure.panels.push(
            Panel::new(
                format!("{} Enemy Kill Distribution", subject.name),
                PanelKind::Pie,
                ValueFormat::OneDecimal,
            )
            .with_series(Series::unnamed(slices)),
        );
    }
    figure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MetricDerivationEngine, derive_metrics};

    fn raw() -> RawCounters {
        RawCounters {
            missions_played: 10,
            missions_won: 8,
            terminid_kills: 50,
            automaton_kills: 30,
            friendly_kills: 2,
            grenade_kills: 10,
            samples_collected: 40,
            total_xp: 50_000,
            ..RawCounters::default()
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234"), "-1,234");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(ValueFormat::Thousands.format(12_345.4), "12,345");
    }

    #[test]
    fn kill_figure_is_empty_without_kills() {
        let figure = kill_distribution_figure(&EnemyKillBreakdown::default(), &ChartCfg::default());
        assert!(figure.panels.is_empty());

        let shown = ChartCfg {
            hide_empty_kill_panels: false,
            ..ChartCfg::default()
        };
        let figure = kill_distribution_figure(&EnemyKillBreakdown::default(), &shown);
        assert_eq!(figure.panels.len(), 1);
        assert_eq!(figure.panels[0].kind, PanelKind::Bar);
    }

    #[test]
    fn kill_pie_omits_empty_factions() {
        let figure = kill_distribution_figure(
            &EnemyKillBreakdown::from_counters(&raw()),
            &ChartCfg::default(),
        );
        let pie = &figure.panels[1];
        assert_eq!(pie.kind, PanelKind::Pie);
        assert_eq!(pie.series[0].points.len(), 3);
        assert!((pie.series[0].total() - 82.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rewards_scale_xp_but_label_actual_value() {
        let raw = raw();
        let figure = rewards_figure(&raw, &derive_metrics(&raw), &ChartCfg::default());
        let xp = &figure.panels[0].series[0].points[1];
        assert_eq!(xp.label, "XP per Mission (÷100)");
        assert!((xp.value - 50.0).abs() < 1e-9);
        assert_eq!(figure.panels[0].label_for(xp), "5000.0");

        let pie = &figure.panels[1].series[0].points;
        assert_eq!(pie[1].label, "Failed Missions");
        assert!((pie[1].value - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rewards_skip_success_pie_without_missions() {
        let raw = RawCounters::default();
        let figure = rewards_figure(&raw, &derive_metrics(&raw), &ChartCfg::default());
        assert_eq!(figure.panels.len(), 1);
    }

    #[test]
    fn comparison_figures_name_both_subjects() {
        let cmp = Comparison::derive(
            &MetricDerivationEngine::default(),
            ("Alpha", raw()),
            ("Bravo", RawCounters::default()),
        )
        .unwrap();
        let config = AnalysisConfig::default();

        let metrics = comparison_metrics_figure(&cmp, &config);
        assert_eq!(metrics.title, "Comparison of Alpha and Bravo");
        assert_eq!(metrics.panels[0].series.len(), 2);
        assert_eq!(metrics.panels[0].series[0].points.len(), 5);
        let xp = metrics.panels[2].series[0].points.last().unwrap();
        assert_eq!(xp.display.as_deref(), Some("5000"));

        let kills = comparison_kills_figure(&cmp);
        assert_eq!(kills.panels.len(), 3, "pie only for the subject with kills");
        assert_eq!(kills.panels[2].title, "Alpha Enemy Kill Distribution");
    }
}
