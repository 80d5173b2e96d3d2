use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use helldivers_stats::charts::group_thousands;
use helldivers_stats::metrics::{
    OBJECTIVE_COMPLETION_RATE, SAMPLES_COLLECTED_PER_MISSION, TOTAL_KILLS, XP_EARNED_PER_MISSION,
};
use helldivers_stats::numbers::i64_to_f64;
use helldivers_stats::{
    AnalysisConfig, Comparison, ComparisonRow, CounterField, Figure, PlayTime, SubjectMetrics,
    analysis_figures, comparison_kills_figure, comparison_metrics_figure,
};

use crate::render::render_figure;

/// What the CLI derived: one subject, or two side by side.
#[derive(Debug, Clone)]
pub enum Analysis {
    Single(SubjectMetrics),
    Comparison(Comparison),
}

impl Analysis {
    pub fn subjects(&self) -> &[SubjectMetrics] {
        match self {
            Self::Single(subject) => std::slice::from_ref(subject),
            Self::Comparison(comparison) => &comparison.subjects[..],
        }
    }

    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::Comparison(_) => "comparison",
        }
    }

    /// Overwrite the names of subjects whose slot in `names` is filled;
    /// the rest keep the name they came with.
    pub fn rename(&mut self, names: &[Option<String>]) {
        let subjects: &mut [SubjectMetrics] = match self {
            Self::Single(subject) => std::slice::from_mut(subject),
            Self::Comparison(comparison) => &mut comparison.subjects[..],
        };
        for (subject, name) in subjects.iter_mut().zip(names) {
            if let Some(name) = name {
                subject.name.clone_from(name);
            }
        }
    }

    pub fn figures(&self, config: &AnalysisConfig) -> Vec<Figure> {
        match self {
            Self::Single(subject) => {
                analysis_figures(&subject.counters, &subject.metrics, &config.charts)
            }
            Self::Comparison(comparison) => vec![
                comparison_metrics_figure(comparison, config),
                comparison_kills_figure(comparison),
            ],
        }
    }
}

fn thousands(value: i64) -> String {
    group_thousands(&value.to_string())
}

fn combat_share(kills: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        i64_to_f64(kills) / i64_to_f64(total) * 100.0
    }
}

fn write_subject_console(out: &mut dyn Write, subject: &SubjectMetrics) -> Result<()> {
    let metrics = &subject.metrics;
    writeln!(out)?;
    writeln!(out, "{}", "=== Statistical Analysis Results ===".bright_cyan().bold())?;
    writeln!(out, "Subject: {}", subject.name.bold())?;

    writeln!(out)?;
    writeln!(out, "{}", "Efficiency Metrics (per Mission):".bright_yellow())?;
    writeln!(out, "{TOTAL_KILLS}: {}", metrics.total_kills)?;
    for (name, value) in metrics.efficiency.entries() {
        writeln!(out, "{name}: {value:.2}")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Combat Style Distribution:".bright_yellow())?;
    let total = metrics.combat_style.total();
    for (name, kills) in metrics.combat_style.entries() {
        writeln!(
            out,
            "{name}: {} ({:.1}%)",
            thousands(kills),
            combat_share(kills, total)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Stratagem Efficiency (per Mission):".bright_yellow())?;
    for (name, usage) in metrics.stratagem_efficiency.entries() {
        writeln!(out, "{name}: {usage:.2}")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Mission Performance Metrics:".bright_yellow())?;
    writeln!(out, "Success Rate: {:.1}%", metrics.mission_success_rate)?;
    writeln!(out, "Extraction Rate: {:.1}%", metrics.extraction_rate)?;
    writeln!(
        out,
        "{OBJECTIVE_COMPLETION_RATE}: {:.2}",
        metrics.objective_completion_rate
    )?;
    writeln!(
        out,
        "{SAMPLES_COLLECTED_PER_MISSION}: {:.2}",
        metrics.samples_per_mission
    )?;
    writeln!(out, "{XP_EARNED_PER_MISSION}: {:.2}", metrics.xp_per_mission)?;
    Ok(())
}

fn write_rows_console(
    out: &mut dyn Write,
    heading: &str,
    names: [&str; 2],
    rows: &[ComparisonRow],
) -> Result<()> {
    let pad = rows
        .iter()
        .map(|row| row.metric.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);
    writeln!(out)?;
    writeln!(out, "{}", heading.bright_yellow())?;
    writeln!(
        out,
        "{:<pad$}  {:>14}  {:>14}",
        "Metric",
        names[0].bold(),
        names[1].bold()
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<pad$}  {:>14.2}  {:>14.2}",
            row.metric, row.values[0], row.values[1]
        )?;
    }
    Ok(())
}

fn write_comparison_console(
    out: &mut dyn Write,
    comparison: &Comparison,
    config: &AnalysisConfig,
) -> Result<()> {
    let names = comparison.names();
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("=== Comparison: {} vs {} ===", names[0], names[1])
            .bright_cyan()
            .bold()
    )?;
    write_rows_console(
        out,
        "Efficiency Metrics:",
        names,
        &comparison.efficiency_rows(&config.comparison.efficiency_metrics),
    )?;
    write_rows_console(out, "Combat Style:", names, &comparison.combat_rows())?;
    write_rows_console(
        out,
        "Success Metrics:",
        names,
        &comparison.success_rows(config.charts.xp_scale),
    )?;
    write_rows_console(out, "Enemy Kills:", names, &comparison.kill_rows())?;
    write_rows_console(out, "Kill Share:", names, &comparison.kill_share_rows())?;
    Ok(())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    analysis: &Analysis,
    config: &AnalysisConfig,
    play_time: Option<PlayTime>,
    charts: bool,
) -> Result<()> {
    match analysis {
        Analysis::Single(subject) => write_subject_console(out, subject)?,
        Analysis::Comparison(comparison) => write_comparison_console(out, comparison, config)?,
    }
    if let Some(play_time) = play_time {
        writeln!(out)?;
        writeln!(out, "Play Time: {play_time}")?;
    }
    if charts {
        for figure in analysis.figures(config) {
            render_figure(out, &figure, config.charts.bar_width)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    play_time: Option<String>,
    subjects: &'a [SubjectMetrics],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    figures: Vec<Figure>,
}

pub fn generate_json_report(
    out: &mut dyn Write,
    analysis: &Analysis,
    config: &AnalysisConfig,
    play_time: Option<PlayTime>,
    charts: bool,
) -> Result<()> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        mode: analysis.mode(),
        play_time: play_time.map(|time| time.to_clock()),
        subjects: analysis.subjects(),
        figures: if charts {
            analysis.figures(config)
        } else {
            Vec::new()
        },
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    analysis: &Analysis,
    play_time: Option<PlayTime>,
) -> Result<()> {
    let subjects = analysis.subjects();
    writeln!(out, "# Helldivers Mission Statistics\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if let Some(play_time) = play_time {
        writeln!(out, "- **Play time**: {play_time}\n")?;
    }

    write!(out, "| Metric |")?;
    for subject in subjects {
        write!(out, " {} |", subject.name)?;
    }
    writeln!(out)?;
    write!(out, "|---|")?;
    for _ in subjects {
        write!(out, "---:|")?;
    }
    writeln!(out)?;

    let flattened: Vec<_> = subjects
        .iter()
        .map(|subject| subject.metrics.flatten())
        .collect();
    let Some(first) = flattened.first() else {
        return Ok(());
    };
    for (row, (name, _)) in first.iter().enumerate() {
        write!(out, "| {name} |")?;
        for values in &flattened {
            write!(out, " {:.2} |", values[row].1)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, analysis: &Analysis) -> Result<()> {
    let subjects = analysis.subjects();
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec!["name".to_string()];
    header.extend(CounterField::ALL.iter().map(|field| field.key().to_string()));
    if let Some(subject) = subjects.first() {
        header.extend(
            subject
                .metrics
                .flatten()
                .into_iter()
                .map(|(name, _)| name.to_string()),
        );
    }
    wtr.write_record(&header)?;

    for subject in subjects {
        let mut record = vec![subject.name.clone()];
        record.extend(
            CounterField::ALL
                .iter()
                .map(|field| subject.counters.get(*field).to_string()),
        );
        record.extend(
            subject
                .metrics
                .flatten()
                .into_iter()
                .map(|(_, value)| format!("{value:.4}")),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helldivers_stats::{MetricDerivationEngine, RawCounters};

    fn career() -> RawCounters {
        RawCounters {
            missions_played: 10,
            missions_won: 8,
            successful_extractions: 7,
            objectives_completed: 15,
            terminid_kills: 50,
            automaton_kills: 30,
            friendly_kills: 2,
            grenade_kills: 10,
            melee_kills: 5,
            eagle_kills: 5,
            shots_fired: 1000,
            shots_hit: 700,
            deaths: 12,
            samples_collected: 40,
            total_xp: 50_000,
            total_stratagems_used: 20,
            orbitals_used: 8,
            defensive_stratagems_used: 6,
            eagles_used: 6,
            ..RawCounters::default()
        }
    }

    fn single() -> Analysis {
        let engine = MetricDerivationEngine::default();
        Analysis::Single(SubjectMetrics::derive(&engine, "Solo", career()).unwrap())
    }

    fn comparison() -> Analysis {
        let engine = MetricDerivationEngine::default();
        Analysis::Comparison(
            Comparison::derive(
                &engine,
                ("Alpha", career()),
                ("Bravo", RawCounters::default()),
            )
            .unwrap(),
        )
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn console_report_lists_every_section() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let play_time = Some(PlayTime::new(1, 2, 3, 4));
        generate_console_report(&mut out, &single(), &AnalysisConfig::default(), play_time, false)
            .unwrap();
        let content = text(out);
        assert!(content.contains("=== Statistical Analysis Results ==="));
        assert!(content.contains("Total Kills: 80"));
        assert!(content.contains("Accuracy(%): 70.00"));
        assert!(content.contains("Regular Kills: 60 (75.0%)"));
        assert!(content.contains("Success Rate: 80.0%"));
        assert!(content.contains("XP Earned per Mission: 5000.00"));
        assert!(content.contains("Play Time: 26:03:04"));
    }

    #[test]
    fn console_comparison_with_charts() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        generate_console_report(&mut out, &comparison(), &AnalysisConfig::default(), None, true)
            .unwrap();
        let content = text(out);
        assert!(content.contains("=== Comparison: Alpha vs Bravo ==="));
        assert!(content.contains("Efficiency Metrics Comparison"));
        assert!(content.contains("Enemy Kill Distribution Comparison"));
    }

    #[test]
    fn combat_share_guards_zero_total() {
        assert!(combat_share(5, 0).abs() < f64::EPSILON);
        assert!((combat_share(5, 10) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn json_report_carries_mode_and_subjects() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &comparison(), &AnalysisConfig::default(), None, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["mode"], "comparison");
        assert_eq!(value["subjects"][0]["name"], "Alpha");
        assert_eq!(value["subjects"][0]["metrics"]["total_kills"], 80);
        assert!(value.get("figures").is_none());
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn markdown_report_has_one_column_per_subject() {
        let mut out = Vec::new();
        generate_markdown_report(&mut out, &comparison(), None).unwrap();
        let content = text(out);
        assert!(content.contains("| Metric | Alpha | Bravo |"));
        assert!(content.contains("| Total Kills | 80.00 | 0.00 |"));
    }

    #[test]
    fn csv_report_writes_counters_then_metrics() {
        let mut out = Vec::new();
        generate_csv_report(&mut out, &single()).unwrap();
        let content = text(out);
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("name,missions_played,missions_won"));
        assert!(header.contains("Total Kills"));
        assert!(lines.next().unwrap().starts_with("Solo,10,8,7"));
    }

    #[test]
    fn rename_overrides_input_names() {
        let mut analysis = comparison();
        analysis.rename(&[Some("One".to_string()), Some("Two".to_string())]);
        let names: Vec<_> = analysis.subjects().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["One", "Two"]);
    }

    #[test]
    fn rename_leaves_unfilled_slots_alone() {
        let mut analysis = comparison();
        analysis.rename(&[Some("Eagle-1".to_string())]);
        let names: Vec<_> = analysis.subjects().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Eagle-1", "Bravo"]);

        let mut analysis = comparison();
        analysis.rename(&[None, Some("Pelican-1".to_string())]);
        let names: Vec<_> = analysis.subjects().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Pelican-1"]);
    }
}
