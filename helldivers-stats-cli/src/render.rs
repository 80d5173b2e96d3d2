//! Terminal rendering of chart figures as horizontal bars.
use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use helldivers_stats::{Figure, Panel, PanelKind, Series};
use num_traits::cast::cast;

const BAR: &str = "█";

/// Cells for `value` when `max` spans `width` cells. Non-positive values get
/// no cells.
fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if !(value > 0.0 && max > 0.0) {
        return 0;
    }
    let cells = (value / max * cast::<usize, f64>(width).unwrap_or(0.0)).round();
    cast::<f64, usize>(cells).unwrap_or(0).clamp(1, width)
}

fn paint(bar: String, series_index: usize) -> ColoredString {
    match series_index {
        0 => bar.cyan(),
        1 => bar.yellow(),
        _ => bar.normal(),
    }
}

fn label_width(panel: &Panel) -> usize {
    panel
        .series
        .iter()
        .flat_map(|series| series.points.iter())
        .map(|point| point.label.chars().count())
        .max()
        .unwrap_or(0)
}

fn series_heading(out: &mut dyn Write, series: &Series, index: usize) -> io::Result<()> {
    if let Some(name) = &series.name {
        writeln!(out, "  {}", paint(format!("■ {name}"), index))?;
    }
    Ok(())
}

fn render_bars(out: &mut dyn Write, panel: &Panel, width: usize) -> io::Result<()> {
    let max = panel
        .series
        .iter()
        .flat_map(|series| series.points.iter())
        .map(|point| point.value)
        .fold(0.0_f64, f64::max);
    let pad = label_width(panel);
    for (index, series) in panel.series.iter().enumerate() {
        series_heading(out, series, index)?;
        for point in &series.points {
            let bar = BAR.repeat(bar_length(point.value, max, width));
            writeln!(
                out,
                "  {:<pad$} │{} {}",
                point.label,
                paint(bar, index),
                panel.label_for(point)
            )?;
        }
    }
    Ok(())
}

fn render_pie(out: &mut dyn Write, panel: &Panel, width: usize) -> io::Result<()> {
    let pad = label_width(panel);
    for (index, series) in panel.series.iter().enumerate() {
        series_heading(out, series, index)?;
        let total = series.total();
        for point in &series.points {
            let share = if total > 0.0 { point.value / total } else { 0.0 };
            let bar = BAR.repeat(bar_length(share, 1.0, width));
            writeln!(
                out,
                "  {:<pad$} │{} {:.1}%",
                point.label,
                paint(bar, index),
                share * 100.0
            )?;
        }
    }
    Ok(())
}

pub fn render_figure(out: &mut dyn Write, figure: &Figure, width: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", figure.title.bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(figure.title.chars().count()).cyan())?;
    if figure.panels.is_empty() {
        writeln!(out, "  (no data)")?;
    }
    for panel in &figure.panels {
        writeln!(out)?;
        writeln!(out, "{}", panel.title.bold())?;
        match panel.kind {
            PanelKind::Bar | PanelKind::GroupedBar => render_bars(out, panel, width)?,
            PanelKind::Pie => render_pie(out, panel, width)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helldivers_stats::{ChartCfg, EnemyKillBreakdown, RawCounters, kill_distribution_figure};

    fn rendered(figure: &Figure, width: usize) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        render_figure(&mut buffer, figure, width).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn bar_length_scales_to_width() {
        assert_eq!(bar_length(50.0, 100.0, 40), 20);
        assert_eq!(bar_length(100.0, 100.0, 40), 40);
        assert_eq!(bar_length(0.1, 100.0, 40), 1);
        assert_eq!(bar_length(-3.0, 100.0, 40), 0);
        assert_eq!(bar_length(5.0, 0.0, 40), 0);
        assert_eq!(bar_length(f64::NAN, 1.0, 40), 0);
    }

    #[test]
    fn kill_figure_renders_bars_and_shares() {
        let kills = EnemyKillBreakdown::from_counters(&RawCounters {
            terminid_kills: 30,
            automaton_kills: 10,
            ..RawCounters::default()
        });
        let figure = kill_distribution_figure(&kills, &ChartCfg::default());
        let text = rendered(&figure, 10);
        assert!(text.contains("Enemy Kill Distribution Analysis"));
        assert!(text.contains(&format!("│{} 30", BAR.repeat(10))));
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn empty_figure_says_so() {
        let figure =
            kill_distribution_figure(&EnemyKillBreakdown::default(), &ChartCfg::default());
        assert!(rendered(&figure, 10).contains("(no data)"));
    }
}
