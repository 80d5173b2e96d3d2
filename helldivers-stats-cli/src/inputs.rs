use anyhow::{Context, Result, bail};
use std::fs::File;
use std::path::{Path, PathBuf};

use helldivers_stats::{
    AnalysisConfig, CounterSource, JsonSource, PairSource, SourceError, Subject, TabularSource,
    ValidationPolicy, parse_assignment,
};

/// Where the CLI reads its subjects from.
pub enum CliSource {
    Fields(PairSource),
    Csv(TabularSource<File>),
    Json(JsonSource),
}

impl CounterSource for CliSource {
    type Error = SourceError;

    fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error> {
        match self {
            Self::Fields(source) => source.subjects(),
            Self::Csv(source) => source.subjects(),
            Self::Json(source) => source.subjects(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(InputFormat::Csv),
        Some("json") => Ok(InputFormat::Json),
        _ => bail!(
            "cannot tell the format of {}: expected a .csv or .json file",
            path.display()
        ),
    }
}

/// Collect `--field key=value` assignments into a single form subject.
pub fn fields_source(fields: &[String]) -> Result<PairSource> {
    let mut source = PairSource::new(None);
    for assignment in fields {
        let (field, value) = parse_assignment(assignment)
            .with_context(|| format!("invalid --field {assignment:?}"))?;
        source.push(field.key(), value.to_string());
    }
    Ok(source)
}

pub fn open_source(input: Option<&Path>, fields: &[String]) -> Result<CliSource> {
    match (input, fields.is_empty()) {
        (Some(_), false) => bail!("use either --input or --field, not both"),
        (None, true) => bail!("no counters given: pass --field key=value or --input <file>"),
        (None, false) => Ok(CliSource::Fields(fields_source(fields)?)),
        (Some(path), true) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            log::debug!("reading subjects from {}", path.display());
            match detect_format(path)? {
                InputFormat::Csv => Ok(CliSource::Csv(TabularSource::new(file))),
                InputFormat::Json => Ok(CliSource::Json(
                    JsonSource::from_reader(file)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                )),
            }
        }
    }
}

pub fn load_analysis_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    AnalysisConfig::from_json(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Split `--names` into positional slots. A blank entry leaves its slot
/// unset, so `",B"` names only the second subject.
pub fn parse_names(text: &str) -> Vec<Option<String>> {
    text.split(',')
        .map(str::trim)
        .map(|name| (!name.is_empty()).then(|| name.to_string()))
        .collect()
}

/// Apply `--strict` and the filled `--names` slots on top of a loaded config.
pub fn apply_overrides(config: &mut AnalysisConfig, strict: bool, names: &[Option<String>]) {
    if strict {
        config.validation = ValidationPolicy::Strict;
    }
    if let Some(Some(first)) = names.first() {
        config.subjects.first.clone_from(first);
    }
    if let Some(Some(second)) = names.get(1) {
        config.subjects.second.clone_from(second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(label: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "helldivers-inputs-{}-{label}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(
            detect_format(Path::new("stats.CSV")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            detect_format(Path::new("a/b.json")).unwrap(),
            InputFormat::Json
        );
        assert!(detect_format(Path::new("stats.xlsx")).is_err());
        assert!(detect_format(Path::new("stats")).is_err());
    }

    #[test]
    fn field_assignments_build_one_subject() {
        let fields = vec![
            "missions_played=4".to_string(),
            "Mission Won=3".to_string(),
        ];
        let mut source = fields_source(&fields).unwrap();
        let subjects = source.subjects().unwrap();
        assert_eq!(subjects[0].counters.missions_played, 4);
        assert_eq!(subjects[0].counters.missions_won, 3);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = fields_source(&["kills=3".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("unknown counter field"));
    }

    #[test]
    fn open_source_requires_exactly_one_input() {
        assert!(open_source(None, &[]).is_err());
        let path = temp_file("both.csv", "Deaths\n1\n");
        assert!(open_source(Some(path.as_path()), &["deaths=1".to_string()]).is_err());
        assert!(matches!(
            open_source(Some(path.as_path()), &[]).unwrap(),
            CliSource::Csv(_)
        ));
    }

    #[test]
    fn json_file_opens_as_json_source() {
        let path = temp_file("subject.json", r#"{"deaths": 2}"#);
        let mut source = open_source(Some(path.as_path()), &[]).unwrap();
        assert_eq!(source.subjects().unwrap()[0].counters.deaths, 2);
    }

    #[test]
    fn config_loads_and_overrides_apply() {
        let path = temp_file("config.json", r#"{"subjects": {"first": "Eagle-1"}}"#);
        let mut config = load_analysis_config(Some(&path)).unwrap();
        assert_eq!(config.subjects.first, "Eagle-1");
        assert_eq!(config.subjects.second, "Player 2");

        apply_overrides(&mut config, true, &parse_names(" , Pelican-1"));
        assert_eq!(config.validation, ValidationPolicy::Strict);
        assert_eq!(config.subjects.first, "Eagle-1");
        assert_eq!(config.subjects.second, "Pelican-1");

        apply_overrides(&mut config, false, &parse_names("A,B"));
        assert_eq!(config.subjects.first, "A");
        assert_eq!(config.subjects.second, "B");
    }

    #[test]
    fn names_keep_their_positions() {
        assert_eq!(parse_names("Alpha"), vec![Some("Alpha".to_string())]);
        assert_eq!(
            parse_names(",Bravo"),
            vec![None, Some("Bravo".to_string())]
        );
        assert_eq!(
            parse_names(" A , "),
            vec![Some("A".to_string()), None]
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        assert_eq!(
            load_analysis_config(None).unwrap(),
            AnalysisConfig::default()
        );
    }
}
