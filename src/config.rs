use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::calendar::{default_templates, EventId, TemplateItem};
use crate::theme::ThemeConfig;

pub const APP_NAME: &str = "calendar-scheduler";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Items of the drag panel. Absent means the built-in `event 1` .. `event 4`.
    pub templates: Option<Vec<TemplateConfig>>,
    /// Events present when the calendar opens. Absent means a single all-day
    /// "Welcome" entry today; `seed = []` starts empty.
    pub seed: Vec<SeedConfig>,
    pub theme: ThemeConfig,
    /// First and last hour slot shown in the week and day grids.
    pub day_start_hour: u32,
    pub day_end_hour: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates: None,
            seed: vec![SeedConfig {
                title: "Welcome".to_string(),
                date: "today".to_string(),
                time: None,
            }],
            theme: ThemeConfig::default(),
            day_start_hour: 6,
            day_end_hour: 23,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateConfig {
    pub id: Option<RawId>,
    pub title: String,
    /// `HH:MM`
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeedConfig {
    pub title: String,
    /// `YYYY-MM-DD` or `today`
    pub date: String,
    /// `HH:MM`; absent makes an all-day event.
    pub time: Option<String>,
}

impl Config {
    /// Load from `path`, or from the default location when none is given.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => {
                    tracing::warn!("no config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit {
                return Err(eyre!("No config found at: {}", path.display()));
            }
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read config file at {}", path.display()))?;
        let config = Self::parse(&content)
            .wrap_err_with(|| format!("Failed to parse config file at {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.day_start_hour >= config.day_end_hour || config.day_end_hour > 24 {
            return Err(eyre!(
                "day_start_hour ({}) must be below day_end_hour ({}), which is at most 24",
                config.day_start_hour,
                config.day_end_hour
            ));
        }
        Ok(config)
    }

    pub fn template_items(&self) -> Result<Vec<TemplateItem>> {
        let Some(ref templates) = self.templates else {
            return Ok(default_templates());
        };

        templates
            .iter()
            .enumerate()
            .map(|(i, t)| -> Result<TemplateItem> {
                let id = match t.id {
                    Some(RawId::Number(n)) => EventId::from(n),
                    Some(RawId::Text(ref s)) => EventId::from(s.as_str()),
                    None => EventId::from(i as u64 + 1),
                };
                let time = t
                    .time
                    .as_deref()
                    .map(parse_time)
                    .transpose()
                    .wrap_err_with(|| format!("template {:?}", t.title))?;
                Ok(TemplateItem {
                    id,
                    title: t.title.clone(),
                    time,
                })
            })
            .collect()
    }

    /// Seed entries as `(title, start, all_day)`, resolving `today` against `today`.
    pub fn seed_events(&self, today: NaiveDate) -> Result<Vec<(String, NaiveDateTime, bool)>> {
        self.seed
            .iter()
            .map(|s| -> Result<(String, NaiveDateTime, bool)> {
                let date = if s.date.eq_ignore_ascii_case("today") {
                    today
                } else {
                    NaiveDate::parse_from_str(&s.date, "%Y-%m-%d")
                        .wrap_err_with(|| format!("seed {:?}: invalid date {:?}", s.title, s.date))?
                };
                let time = s
                    .time
                    .as_deref()
                    .map(parse_time)
                    .transpose()
                    .wrap_err_with(|| format!("seed {:?}", s.title))?;
                Ok(match time {
                    Some(t) => (s.title.clone(), date.and_time(t), false),
                    None => (s.title.clone(), date.and_time(NaiveTime::MIN), true),
                })
            })
            .collect()
    }
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").wrap_err_with(|| format!("invalid time {:?}, expected HH:MM", s))
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}

/// Where the rolling log files go.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn default_seed_is_one_all_day_event_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let seeds = Config::default().seed_events(today).unwrap();
        assert_eq!(seeds, vec![("Welcome".to_string(), today.and_time(NaiveTime::MIN), true)]);

        let empty = Config::parse("seed = []").unwrap();
        assert!(empty.seed_events(today).unwrap().is_empty());
    }

    #[test]
    fn default_templates_when_section_absent() {
        let items = Config::default().template_items().unwrap();
        let titles: Vec<_> = items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["event 1", "event 2", "event 3", "event 4"]);
        assert_eq!(items[2].id, EventId::from(3));
    }

    #[test]
    fn templates_accept_numeric_and_text_ids() {
        let config = Config::parse(
            r#"
[[templates]]
id = 10
title = "standup"
time = "09:30"

[[templates]]
id = "review"
title = "code review"

[[templates]]
title = "lunch"
"#,
        )
        .unwrap();

        let items = config.template_items().unwrap();
        assert_eq!(items[0].id, EventId::from(10));
        assert_eq!(items[0].time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(items[1].id, EventId::from("review"));
        assert_eq!(items[2].id, EventId::from(3));
        assert_eq!(items[2].time, None);
    }

    #[test]
    fn empty_template_list_is_kept_empty() {
        let config = Config::parse("templates = []").unwrap();
        assert!(config.template_items().unwrap().is_empty());
    }

    #[test]
    fn bad_template_time_is_an_error() {
        let config = Config::parse(
            r#"
[[templates]]
title = "broken"
time = "9h"
"#,
        )
        .unwrap();
        assert!(config.template_items().is_err());
    }

    #[test]
    fn seed_resolves_today_and_times() {
        let config = Config::parse(
            r#"
[[seed]]
title = "welcome"
date = "today"

[[seed]]
title = "dentist"
date = "2024-06-12"
time = "15:45"
"#,
        )
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let seeds = config.seed_events(today).unwrap();
        assert_eq!(seeds[0], ("welcome".to_string(), today.and_time(NaiveTime::MIN), true));
        assert_eq!(seeds[1].1.format("%Y-%m-%d %H:%M").to_string(), "2024-06-12 15:45");
        assert!(!seeds[1].2);
    }

    #[test]
    fn hour_range_is_checked() {
        assert!(Config::parse("day_start_hour = 10\nday_end_hour = 9").is_err());
        assert!(Config::parse("day_end_hour = 25").is_err());
        let config = Config::parse("day_start_hour = 0\nday_end_hour = 24").unwrap();
        assert_eq!((config.day_start_hour, config.day_end_hour), (0, 24));
    }

    #[test]
    fn load_reads_theme_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
[theme]
preset = "dracula"
event_bg = "#112233"
"##,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.theme.preset.as_deref(), Some("dracula"));
        assert_eq!(config.theme.event_bg.as_deref(), Some("#112233"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn unparsable_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "templates = 3").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
