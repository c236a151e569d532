use crate::errors::{AppError, AppResult};
use crate::models::{Domain, FacetValue, QueryState, SortDirection, SortSpec};
use crate::schema::TIME_KEY;
use crate::time_range::TimePreset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetSettings {
    pub default_sort: SortSpec,
    pub domain_sorts: BTreeMap<Domain, SortSpec>,
    pub default_time_preset: Option<String>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for FacetSettings {
    fn default() -> Self {
        let mut domain_sorts = BTreeMap::new();
        domain_sorts.insert(Domain::Users, SortSpec::new("name_asc", SortDirection::Asc));
        Self {
            default_sort: SortSpec::default(),
            domain_sorts,
            default_time_preset: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl FacetSettings {
    pub fn sort_for(&self, domain: Domain) -> SortSpec {
        self.domain_sorts
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| self.default_sort.clone())
    }

    /// The state a page starts from and returns to on "Clear".
    pub fn initial_state(&self, domain: Domain) -> QueryState {
        let mut state = QueryState::new().with_sort(self.sort_for(domain));
        if domain.has_time_window() {
            if let Some(preset) = self.default_time_preset.as_deref() {
                state.values.insert(TIME_KEY.to_string(), FacetValue::from(preset));
            }
        }
        state
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.default_sort.by.trim().is_empty() {
            return Err(AppError::Config("defaultSort.by cannot be empty".to_string()));
        }
        if let Some((domain, _)) = self.domain_sorts.iter().find(|(_, sort)| sort.by.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "domainSorts.{}.by cannot be empty",
                domain.as_str()
            )));
        }
        if let Some(preset) = self.default_time_preset.as_deref() {
            match TimePreset::parse(preset) {
                None => {
                    return Err(AppError::Config(format!("Unknown defaultTimePreset '{}'", preset)));
                }
                Some(TimePreset::Custom) => {
                    return Err(AppError::Config(
                        "defaultTimePreset cannot be 'custom' without bounds".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }
        if self.log_level.trim().is_empty() {
            return Err(AppError::Config("logLevel cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Reads YAML (`.yaml`/`.yml`) or JSON settings. A missing file yields the
/// defaults.
pub fn load_settings(path: &Path) -> AppResult<FacetSettings> {
    if !path.exists() {
        tracing::info!(path = %path.to_string_lossy(), "settings file not found, using defaults");
        return Ok(FacetSettings::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let settings: FacetSettings = if raw.trim().is_empty() {
        FacetSettings::default()
    } else if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    settings.validate()?;
    Ok(settings)
}
