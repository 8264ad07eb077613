use adtcore::microwave::MicrowaveObservation;
use adtcore::AnalysisConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::collaborators::LandBox;
use crate::generator::profile::GeneratorConfig;
use crate::generator::template::SceneTemplate;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub analysis: AnalysisConfig,
    /// Directory receiving one `<storm>.json` history snapshot per storm.
    pub output_dir: Option<PathBuf>,
    pub storms: Vec<StormConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StormConfig {
    pub id: String,
    /// Existing history snapshot to continue from.
    #[serde(default)]
    pub history: Option<PathBuf>,
    #[serde(default)]
    pub land_boxes: Vec<LandBox>,
    pub passes: Vec<PassConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassConfig {
    pub date: i32,
    pub time: i32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub satellite_id: Option<i32>,
    #[serde(default)]
    pub scene: GeneratorConfig,
    /// Raw T# to use instead of the scene-table estimate.
    #[serde(default)]
    pub intensity: Option<f64>,
    #[serde(default)]
    pub microwave: Option<MicrowaveObservation>,
    #[serde(default)]
    pub scene_override: Option<i32>,
}

/// Command line settings that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub init_raw_t: Option<f64>,
    pub manual_rmw_km: Option<f64>,
    pub disable_land_check: bool,
    pub output_dir: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .analysis
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// A single developing storm: band, CDO, CDO and eye scenes over ten
    /// hours with a microwave overpass shortly before the last image.
    pub fn offline(seed: u64) -> Self {
        let pass = |time: i32, template: SceneTemplate, offset: u64| PassConfig {
            date: 2005250,
            time,
            latitude: 20.0 + f64::from(time / 10000) * 0.05,
            longitude: -60.0 + f64::from(time / 10000) * 0.1,
            satellite_id: Some(70),
            scene: GeneratorConfig {
                template,
                seed: seed + offset,
                ..GeneratorConfig::default()
            },
            intensity: None,
            microwave: None,
            scene_override: None,
        };
        let mut passes = vec![
            pass(20000, SceneTemplate::Band, 0),
            pass(60000, SceneTemplate::Cdo, 1),
            pass(100000, SceneTemplate::Cdo, 2),
            pass(120000, SceneTemplate::Eye, 3),
        ];
        if let Some(last) = passes.last_mut() {
            last.microwave = Some(MicrowaveObservation::new(45.0, 2005250, 110000));
        }
        Self {
            analysis: AnalysisConfig::default(),
            output_dir: None,
            storms: vec![StormConfig {
                id: "OFFLINE01".to_string(),
                history: None,
                land_boxes: Vec::new(),
                passes,
            }],
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> anyhow::Result<()> {
        if let Some(value) = overrides.init_raw_t {
            self.analysis.init_raw_t = value;
        }
        if let Some(value) = overrides.manual_rmw_km {
            self.analysis.manual_rmw_km = value;
        }
        if overrides.disable_land_check {
            self.analysis.land_flag_enabled = false;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = Some(dir.clone());
        }
        self.analysis
            .validate()
            .context("validating command line overrides")?;
        Ok(())
    }
}
