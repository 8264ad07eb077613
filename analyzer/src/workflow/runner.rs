use crate::generator::profile::build_scene;
use crate::workflow::collaborators::{BoxTopography, SceneTableEstimator};
use crate::workflow::config::{PassConfig, StormConfig, WorkflowConfig};
use adtcore::history::{trend, TrendTarget};
use adtcore::math::StatsHelper;
use adtcore::session::{AnalysisSession, PassInput};
use adtcore::telemetry::MetricsSnapshot;
use adtcore::{AnalysisConfig, HistoryStore};
use anyhow::Context;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

const TREND_WINDOW_HOURS: f64 = 12.0;

#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub date: i32,
    pub time: i32,
    pub eye_scene: &'static str,
    pub cloud_scene: &'static str,
    pub raw_intensity: f64,
    pub final_intensity: f64,
    pub wind_kt: f64,
    pub pressure_hpa: f64,
    pub adjusted: bool,
    pub revisions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StormSummary {
    pub storm_id: String,
    pub passes: Vec<PassSummary>,
    pub metrics: MetricsSnapshot,
    pub history_records: usize,
    /// Final T# change per day over the last 12 hours of history.
    pub intensification_per_day: f64,
    pub mean_final_intensity: f64,
    pub snapshot: Option<PathBuf>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Runs every pass of one storm in time order on a fresh session.
    pub fn run_storm(&self, storm: &StormConfig) -> anyhow::Result<StormSummary> {
        let history = match &storm.history {
            Some(path) => HistoryStore::load(path)
                .with_context(|| format!("loading history for {}", storm.id))?,
            None => HistoryStore::new(),
        };
        let mut session =
            AnalysisSession::with_history(&storm.id, self.config.analysis.clone(), history)
                .with_context(|| format!("opening session for {}", storm.id))?;
        let topography = BoxTopography::new(storm.land_boxes.clone());

        let mut passes = Vec::with_capacity(storm.passes.len());
        for pass in &storm.passes {
            let summary = Self::run_pass(&mut session, &topography, pass).with_context(|| {
                format!("{} pass {} {:06}", storm.id, pass.date, pass.time)
            })?;
            passes.push(summary);
        }

        let snapshot = match &self.config.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating output directory {}", dir.display()))?;
                let path = dir.join(format!("{}.json", storm.id));
                session
                    .history()
                    .save(&path)
                    .with_context(|| format!("writing history for {}", storm.id))?;
                Some(path)
            }
            None => None,
        };

        let finals: Vec<f64> = passes.iter().map(|p| p.final_intensity).collect();
        info!("{}: {} passes complete", storm.id, passes.len());
        Ok(StormSummary {
            storm_id: storm.id.clone(),
            metrics: session.metrics(),
            history_records: session.history().len(),
            intensification_per_day: intensification_rate(
                session.history(),
                &self.config.analysis,
            ),
            mean_final_intensity: StatsHelper::mean(&finals),
            passes,
            snapshot,
        })
    }

    fn run_pass(
        session: &mut AnalysisSession,
        topography: &BoxTopography,
        pass: &PassConfig,
    ) -> anyhow::Result<PassSummary> {
        let scene = build_scene(&pass.scene, pass.latitude, pass.longitude)
            .context("generating synthetic scene")?;
        let mut record = scene.record(pass.date, pass.time, pass.latitude, pass.longitude);
        if let Some(id) = pass.satellite_id {
            record.satellite_id = id;
        }
        let input = PassInput {
            record,
            image: scene.image,
            eye_profile: Some(scene.eye_profile),
            cloud_profile: Some(scene.cloud_profile),
            microwave: pass.microwave,
            scene_override: pass.scene_override,
        };
        let estimator = SceneTableEstimator::new(pass.intensity);
        let report = session
            .run_pass(input, topography, &estimator)
            .context("running analysis pass")?;

        Ok(PassSummary {
            date: report.record.date,
            time: report.record.time,
            eye_scene: report.record.eye_scene.label(),
            cloud_scene: report.record.cloud_scene.label(),
            raw_intensity: report.raw_intensity,
            final_intensity: report.final_intensity,
            wind_kt: report.wind_kt,
            pressure_hpa: report.pressure_hpa,
            adjusted: report.adjustment_applied,
            revisions: report.revisions,
        })
    }

    /// One blocking worker per storm; storms share nothing.
    pub async fn run_all(&self) -> anyhow::Result<Vec<StormSummary>> {
        let mut handles = Vec::with_capacity(self.config.storms.len());
        for storm in self.config.storms.iter().cloned() {
            let runner = self.clone();
            handles.push(tokio::task::spawn_blocking(move || runner.run_storm(&storm)));
        }
        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            summaries.push(handle.await.context("joining storm worker")??);
        }
        Ok(summaries)
    }
}

/// Positive while the storm strengthens; the fit itself runs over record
/// age, so its slope has the opposite sign.
fn intensification_rate(history: &HistoryStore, config: &AnalysisConfig) -> f64 {
    match history.records().split_last() {
        Some((last, earlier)) => {
            0.0 - trend(earlier, last, TREND_WINDOW_HOURS, TrendTarget::FinalT, config)
        }
        None => 0.0,
    }
}
