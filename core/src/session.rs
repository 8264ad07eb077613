//! One storm's analysis state, threaded explicitly through every pass.
//!
//! A session owns the configuration and the history archive of a single
//! storm. Passes on the same session run one after another; independent
//! storms get independent sessions and may run in parallel.

use crate::geodesy::{pressure_hpa, satellite_name, wind_speed_kt};
use crate::history::{CommitOutcome, HistoryRecord, HistoryStore};
use crate::math::{FftAnalyzer, StatsHelper, FFT_FAILURE};
use crate::microwave::{MicrowaveAdjustmentEngine, MicrowaveObservation};
use crate::prelude::{
    AnalysisConfig, AnalysisError, AnalysisResult, IntensityEstimator, TopographySource,
};
use crate::scene::{IrImage, SceneClassification, SceneClassifier};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Everything one analysis pass consumes.
#[derive(Debug, Clone)]
pub struct PassInput {
    /// Time, position and the eye/cloud temperatures of the new analysis.
    pub record: HistoryRecord,
    pub image: IrImage,
    /// 64-bin eye region temperature profile; fills `eye_fft` when present.
    pub eye_profile: Option<Vec<f64>>,
    /// 64-bin cloud ring temperature profile; fills `cloud_fft` when present.
    pub cloud_profile: Option<Vec<f64>>,
    pub microwave: Option<MicrowaveObservation>,
    /// Legacy scene-type code entered by an analyst.
    pub scene_override: Option<i32>,
}

impl PassInput {
    pub fn new(record: HistoryRecord, image: IrImage) -> Self {
        Self {
            record,
            image,
            eye_profile: None,
            cloud_profile: None,
            microwave: None,
            scene_override: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassReport {
    /// The record as committed to the history.
    pub record: HistoryRecord,
    pub classification: SceneClassification,
    pub raw_intensity: f64,
    pub final_intensity: f64,
    pub adjustment_applied: bool,
    /// Number of earlier records the microwave pass rewrote.
    pub revisions: usize,
    pub wind_kt: f64,
    pub pressure_hpa: f64,
    pub commit: CommitOutcome,
}

pub struct AnalysisSession {
    storm_id: String,
    config: AnalysisConfig,
    history: HistoryStore,
    classifier: SceneClassifier,
    engine: MicrowaveAdjustmentEngine,
    fft: FftAnalyzer,
    log: LogManager,
    metrics: MetricsRecorder,
}

impl AnalysisSession {
    pub fn new(storm_id: &str, config: AnalysisConfig) -> AnalysisResult<Self> {
        Self::with_history(storm_id, config, HistoryStore::new())
    }

    pub fn with_history(
        storm_id: &str,
        config: AnalysisConfig,
        history: HistoryStore,
    ) -> AnalysisResult<Self> {
        config.validate()?;
        let log = LogManager::new(storm_id);
        log.record(&format!("session opened with {} history records", history.len()));
        Ok(Self {
            storm_id: storm_id.to_string(),
            classifier: SceneClassifier::new(config.clone()),
            engine: MicrowaveAdjustmentEngine::new(config.clone()),
            config,
            history,
            fft: FftAnalyzer::new(),
            log,
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn storm_id(&self) -> &str {
        &self.storm_id
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn into_history(self) -> HistoryStore {
        self.history
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Classifies the scene, estimates the intensity, runs the microwave
    /// adjustment and commits the new record.
    pub fn run_pass(
        &mut self,
        input: PassInput,
        topography: &dyn TopographySource,
        estimator: &dyn IntensityEstimator,
    ) -> AnalysisResult<PassReport> {
        let PassInput {
            mut record,
            image,
            eye_profile,
            cloud_profile,
            microwave,
            scene_override,
        } = input;
        if !(record.latitude.is_finite() && record.longitude.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "storm center ({}, {}) is not finite",
                record.latitude, record.longitude
            )));
        }

        record.land = topography.land_flag(record.latitude, record.longitude);
        if let Some(profile) = eye_profile {
            record.eye_fft = self.harmonics(&profile, "eye");
        }
        if let Some(profile) = cloud_profile {
            record.cloud_fft = self.harmonics(&profile, "cloud");
        }

        let classification = self.classifier.classify(&record, &self.history, &image);
        classification.apply_to(&mut record);
        if let Some(code) = scene_override {
            if !record.override_scene(code) {
                return Err(AnalysisError::InvalidInput(format!(
                    "scene override code {} is outside 0..=7",
                    code
                )));
            }
            self.log.record(&format!(
                "scene override {}: {} / {}",
                code,
                record.eye_scene.label(),
                record.cloud_scene.label()
            ));
        }

        let raw_intensity = estimator.estimate(&record, &self.history);
        record.set_intensity(raw_intensity);

        let (final_intensity, adjustment_applied, revisions) = match microwave {
            Some(observation) => {
                let plan = self
                    .engine
                    .plan(&self.history, &record, &observation, raw_intensity);
                let revisions = self.history.apply_patches(&plan.patches)?;
                record = plan.current;
                (plan.intensity, plan.applied, revisions)
            }
            None => (StatsHelper::round_tenth(raw_intensity), false, 0),
        };
        record.set_final_intensity(final_intensity);

        let wind_kt = wind_speed_kt(final_intensity);
        let pressure = pressure_hpa(
            final_intensity,
            record.latitude,
            record.longitude,
            &self.config,
        );
        let commit = self.history.commit(record.clone());
        self.metrics.record_pass(adjustment_applied, revisions);
        self.log.record(&format!(
            "{} {:06} {}: {} / {}, T# {:.1} ({:.0} kt, {:.1} hPa){}",
            record.date,
            record.time,
            satellite_name(record.satellite_id),
            record.eye_scene.label(),
            record.cloud_scene.label(),
            final_intensity,
            wind_kt,
            pressure,
            if adjustment_applied { ", microwave adjusted" } else { "" }
        ));

        Ok(PassReport {
            record,
            classification,
            raw_intensity,
            final_intensity,
            adjustment_applied,
            revisions,
            wind_kt,
            pressure_hpa: pressure,
            commit,
        })
    }

    fn harmonics(&mut self, profile: &[f64], region: &str) -> i32 {
        let count = self.fft.harmonic_count(profile);
        if count == FFT_FAILURE {
            self.metrics.record_fft_failure();
            self.log.caution(&format!("{} harmonic analysis failed", region));
        }
        count
    }
}
