use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::state::{
    is_armed, score_floor, transition, AdjustmentState, RampAnchors, TransitionInputs,
    ARM_SCORE, HIGH_SCORE, HIGH_TARGET, HOLD_DAYS, LAND_CONTACT_DAYS, RAMP_DAYS, RAMP_TARGET,
    STALE_DAYS, COMMENT_OFF_HOLD,
};
use crate::geodesy::time::calctime;
use crate::history::{CloudScene, HistoryRecord, HistoryStore, LandFlag, RecordPatch};
use crate::math::StatsHelper;
use crate::prelude::AnalysisConfig;

const MISSING_SCORE_LIMIT: f64 = -900.0;
const CONSECUTIVE_SCENES_OFF: usize = 3;
const EYE_RESET_CI: f64 = 4.0;

/// A passive-microwave eye score and the time of its overpass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrowaveObservation {
    pub score: f64,
    pub date: i32,
    pub time: i32,
}

impl MicrowaveObservation {
    /// Archive value for "no score available".
    pub const MISSING: f64 = -920.0;

    pub fn new(score: f64, date: i32, time: i32) -> Self {
        Self { score, date, time }
    }

    pub fn is_missing(&self) -> bool {
        self.score < MISSING_SCORE_LIMIT
    }

    pub fn time_value(&self) -> f64 {
        calctime(self.date, self.time)
    }

    fn from_record(record: &HistoryRecord) -> Self {
        Self::new(record.mw_score, record.mw_date, record.mw_time)
    }

    fn stamp(&self, record: &mut HistoryRecord) {
        record.mw_score = self.score;
        record.mw_date = self.date;
        record.mw_time = self.time;
    }
}

/// Result of one adjustment pass, computed without touching the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentPlan {
    /// The full revised history.
    pub timeline: Vec<HistoryRecord>,
    /// One entry per committed record the pass rewrites.
    pub patches: Vec<RecordPatch>,
    /// The current record with state, comment and microwave fields set.
    pub current: HistoryRecord,
    /// Rounded T# for the current record.
    pub intensity: f64,
    pub applied: bool,
    /// The observation actually used, after restoring a missing score.
    pub observation: MicrowaveObservation,
}

/// Outcome of the checks that end a pass before any history revision.
#[derive(Debug, Clone, PartialEq)]
struct EarlyExit {
    state: Option<AdjustmentState>,
    intensity: f64,
    applied: bool,
    comment: Option<String>,
}

/// Latest adjustment context before the overpass time.
#[derive(Debug, Clone, Default)]
struct PriorScan {
    on: bool,
    state: Option<AdjustmentState>,
    last_score: f64,
    anchors: RampAnchors,
}

/// Blends IR intensities with microwave eye scores and revises the
/// recent history to match.
#[derive(Debug, Clone)]
pub struct MicrowaveAdjustmentEngine {
    config: AnalysisConfig,
}

impl MicrowaveAdjustmentEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    fn usable(&self, record: &HistoryRecord) -> bool {
        record.is_usable(self.config.land_flag_enabled)
    }

    /// Plans the adjustment of `current` given the raw `candidate` T#.
    ///
    /// Running the same plan against its own revised timeline produces no
    /// further patches.
    pub fn plan(
        &self,
        history: &HistoryStore,
        current: &HistoryRecord,
        observation: &MicrowaveObservation,
        candidate: f64,
    ) -> AdjustmentPlan {
        let mut timeline = history.records().to_vec();
        let mut current = current.clone();
        let observation = self.restore_missing(history, *observation);
        let current_time = current.time_value();
        let mw_time = observation.time_value();

        let mut armed = is_armed(observation.score);
        let floor = score_floor(observation.score, candidate);
        if current_time > mw_time + RAMP_DAYS {
            armed = false;
        }
        debug!(
            "microwave score {:.1} at {:.4}, floor {:.2}, armed {}",
            observation.score, mw_time, floor, armed
        );

        let mut exit = if current_time - mw_time > STALE_DAYS {
            Some(self.stale_protocol(&timeline, &current, candidate))
        } else {
            self.eye_check(&timeline, &current, mw_time, candidate)
        };
        if let Some(land_exit) = self.land_check(&timeline, &current, candidate) {
            exit = Some(land_exit);
        }

        let (intensity, applied) = match exit {
            Some(exit) => {
                for record in timeline.iter_mut().filter(|r| r.time_value() >= mw_time) {
                    observation.stamp(record);
                }
                current.rule8 = exit.state;
                if let Some(comment) = exit.comment {
                    current.comment = comment;
                }
                (exit.intensity, exit.applied)
            }
            None => self.revise(
                &mut timeline,
                &mut current,
                &observation,
                RevisionInputs {
                    candidate,
                    floor,
                    armed,
                    mw_time,
                },
            ),
        };

        observation.stamp(&mut current);
        let patches: Vec<RecordPatch> = history
            .records()
            .iter()
            .zip(&timeline)
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(index, (before, after))| RecordPatch {
                index,
                before: before.clone(),
                after: after.clone(),
            })
            .collect();
        let intensity = StatsHelper::round_tenth(intensity);
        info!(
            "microwave pass: intensity {:.1}, applied {}, state {} (rule8 {}), {} revisions",
            intensity,
            applied,
            current.rule8.map_or("-", AdjustmentState::label),
            current.rule8.map_or(0, AdjustmentState::legacy_code),
            patches.len()
        );

        AdjustmentPlan {
            timeline,
            patches,
            current,
            intensity,
            applied,
            observation,
        }
    }

    /// Replaces a missing score with the latest one found on a usable record.
    fn restore_missing(
        &self,
        history: &HistoryStore,
        observation: MicrowaveObservation,
    ) -> MicrowaveObservation {
        if !observation.is_missing() {
            return observation;
        }
        let restored = history
            .records()
            .iter()
            .rev()
            .find(|r| self.usable(r))
            .map(MicrowaveObservation::from_record)
            .unwrap_or(observation);
        debug!("missing microwave score restored to {:.1}", restored.score);
        restored
    }

    /// Overpass older than eight hours: hold an active adjustment, drop it
    /// after six hours of holding or a third straight shear scene.
    fn stale_protocol(
        &self,
        timeline: &[HistoryRecord],
        current: &HistoryRecord,
        candidate: f64,
    ) -> EarlyExit {
        let current_time = current.time_value();
        let mut last_state = None;
        let mut last_ci = 0.0;
        let mut shear_run = 0;
        let mut hold_started: Option<f64> = None;
        let mut last_time = 0.0;

        for record in timeline
            .iter()
            .filter(|r| self.usable(r) && r.time_value() < current_time)
        {
            let time = record.time_value();
            last_state = record.rule8;
            last_ci = record.ci;
            last_time = time;
            if record.cloud_scene == CloudScene::Shear {
                shear_run += 1;
            } else {
                shear_run = 0;
            }
            match record.rule8 {
                Some(AdjustmentState::Hold { .. }) => {
                    hold_started.get_or_insert(time);
                }
                _ => hold_started = None,
            }
        }

        let third_shear =
            shear_run + 1 >= CONSECUTIVE_SCENES_OFF && current.cloud_scene == CloudScene::Shear;
        let off = EarlyExit {
            state: Some(AdjustmentState::Off),
            intensity: candidate,
            applied: false,
            comment: None,
        };
        let hold = |since: f64| EarlyExit {
            state: Some(AdjustmentState::Hold { since }),
            intensity: last_ci,
            applied: true,
            comment: None,
        };

        match last_state {
            Some(AdjustmentState::SteadyOn) => {
                if third_shear {
                    off
                } else {
                    hold(current_time)
                }
            }
            Some(AdjustmentState::Hold { .. }) => {
                let since = hold_started.unwrap_or(last_time);
                if third_shear {
                    off
                } else if current_time - since >= HOLD_DAYS {
                    EarlyExit {
                        comment: Some(COMMENT_OFF_HOLD.to_string()),
                        ..off
                    }
                } else {
                    hold(since)
                }
            }
            Some(AdjustmentState::Off) => off,
            _ => EarlyExit {
                state: current.rule8,
                ..off
            },
        }
    }

    /// Three straight eye scenes mean the IR estimate stands on its own.
    fn eye_check(
        &self,
        timeline: &[HistoryRecord],
        current: &HistoryRecord,
        mw_time: f64,
        candidate: f64,
    ) -> Option<EarlyExit> {
        let current_time = current.time_value();
        let mut eye_run = 0;
        let mut last_ci = 1.0;
        let mut last_state = None;
        let mut off = false;

        for record in timeline {
            let time = record.time_value();
            if self.usable(record) && time < current_time {
                if time < mw_time {
                    last_ci = record.ci;
                }
                last_state = record.rule8;
                if record.eye_scene.has_eye() {
                    eye_run += 1;
                } else {
                    eye_run = 0;
                }
                if eye_run >= CONSECUTIVE_SCENES_OFF {
                    off = true;
                }
            }
            if last_ci < EYE_RESET_CI || last_state == Some(AdjustmentState::RampB) {
                off = false;
            }
        }
        if current.eye_scene.has_eye() && eye_run + 1 >= CONSECUTIVE_SCENES_OFF {
            off = true;
        }
        if !off {
            return None;
        }
        debug!("three consecutive eye scenes, adjustment off");
        let state = match last_state {
            Some(state) if state.is_active() => Some(AdjustmentState::Off),
            _ => current.rule8,
        };
        Some(EarlyExit {
            state,
            intensity: candidate,
            applied: false,
            comment: None,
        })
    }

    /// Three hours or more over land switches an active adjustment off.
    fn land_check(
        &self,
        timeline: &[HistoryRecord],
        current: &HistoryRecord,
        candidate: f64,
    ) -> Option<EarlyExit> {
        let mut last_state = None;
        let mut last_water_time = 0.0;
        let mut over_land = false;

        for record in timeline {
            let time = record.time_value();
            if self.usable(record) {
                last_state = record.rule8;
                last_water_time = time;
                over_land = false;
            } else if time - last_water_time >= LAND_CONTACT_DAYS {
                over_land = true;
            }
        }

        let active = last_state.map_or(false, AdjustmentState::is_active);
        if over_land && current.land == LandFlag::Water && active {
            debug!("land contact for three hours, adjustment off");
            return Some(EarlyExit {
                state: Some(AdjustmentState::Off),
                intensity: candidate,
                applied: false,
                comment: None,
            });
        }
        None
    }

    fn scan_prior(&self, timeline: &[HistoryRecord], mw_time: f64) -> PriorScan {
        let mut scan = PriorScan::default();
        let mut run_start = true;
        for record in timeline
            .iter()
            .filter(|r| r.time_value() < mw_time && self.usable(r))
        {
            let time = record.time_value();
            scan.last_score = record.mw_score;
            scan.anchors.last_value = record.ci;
            scan.state = record.rule8;
            scan.on = record.rule8.map_or(false, AdjustmentState::is_on);
            if scan.on {
                if run_start {
                    scan.anchors.first_value = record.ci;
                    scan.anchors.first_time = time;
                    run_start = false;
                }
            } else {
                run_start = true;
            }
            if matches!(
                record.rule8,
                Some(AdjustmentState::RampA | AdjustmentState::RampB | AdjustmentState::SteadyOn)
            ) {
                scan.anchors.last_time = time;
            }
        }
        scan
    }

    /// Backward merge before the overpass, forward walk after it, then the
    /// current record. Returns the unrounded intensity and applied flag.
    fn revise(
        &self,
        timeline: &mut [HistoryRecord],
        current: &mut HistoryRecord,
        observation: &MicrowaveObservation,
        inputs: RevisionInputs,
    ) -> (f64, bool) {
        let RevisionInputs {
            candidate,
            mut floor,
            armed,
            mw_time,
        } = inputs;
        let scan = self.scan_prior(timeline, mw_time);
        let mut anchors = scan.anchors;
        let mut state = scan.state;

        match (scan.on, armed) {
            (false, true) => {
                debug!("adjustment off, now on: merging backward");
                if self.merge_backward(timeline, mw_time, floor, &mut anchors) {
                    state = Some(AdjustmentState::RampA);
                }
            }
            (true, true) => {
                debug!("adjustment on, still on");
                self.merge_while_on(timeline, mw_time, floor, observation.score, &scan, &mut anchors);
            }
            _ => {}
        }

        if timeline.iter().any(|r| r.time_value() >= mw_time) {
            for record in timeline.iter_mut() {
                if record.rule8 == Some(AdjustmentState::Off) {
                    state = Some(AdjustmentState::Off);
                }
                if !self.usable(record) {
                    continue;
                }
                let time = record.time_value();
                if time >= mw_time {
                    let step = transition(
                        state,
                        &TransitionInputs {
                            time,
                            score: observation.score,
                            floor,
                            mw_time,
                            committed: true,
                        },
                        anchors,
                    );
                    if state.is_some() {
                        record.rule8 = step.state;
                    }
                    if let Some(value) = step.intensity {
                        record.set_intensity(value);
                    }
                    if let Some(comment) = step.comment {
                        record.comment = comment;
                    }
                    anchors = step.anchors;
                    floor = step.floor;
                    observation.stamp(record);
                    debug!(
                        "forward {:.4}: {} ci {:.2}",
                        time,
                        record.rule8.map_or("-", AdjustmentState::label),
                        record.ci
                    );
                }
                state = record.rule8;
            }
        }

        let step = transition(
            state,
            &TransitionInputs {
                time: current.time_value(),
                score: observation.score,
                floor,
                mw_time,
                committed: false,
            },
            anchors,
        );
        if state.is_some() {
            current.rule8 = step.state;
        }
        if let Some(comment) = step.comment {
            current.comment = comment;
        }
        (step.intensity.unwrap_or(candidate), step.applied)
    }

    /// Blends the 12 hours before the overpass from their starting value up
    /// to the floor. Returns whether any record precedes the overpass.
    fn merge_backward(
        &self,
        timeline: &mut [HistoryRecord],
        mw_time: f64,
        floor: f64,
        anchors: &mut RampAnchors,
    ) -> bool {
        let window_start = mw_time - RAMP_DAYS;
        let mut origin: Option<(f64, f64)> = None;
        let mut any_before = false;
        for record in timeline.iter_mut() {
            let time = record.time_value();
            if time >= mw_time {
                continue;
            }
            any_before = true;
            if self.usable(record) && time >= window_start {
                let (start_value, start_time) = *origin.get_or_insert((record.ci, time));
                if record.rule8 != Some(AdjustmentState::RampA) {
                    let comment = format!(
                        "MWinit1={:3.1}/{:3.1}/{:3.1}",
                        record.traw, record.tfinal, record.ci
                    );
                    let fraction = (time - start_time) / (mw_time - start_time);
                    let target = floor.max(start_value);
                    record.set_intensity(StatsHelper::interpolate(start_value, target, fraction));
                    record.rule8 = Some(AdjustmentState::RampA);
                    record.comment = comment;
                } else {
                    debug!("record at {:.4} already merged backward", time);
                }
            }
            anchors.last_value = record.ci;
        }
        any_before
    }

    /// Already on: lift the pre-overpass window to the high value when the
    /// score crosses it, or resume the ramp after a hold.
    fn merge_while_on(
        &self,
        timeline: &mut [HistoryRecord],
        mw_time: f64,
        floor: f64,
        score: f64,
        scan: &PriorScan,
        anchors: &mut RampAnchors,
    ) {
        let window_start = mw_time - RAMP_DAYS;
        let upgrade = scan.last_score < HIGH_SCORE && floor >= HIGH_TARGET;
        let resume = scan.last_score < ARM_SCORE && score >= ARM_SCORE;
        let mut origin: Option<(f64, f64)> = None;

        for record in timeline.iter_mut() {
            let time = record.time_value();
            if time >= mw_time {
                continue;
            }
            if upgrade {
                if self.usable(record) && time >= window_start {
                    let (start_value, start_time) = *origin.get_or_insert((record.ci, time));
                    if record.comment.is_empty() {
                        record.comment = format!(
                            "MWinit2={:3.1}/{:3.1}/{:3.1}",
                            record.traw, record.tfinal, record.ci
                        );
                    }
                    let fraction = (time - start_time) / (mw_time - start_time);
                    record.set_intensity(StatsHelper::interpolate(start_value, floor, fraction));
                    promote_to_steady(record);
                }
            } else if resume
                && self.usable(record)
                && time >= scan.anchors.first_time
                && matches!(record.rule8, Some(AdjustmentState::Hold { .. }))
            {
                if record.comment.is_empty() {
                    record.comment = format!(
                        "MWinit3={:3.1}/{:3.1}/{:3.1}",
                        record.traw, record.tfinal, record.ci
                    );
                }
                let fraction = ((time - scan.anchors.first_time) / RAMP_DAYS).min(1.0);
                record.set_intensity(StatsHelper::interpolate(
                    scan.anchors.first_value,
                    RAMP_TARGET,
                    fraction,
                ));
                promote_to_steady(record);
            }
            anchors.last_value = record.ci;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RevisionInputs {
    candidate: f64,
    floor: f64,
    armed: bool,
    mw_time: f64,
}

/// Steady, holding and off records rejoin the steady state.
fn promote_to_steady(record: &mut HistoryRecord) {
    if matches!(
        record.rule8,
        Some(AdjustmentState::SteadyOn | AdjustmentState::Hold { .. } | AdjustmentState::Off)
    ) {
        record.rule8 = Some(AdjustmentState::SteadyOn);
    }
}
