//! Per-record microwave adjustment state and its transition table.

use serde::{Deserialize, Serialize};

use crate::math::StatsHelper;

/// Scores at or above this arm the adjustment.
pub const ARM_SCORE: f64 = 20.0;
/// Scores at or above this floor the intensity at the high value.
pub const HIGH_SCORE: f64 = 60.0;
pub const MODERATE_FLOOR: f64 = 4.31;
pub const HIGH_FLOOR: f64 = 5.01;
/// Value a moderate-score ramp converges to.
pub const RAMP_TARGET: f64 = 4.8;
pub const HIGH_TARGET: f64 = 5.0;

pub const RAMP_DAYS: f64 = 0.5;
pub const HOLD_DAYS: f64 = 0.25;
pub const STALE_DAYS: f64 = 0.3333;
pub const LAND_CONTACT_DAYS: f64 = 0.125;

pub const COMMENT_OFF_STALE: &str = "MW OFF  >=12hrs old";
pub const COMMENT_OFF_HOLD: &str = "MW OFF HOLD >=6hrs old";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AdjustmentState {
    Off,
    /// Merged backward ahead of a new overpass.
    RampA,
    /// First record after the overpass; anchors the forward ramp.
    RampB,
    SteadyOn,
    /// Holding the last adjusted value since `since` (calctime days).
    Hold { since: f64 },
}

impl AdjustmentState {
    pub fn legacy_code(self) -> i32 {
        match self {
            Self::RampA => 30,
            Self::RampB => 31,
            Self::SteadyOn => 32,
            Self::Hold { .. } => 33,
            Self::Off => 34,
        }
    }

    /// Adjustment is being applied to the record.
    pub fn is_on(self) -> bool {
        matches!(self, Self::RampB | Self::SteadyOn | Self::Hold { .. })
    }

    /// Any state other than off.
    pub fn is_active(self) -> bool {
        self != Self::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::RampA => "RAMP-A",
            Self::RampB => "RAMP-B",
            Self::SteadyOn => "ON",
            Self::Hold { .. } => "HOLD",
        }
    }
}

pub fn is_armed(score: f64) -> bool {
    score >= ARM_SCORE
}

/// Intensity floor implied by a microwave score, or `candidate` when the
/// score does not arm the adjustment.
pub fn score_floor(score: f64, candidate: f64) -> f64 {
    if score >= HIGH_SCORE {
        HIGH_FLOOR
    } else if score >= ARM_SCORE {
        MODERATE_FLOOR
    } else {
        candidate
    }
}

/// The (value, time) pairs every blend interpolates between.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RampAnchors {
    pub first_value: f64,
    pub first_time: f64,
    pub last_value: f64,
    pub last_time: f64,
}

impl RampAnchors {
    fn ramp_end(&self) -> f64 {
        self.first_time + RAMP_DAYS
    }

    /// Linear ramp from the first anchor toward [`RAMP_TARGET`].
    fn ramp_at(&self, time: f64) -> f64 {
        let fraction = 1.0 - (self.ramp_end() - time) / RAMP_DAYS;
        StatsHelper::interpolate(self.first_value, RAMP_TARGET, fraction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionInputs {
    pub time: f64,
    pub score: f64,
    /// Running floor; starts at [`score_floor`] and follows holds.
    pub floor: f64,
    pub mw_time: f64,
    /// The record is a committed one revised by the forward walk, not the
    /// current record.
    pub committed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: Option<AdjustmentState>,
    /// New T# for the record, `None` to leave it alone.
    pub intensity: Option<f64>,
    pub applied: bool,
    /// Replacement comment; an empty string clears it.
    pub comment: Option<String>,
    pub anchors: RampAnchors,
    pub floor: f64,
}

/// Advances the state of the record preceding `inputs.time`.
pub fn transition(
    previous: Option<AdjustmentState>,
    inputs: &TransitionInputs,
    anchors: RampAnchors,
) -> Transition {
    let mut next = Transition {
        state: previous,
        intensity: None,
        applied: false,
        comment: None,
        anchors,
        floor: inputs.floor,
    };
    let Some(previous) = previous else {
        return next;
    };
    let time = inputs.time;
    let armed = is_armed(inputs.score);
    let steady_value = |anchors: &RampAnchors| {
        if inputs.score >= HIGH_SCORE {
            HIGH_TARGET
        } else {
            anchors.ramp_at(time)
        }
    };

    match previous {
        AdjustmentState::RampA => {
            let value = inputs.floor.max(anchors.last_value);
            next.state = Some(AdjustmentState::RampB);
            next.anchors = RampAnchors {
                first_value: value,
                first_time: time,
                last_value: value,
                last_time: time,
            };
            next.intensity = Some(value);
            next.applied = true;
        }
        AdjustmentState::RampB => {
            next.state = Some(AdjustmentState::SteadyOn);
            next.anchors.last_time = time;
            next.applied = true;
            if time <= anchors.ramp_end() {
                let value = steady_value(&anchors);
                next.anchors.last_value = value;
                next.intensity = Some(value);
            } else if !inputs.committed {
                next.intensity = Some(anchors.last_value);
            }
        }
        AdjustmentState::SteadyOn => {
            let in_ramp = time <= anchors.ramp_end();
            if in_ramp || time <= inputs.mw_time + RAMP_DAYS {
                if armed {
                    let value = if in_ramp {
                        steady_value(&anchors)
                    } else {
                        anchors.last_value
                    };
                    next.state = Some(AdjustmentState::SteadyOn);
                    next.anchors.last_value = value;
                    next.anchors.last_time = time;
                    next.intensity = Some(value);
                } else {
                    next.state = Some(AdjustmentState::Hold { since: time });
                    next.intensity = Some(anchors.last_value);
                    next.floor = anchors.last_value;
                }
                next.applied = true;
            } else {
                next.state = Some(AdjustmentState::Off);
                next.intensity = Some(anchors.last_value);
                if !inputs.committed {
                    next.comment = Some(COMMENT_OFF_STALE.to_string());
                }
            }
        }
        AdjustmentState::Hold { since } => {
            // committed records count from the hold start, the current record
            // from the overpass
            let window_end = if inputs.committed {
                since + HOLD_DAYS
            } else {
                inputs.mw_time + HOLD_DAYS
            };
            if time <= window_end {
                if armed {
                    next.state = Some(AdjustmentState::SteadyOn);
                    next.anchors.last_time = time;
                } else {
                    next.state = Some(AdjustmentState::Hold { since });
                }
                next.intensity = Some(anchors.last_value);
                next.applied = true;
            } else {
                next.state = Some(AdjustmentState::Off);
                next.comment = Some(COMMENT_OFF_HOLD.to_string());
                if !inputs.committed {
                    next.intensity = Some(anchors.last_value);
                }
            }
        }
        AdjustmentState::Off => {
            if armed {
                next.state = Some(AdjustmentState::RampA);
                next.anchors.last_time = time;
                next.intensity = Some(anchors.last_value);
                next.comment = Some(String::new());
                next.applied = true;
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(time: f64, score: f64) -> TransitionInputs {
        TransitionInputs {
            time,
            score,
            floor: score_floor(score, 3.0),
            mw_time: 0.0,
            committed: false,
        }
    }

    fn committed(time: f64, score: f64) -> TransitionInputs {
        TransitionInputs {
            committed: true,
            ..inputs(time, score)
        }
    }

    fn anchors(first_value: f64, first_time: f64, last_value: f64) -> RampAnchors {
        RampAnchors {
            first_value,
            first_time,
            last_value,
            last_time: first_time,
        }
    }

    #[test]
    fn legacy_codes_follow_archive_numbering() {
        let codes: Vec<i32> = [
            AdjustmentState::RampA,
            AdjustmentState::RampB,
            AdjustmentState::SteadyOn,
            AdjustmentState::Hold { since: 2.5 },
            AdjustmentState::Off,
        ]
        .iter()
        .map(|s| s.legacy_code())
        .collect();
        assert_eq!(codes, [30, 31, 32, 33, 34]);
    }

    #[test]
    fn on_and_active_sets() {
        assert!(!AdjustmentState::RampA.is_on());
        assert!(AdjustmentState::Hold { since: 0.0 }.is_on());
        assert!(AdjustmentState::RampA.is_active());
        assert!(!AdjustmentState::Off.is_active());
    }

    #[test]
    fn floors_follow_score_bands() {
        assert_eq!(score_floor(10.0, 3.2), 3.2);
        assert_eq!(score_floor(20.0, 3.2), MODERATE_FLOOR);
        assert_eq!(score_floor(59.9, 3.2), MODERATE_FLOOR);
        assert_eq!(score_floor(60.0, 3.2), HIGH_FLOOR);
    }

    #[test]
    fn ramp_a_snaps_to_floor() {
        let step = transition(
            Some(AdjustmentState::RampA),
            &inputs(1.0, 45.0),
            anchors(0.0, 0.0, 3.9),
        );
        assert_eq!(step.state, Some(AdjustmentState::RampB));
        assert_eq!(step.intensity, Some(MODERATE_FLOOR));
        assert_eq!(step.anchors.first_time, 1.0);
        assert_eq!(step.anchors.first_value, MODERATE_FLOOR);
        assert!(step.applied);
    }

    #[test]
    fn ramp_b_blends_toward_target() {
        let step = transition(
            Some(AdjustmentState::RampB),
            &inputs(0.25, 45.0),
            anchors(4.31, 0.0, 4.31),
        );
        assert_eq!(step.state, Some(AdjustmentState::SteadyOn));
        let value = step.intensity.unwrap();
        assert!((value - 4.555).abs() < 1e-9, "{}", value);
    }

    #[test]
    fn high_score_holds_at_five() {
        let step = transition(
            Some(AdjustmentState::RampB),
            &inputs(0.25, 75.0),
            anchors(5.01, 0.0, 5.01),
        );
        assert_eq!(step.intensity, Some(HIGH_TARGET));
    }

    #[test]
    fn steady_without_score_starts_hold() {
        let step = transition(
            Some(AdjustmentState::SteadyOn),
            &inputs(0.2, 5.0),
            anchors(4.31, 0.0, 4.6),
        );
        assert_eq!(step.state, Some(AdjustmentState::Hold { since: 0.2 }));
        assert_eq!(step.intensity, Some(4.6));
        assert_eq!(step.floor, 4.6);
        assert!(step.applied);
    }

    #[test]
    fn steady_past_both_windows_turns_off() {
        let step = transition(
            Some(AdjustmentState::SteadyOn),
            &inputs(0.8, 45.0),
            anchors(4.31, 0.0, 4.8),
        );
        assert_eq!(step.state, Some(AdjustmentState::Off));
        assert_eq!(step.comment.as_deref(), Some(COMMENT_OFF_STALE));
        assert!(!step.applied);
    }

    #[test]
    fn committed_hold_rearms_or_expires() {
        let hold = Some(AdjustmentState::Hold { since: 1.0 });
        let rearmed = transition(hold, &committed(1.1, 45.0), anchors(4.31, 0.5, 4.7));
        assert_eq!(rearmed.state, Some(AdjustmentState::SteadyOn));
        assert_eq!(rearmed.intensity, Some(4.7));

        let held = transition(hold, &committed(1.1, 5.0), anchors(4.31, 0.5, 4.7));
        assert_eq!(held.state, hold);

        let expired = transition(hold, &committed(1.3, 5.0), anchors(4.31, 0.5, 4.7));
        assert_eq!(expired.state, Some(AdjustmentState::Off));
        assert_eq!(expired.comment.as_deref(), Some(COMMENT_OFF_HOLD));
        assert_eq!(expired.intensity, None);
        assert!(!expired.applied);
    }

    #[test]
    fn current_hold_window_runs_from_overpass() {
        let hold = Some(AdjustmentState::Hold { since: 1.1 });
        let at = |time| TransitionInputs {
            mw_time: 1.0,
            ..inputs(time, 5.0)
        };
        let held = transition(hold, &at(1.25), anchors(4.31, 0.5, 4.7));
        assert_eq!(held.state, hold);
        assert_eq!(held.intensity, Some(4.7));
        assert!(held.applied);

        // inside six hours of the hold start, past six hours of the overpass
        let expired = transition(hold, &at(1.3), anchors(4.31, 0.5, 4.7));
        assert_eq!(expired.state, Some(AdjustmentState::Off));
        assert_eq!(expired.comment.as_deref(), Some(COMMENT_OFF_HOLD));
        assert_eq!(expired.intensity, Some(4.7));
        assert!(!expired.applied);
    }

    #[test]
    fn committed_ramp_b_past_ramp_is_left_alone() {
        let step = transition(
            Some(AdjustmentState::RampB),
            &committed(0.6, 45.0),
            anchors(4.31, 0.0, 4.5),
        );
        assert_eq!(step.state, Some(AdjustmentState::SteadyOn));
        assert_eq!(step.intensity, None);
        assert_eq!(step.anchors.last_value, 4.5);
        assert_eq!(step.anchors.last_time, 0.6);

        let current = transition(
            Some(AdjustmentState::RampB),
            &inputs(0.6, 45.0),
            anchors(4.31, 0.0, 4.5),
        );
        assert_eq!(current.intensity, Some(4.5));
    }

    #[test]
    fn stale_comment_only_marks_current_record() {
        let previous = Some(AdjustmentState::SteadyOn);
        let history = transition(previous, &committed(0.8, 45.0), anchors(4.31, 0.0, 4.8));
        assert_eq!(history.state, Some(AdjustmentState::Off));
        assert_eq!(history.intensity, Some(4.8));
        assert_eq!(history.comment, None);

        let current = transition(previous, &inputs(0.8, 45.0), anchors(4.31, 0.0, 4.8));
        assert_eq!(current.comment.as_deref(), Some(COMMENT_OFF_STALE));
    }

    #[test]
    fn off_rearms_and_clears_comment() {
        let off = Some(AdjustmentState::Off);
        let rearmed = transition(off, &inputs(2.0, 45.0), anchors(0.0, 0.0, 3.5));
        assert_eq!(rearmed.state, Some(AdjustmentState::RampA));
        assert_eq!(rearmed.comment.as_deref(), Some(""));

        let stays = transition(off, &inputs(2.0, 5.0), anchors(0.0, 0.0, 3.5));
        assert_eq!(stays.state, off);
        assert_eq!(stays.intensity, None);
    }

    #[test]
    fn untouched_records_stay_untouched() {
        let step = transition(None, &inputs(2.0, 75.0), RampAnchors::default());
        assert_eq!(step.state, None);
        assert_eq!(step.intensity, None);
        assert!(!step.applied);
    }
}
