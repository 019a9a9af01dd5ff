//! Flow tree model and duration calculator.
//!
//! A flow is an ordered sequence of steps; a step is a fixed-duration timer,
//! a zero-duration notification marker, or a loop repeating a nested
//! sequence. Flows are values: every edit produces a new flow, and nothing
//! here owns a clock or performs I/O.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Which effect a notification marker requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Sound,
    Alert,
    None,
}

/// One node in a flow tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    /// Counts down `minutes * 60` seconds.
    Timer { minutes: u64 },
    /// Zero-duration marker. Only the completion-time notification is
    /// observable; intermediate markers contribute nothing to execution.
    Notification { kind: NotifyKind },
    /// Repeats `children` exactly `count` times. Children may nest loops
    /// to arbitrary depth.
    Loop { count: u64, children: Vec<Step> },
}

impl Step {
    /// Seconds this step contributes to the countdown.
    ///
    /// Uses saturating arithmetic so pathological counts and nesting cap
    /// at `u64::MAX` instead of overflowing.
    pub fn duration_secs(&self) -> u64 {
        match self {
            Step::Timer { minutes } => minutes.saturating_mul(60),
            Step::Notification { .. } => 0,
            Step::Loop { count, children } => total_secs(children).saturating_mul(*count),
        }
    }
}

/// Total seconds represented by an ordered sequence of steps.
///
/// Fold over the sequence: timers add `minutes * 60`, loops add their
/// children's total times `count`, notification markers add nothing. A loop
/// with `count = 0` or no children is valid and contributes zero.
pub fn total_secs(steps: &[Step]) -> u64 {
    steps
        .iter()
        .fold(0u64, |acc, step| acc.saturating_add(step.duration_secs()))
}

/// An executable timer program: an ordered sequence of steps.
///
/// Immutable by convention. The editing methods clone the tree and return a
/// new flow; edits are addressed by index paths where every segment except
/// the last descends into a `Loop`'s children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flow {
    steps: Vec<Step>,
}

impl Flow {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn total_secs(&self) -> u64 {
        total_secs(&self.steps)
    }

    /// New flow with `step` inserted at `path`.
    ///
    /// The last path segment is the insertion position (`0..=len`) within
    /// the sequence addressed by the preceding segments.
    pub fn with_inserted(&self, path: &[usize], step: Step) -> Result<Flow, FlowError> {
        let (prefix, index) = split_path(path)?;
        let mut flow = self.clone();
        let seq = sequence_at(&mut flow.steps, prefix)?;
        if index > seq.len() {
            return Err(FlowError::OutOfBounds {
                index,
                len: seq.len(),
            });
        }
        seq.insert(index, step);
        Ok(flow)
    }

    /// New flow with the step at `path` replaced by `step`.
    pub fn with_replaced(&self, path: &[usize], step: Step) -> Result<Flow, FlowError> {
        let (prefix, index) = split_path(path)?;
        let mut flow = self.clone();
        let seq = sequence_at(&mut flow.steps, prefix)?;
        let len = seq.len();
        let slot = seq
            .get_mut(index)
            .ok_or(FlowError::OutOfBounds { index, len })?;
        *slot = step;
        Ok(flow)
    }

    /// New flow with the step at `path` removed.
    pub fn with_removed(&self, path: &[usize]) -> Result<Flow, FlowError> {
        let (prefix, index) = split_path(path)?;
        let mut flow = self.clone();
        let seq = sequence_at(&mut flow.steps, prefix)?;
        if index >= seq.len() {
            return Err(FlowError::OutOfBounds {
                index,
                len: seq.len(),
            });
        }
        seq.remove(index);
        Ok(flow)
    }

    /// New flow with the step at `path` moved to position `to` within its
    /// containing sequence.
    pub fn with_moved(&self, path: &[usize], to: usize) -> Result<Flow, FlowError> {
        let (prefix, from) = split_path(path)?;
        let mut flow = self.clone();
        let seq = sequence_at(&mut flow.steps, prefix)?;
        if from >= seq.len() {
            return Err(FlowError::OutOfBounds {
                index: from,
                len: seq.len(),
            });
        }
        if to >= seq.len() {
            return Err(FlowError::OutOfBounds {
                index: to,
                len: seq.len(),
            });
        }
        let step = seq.remove(from);
        seq.insert(to, step);
        Ok(flow)
    }
}

fn split_path(path: &[usize]) -> Result<(&[usize], usize), FlowError> {
    match path.split_last() {
        Some((last, prefix)) => Ok((prefix, *last)),
        None => Err(FlowError::EmptyPath),
    }
}

/// Walk `prefix` down through loop children and return the addressed
/// sequence.
fn sequence_at<'a>(
    steps: &'a mut Vec<Step>,
    prefix: &[usize],
) -> Result<&'a mut Vec<Step>, FlowError> {
    let mut current = steps;
    for &index in prefix {
        let len = current.len();
        let step = current
            .get_mut(index)
            .ok_or(FlowError::OutOfBounds { index, len })?;
        match step {
            Step::Loop { children, .. } => current = children,
            _ => return Err(FlowError::NotALoop { index }),
        }
    }
    Ok(current)
}
