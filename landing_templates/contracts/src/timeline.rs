//! Staggered entrance animations.
//!
//! Steps are placed on a single timeline, either appended at its end or
//! overlapping the end by some amount, and rendered as css animations with
//! the computed start time as `animation-delay`.

use serde::Serialize;

/// Where a step starts relative to the timeline built so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Start when everything before has finished.
    End,
    /// Start this many milliseconds before the current end (never before 0).
    Overlap(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    /// Value of the `data-entrance` attribute of the animated element.
    pub target: &'static str,
    /// Start time in milliseconds.
    pub start: u32,
    /// Duration in milliseconds.
    pub duration: u32,
    /// Vertical offset in pixels the element slides in from.
    pub offset_y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    steps: Vec<TimelineStep>,
    end: u32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        mut self,
        target: &'static str,
        offset_y: i32,
        duration: u32,
        position: Position,
    ) -> Self {
        let start = match position {
            Position::End => self.end,
            Position::Overlap(overlap) => self.end.saturating_sub(overlap),
        };
        self.end = self.end.max(start + duration);
        self.steps.push(TimelineStep {
            target,
            start,
            duration,
            offset_y,
        });
        self
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    /// Total length of the timeline in milliseconds.
    pub fn duration(&self) -> u32 {
        self.end
    }

    pub fn into_steps(self) -> Vec<TimelineStep> {
        self.steps
    }
}

/// The entrance animation of the landing page: logo first, then hero text,
/// contact form and contact details sliding in.
pub fn entrance() -> Timeline {
    Timeline::new()
        .add("logo", -50, 1000, Position::End)
        .add("hero-title", 30, 800, Position::Overlap(500))
        .add("hero-text", 30, 800, Position::Overlap(600))
        .add("get-in-touch", 30, 800, Position::Overlap(400))
        .add("form", 50, 800, Position::Overlap(400))
        .add("contact-info", 50, 800, Position::Overlap(200))
}
