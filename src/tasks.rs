//! Per-body objectives.
//!
//! Tasks are attached to bodies and advanced once per frame by the rocket's
//! update. The only implemented kind is the orbit task: stay within a radius
//! of the body for a continuous duration.
//!
//! All timestamps and durations are in milliseconds of simulation clock.

use std::collections::BTreeMap;

/// Type key of the orbit task.
pub const ORBIT_TASK: &str = "orbit";

/// Tasks attached to a body, keyed by task name.
///
/// The task name doubles as its type key in level files.
pub type TaskMap = BTreeMap<String, Task>;

/// A single objective, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Keep the rocket within `radius` of the body for `time` milliseconds.
    Orbit(OrbitTask),
}

impl Task {
    /// Type key of this task.
    pub fn kind(&self) -> &'static str {
        match self {
            Task::Orbit(_) => ORBIT_TASK,
        }
    }

    /// Human-readable description shown in the task list.
    pub fn info(&self) -> &str {
        match self {
            Task::Orbit(task) => &task.info,
        }
    }

    /// Whether the task has been completed in this attempt.
    pub fn is_completed(&self) -> bool {
        match self {
            Task::Orbit(task) => task.completed,
        }
    }

    /// Advance the task given the tracked entity's distance to the owning body.
    pub fn evaluate(&mut self, distance: f64, now: f64) -> Option<TaskTransition> {
        match self {
            Task::Orbit(task) => task.evaluate(distance, now),
        }
    }
}

/// Observable state of an orbit task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitTaskState {
    /// Tracked entity is outside the radius (or never entered).
    Inactive,
    /// Tracked entity is inside the radius; the clock is running.
    Entered,
    /// Terminal.
    Completed,
}

/// State change produced by one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskTransition {
    /// Inactive → Entered.
    Entered,
    /// Entered → Inactive. Progress is discarded.
    Left,
    /// Entered → Completed.
    Completed,
}

/// Orbit task data.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitTask {
    /// Description shown in the task list.
    pub info: String,
    /// Distance threshold from the body's center.
    pub radius: f64,
    /// Required continuous time inside the radius (ms).
    pub time: f64,
    /// Clock value when the tracked entity entered the radius.
    pub enter_time: Option<f64>,
    /// Monotonic: once set, never cleared within an attempt.
    pub completed: bool,
}

impl OrbitTask {
    /// Create a fresh, inactive orbit task.
    pub fn new(info: impl Into<String>, radius: f64, time: f64) -> Self {
        Self {
            info: info.into(),
            radius,
            time,
            enter_time: None,
            completed: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> OrbitTaskState {
        if self.completed {
            OrbitTaskState::Completed
        } else if self.enter_time.is_some() {
            OrbitTaskState::Entered
        } else {
            OrbitTaskState::Inactive
        }
    }

    /// Advance the state machine.
    ///
    /// The enter timestamp is only set on the frame the entity crosses into
    /// the radius; completion is checked on later frames. Leaving before
    /// completion clears the clock.
    pub fn evaluate(&mut self, distance: f64, now: f64) -> Option<TaskTransition> {
        if self.completed {
            return None;
        }

        if distance < self.radius {
            match self.enter_time {
                None => {
                    self.enter_time = Some(now);
                    Some(TaskTransition::Entered)
                }
                Some(entered) if now - entered >= self.time => {
                    self.completed = true;
                    Some(TaskTransition::Completed)
                }
                Some(_) => None,
            }
        } else if self.enter_time.take().is_some() {
            Some(TaskTransition::Left)
        } else {
            None
        }
    }

    /// Milliseconds left before completion, while entered.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        if self.completed {
            return None;
        }
        self.enter_time
            .map(|entered| (self.time - (now - entered)).max(0.0))
    }

    /// Fraction of the required time already spent inside, in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.completed {
            return 1.0;
        }
        match self.enter_time {
            Some(entered) if self.time > 0.0 => ((now - entered) / self.time).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }
}

/// Evaluate every task on one body.
///
/// Returns the transitions that happened, paired with the task name.
pub fn evaluate_tasks(
    tasks: &mut TaskMap,
    distance: f64,
    now: f64,
) -> Vec<(String, TaskTransition)> {
    tasks
        .iter_mut()
        .filter(|(_, task)| !task.is_completed())
        .filter_map(|(name, task)| {
            task.evaluate(distance, now)
                .map(|transition| (name.clone(), transition))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit_task() -> OrbitTask {
        OrbitTask::new("Orbit the planet", 20.0, 3000.0)
    }

    #[test]
    fn test_new_task_is_inactive() {
        let task = orbit_task();
        assert_eq!(task.state(), OrbitTaskState::Inactive);
        assert_eq!(task.remaining(0.0), None);
        assert_eq!(task.progress(0.0), 0.0);
    }

    #[test]
    fn test_outside_radius_stays_inactive() {
        let mut task = orbit_task();
        assert_eq!(task.evaluate(25.0, 0.0), None);
        assert_eq!(task.evaluate(20.0, 100.0), None); // boundary counts as outside
        assert_eq!(task.state(), OrbitTaskState::Inactive);
    }

    #[test]
    fn test_entering_sets_enter_time() {
        let mut task = orbit_task();
        assert_eq!(task.evaluate(10.0, 500.0), Some(TaskTransition::Entered));
        assert_eq!(task.enter_time, Some(500.0));
        assert_eq!(task.state(), OrbitTaskState::Entered);

        // Still inside, not enough time yet
        assert_eq!(task.evaluate(12.0, 2000.0), None);
        assert_eq!(task.enter_time, Some(500.0));
        assert_eq!(task.remaining(2000.0), Some(1500.0));
        assert!((task.progress(2000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_completion_after_required_time() {
        let mut task = orbit_task();
        task.evaluate(10.0, 0.0);
        assert_eq!(task.evaluate(10.0, 3000.0), Some(TaskTransition::Completed));
        assert!(task.completed);
        assert_eq!(task.state(), OrbitTaskState::Completed);
    }

    #[test]
    fn test_leaving_resets_progress() {
        let mut task = orbit_task();
        task.evaluate(10.0, 0.0);
        task.evaluate(10.0, 2900.0);
        assert_eq!(task.evaluate(30.0, 2950.0), Some(TaskTransition::Left));
        assert_eq!(task.enter_time, None);
        assert_eq!(task.state(), OrbitTaskState::Inactive);

        // Re-entering starts the clock from scratch
        assert_eq!(task.evaluate(10.0, 3000.0), Some(TaskTransition::Entered));
        assert_eq!(task.evaluate(10.0, 5000.0), None);
        assert_eq!(task.evaluate(10.0, 6000.0), Some(TaskTransition::Completed));
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut task = orbit_task();
        task.evaluate(10.0, 0.0);
        task.evaluate(10.0, 4000.0);
        assert!(task.completed);

        assert_eq!(task.evaluate(100.0, 5000.0), None);
        assert_eq!(task.evaluate(10.0, 6000.0), None);
        assert!(task.completed);
        assert_eq!(task.progress(6000.0), 1.0);
    }

    #[test]
    fn test_evaluate_tasks_reports_names() {
        let mut tasks = TaskMap::new();
        tasks.insert(ORBIT_TASK.to_string(), Task::Orbit(orbit_task()));

        let transitions = evaluate_tasks(&mut tasks, 5.0, 0.0);
        assert_eq!(transitions, vec![(ORBIT_TASK.to_string(), TaskTransition::Entered)]);

        let transitions = evaluate_tasks(&mut tasks, 5.0, 3500.0);
        assert_eq!(transitions, vec![(ORBIT_TASK.to_string(), TaskTransition::Completed)]);

        assert!(evaluate_tasks(&mut tasks, 5.0, 9000.0).is_empty());
    }

    #[test]
    fn test_task_kind_and_info() {
        let task = Task::Orbit(orbit_task());
        assert_eq!(task.kind(), ORBIT_TASK);
        assert_eq!(task.info(), "Orbit the planet");
        assert!(!task.is_completed());
    }
}
