use std::fmt;
use std::process::Child;

use tracing::debug;

/// Capacity the background table starts with.
pub const INITIAL_CAPACITY: usize = 8;
/// Hard ceiling on background tasks; growth past this point is refused.
pub const MAX_CAPACITY: usize = 128;

#[derive(Debug)]
pub enum JobError {
    TableFull(usize),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::TableFull(ceiling) => {
                write!(f, "job table full: background task ceiling of {} reached", ceiling)
            }
        }
    }
}

impl std::error::Error for JobError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Running => f.write_str("Running"),
            TaskStatus::Done => f.write_str("Done"),
        }
    }
}

/// A spawned child the interpreter keeps track of.
///
/// The OS handle is retained for background tasks so `fg` can later block
/// on exactly that child; waiting consumes it.
#[derive(Debug)]
pub struct Task {
    pub pid: u32,
    pub label: String,
    pub status: TaskStatus,
    child: Option<Child>,
}

impl Task {
    pub fn new(pid: u32, label: impl Into<String>) -> Self {
        Task {
            pid,
            label: label.into(),
            status: TaskStatus::Running,
            child: None,
        }
    }

    /// A task that already ran to completion in the foreground.
    pub fn finished(pid: u32, label: impl Into<String>) -> Self {
        Task {
            pid,
            label: label.into(),
            status: TaskStatus::Done,
            child: None,
        }
    }

    pub fn from_child(child: Child, label: impl Into<String>) -> Self {
        Task {
            pid: child.id(),
            label: label.into(),
            status: TaskStatus::Running,
            child: Some(child),
        }
    }

    /// Takes the retained OS handle, if any. `None` once a wait consumed it.
    pub fn take_child(&mut self) -> Option<Child> {
        self.child.take()
    }
}

/// Registry of spawned tasks: one foreground slot plus an append-only
/// background list.
///
/// Background tasks are never removed, only marked `Done`, so job numbers
/// (1-based display indices) stay stable for the life of the interpreter.
/// The list grows by doubling from `INITIAL_CAPACITY`; growth that would
/// exceed the ceiling is refused with `JobError::TableFull`, which the
/// interpreter treats as fatal.
#[derive(Debug)]
pub struct JobTable {
    foreground: Option<Task>,
    background: Vec<Task>,
    capacity: usize,
    ceiling: usize,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self::with_ceiling(MAX_CAPACITY)
    }

    pub fn with_ceiling(ceiling: usize) -> Self {
        let capacity = INITIAL_CAPACITY.min(ceiling);
        JobTable {
            foreground: None,
            background: Vec::with_capacity(capacity),
            capacity,
            ceiling,
        }
    }

    /// Appends a background task, returning its 0-based index.
    pub fn append(&mut self, task: Task) -> Result<usize, JobError> {
        if self.background.len() == self.capacity {
            let doubled = self.capacity * 2;
            if doubled > self.ceiling {
                return Err(JobError::TableFull(self.ceiling));
            }
            self.background.reserve_exact(self.capacity);
            self.capacity = doubled;
            debug!("job table capacity doubled to {}", doubled);
        }
        self.background.push(task);
        Ok(self.background.len() - 1)
    }

    /// Bounds-checked lookup by 1-based job number.
    pub fn get(&self, job_number: usize) -> Option<&Task> {
        if job_number == 0 {
            return None;
        }
        self.background.get(job_number - 1)
    }

    pub fn get_mut(&mut self, job_number: usize) -> Option<&mut Task> {
        if job_number == 0 {
            return None;
        }
        self.background.get_mut(job_number - 1)
    }

    /// Background tasks in insertion order, paired with their 1-based
    /// job numbers. The iterator is restartable and finite.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.background.iter().enumerate().map(|(i, t)| (i + 1, t))
    }

    pub fn len(&self) -> usize {
        self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mark_done(&mut self, index: usize) {
        if let Some(task) = self.background.get_mut(index) {
            task.status = TaskStatus::Done;
        }
    }

    pub fn mark_running(&mut self, index: usize) {
        if let Some(task) = self.background.get_mut(index) {
            task.status = TaskStatus::Running;
        }
    }

    /// Records the most recent foreground task, replacing the previous one.
    pub fn set_foreground(&mut self, task: Task) {
        self.foreground = Some(task);
    }

    pub fn foreground(&self) -> Option<&Task> {
        self.foreground.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_insertion_ordered_numbers() {
        let mut table = JobTable::new();
        for (i, label) in ["sleep", "find", "cat"].iter().enumerate() {
            let index = table.append(Task::new(100 + i as u32, *label)).unwrap();
            assert_eq!(index, i);
        }

        let listed: Vec<(usize, &str)> = table
            .iter()
            .map(|(n, t)| (n, t.label.as_str()))
            .collect();
        assert_eq!(listed, vec![(1, "sleep"), (2, "find"), (3, "cat")]);
    }

    #[test]
    fn test_capacity_doubles_on_ninth_append() {
        let mut table = JobTable::new();
        for i in 0..8 {
            table.append(Task::new(i, "job")).unwrap();
            assert_eq!(table.capacity(), INITIAL_CAPACITY);
        }

        table.append(Task::new(8, "job")).unwrap();
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_append_beyond_ceiling_fails() {
        let mut table = JobTable::with_ceiling(16);
        for i in 0..16 {
            table.append(Task::new(i, "job")).unwrap();
        }

        let err = table.append(Task::new(16, "job")).unwrap_err();
        assert!(matches!(err, JobError::TableFull(16)));
        assert_eq!(table.len(), 16);
    }

    #[test]
    fn test_growth_never_exceeds_ceiling() {
        let mut table = JobTable::new();
        for i in 0..MAX_CAPACITY as u32 {
            table.append(Task::new(i, "job")).unwrap();
        }
        assert_eq!(table.capacity(), MAX_CAPACITY);

        assert!(table.append(Task::new(999, "job")).is_err());
    }

    #[test]
    fn test_get_is_one_based_and_bounds_checked() {
        let mut table = JobTable::new();
        table.append(Task::new(42, "sleep")).unwrap();

        assert!(table.get(0).is_none());
        assert_eq!(table.get(1).map(|t| t.pid), Some(42));
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_mark_done_and_running_mutate_status_in_place() {
        let mut table = JobTable::new();
        table.append(Task::new(7, "sleep")).unwrap();

        table.mark_done(0);
        assert_eq!(table.get(1).map(|t| t.status), Some(TaskStatus::Done));

        table.mark_running(0);
        assert_eq!(table.get(1).map(|t| t.status), Some(TaskStatus::Running));

        // out-of-range indices are ignored
        table.mark_done(5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_foreground_slot_replaces_previous_task() {
        let mut table = JobTable::new();
        assert!(table.foreground().is_none());

        table.set_foreground(Task::finished(10, "ls"));
        table.set_foreground(Task::finished(11, "cat"));

        let current = table.foreground().unwrap();
        assert_eq!(current.pid, 11);
        assert_eq!(current.status, TaskStatus::Done);
    }

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::Running.to_string(), "Running");
        assert_eq!(TaskStatus::Done.to_string(), "Done");
    }
}
