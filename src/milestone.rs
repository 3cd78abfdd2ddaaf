use crate::error::{ScheduleError, ScheduleResult};
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How a milestone binding finds its task. Positional indices are not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRef {
    Id(TaskId),
    Name(String),
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Id(id) => write!(f, "id {id}"),
            TaskRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Start,
    Major,
    Construction,
    End,
}

impl MilestoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::Start => "start",
            MilestoneKind::Major => "major",
            MilestoneKind::Construction => "construction",
            MilestoneKind::End => "end",
        }
    }
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneBinding {
    pub name: String,
    pub task: TaskRef,
    pub anchor: DateAnchor,
    pub kind: MilestoneKind,
}

impl MilestoneBinding {
    pub fn new(
        name: impl Into<String>,
        task: TaskRef,
        anchor: DateAnchor,
        kind: MilestoneKind,
    ) -> Self {
        Self {
            name: name.into(),
            task,
            anchor,
            kind,
        }
    }

    pub fn at_start_of(name: impl Into<String>, task: &str, kind: MilestoneKind) -> Self {
        Self::new(name, TaskRef::Name(task.to_string()), DateAnchor::Start, kind)
    }

    pub fn at_end_of(name: impl Into<String>, task: &str, kind: MilestoneKind) -> Self {
        Self::new(name, TaskRef::Name(task.to_string()), DateAnchor::End, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub date: NaiveDate,
    pub kind: MilestoneKind,
    pub task_id: TaskId,
}

/// Binds each milestone to its task's resolved date, in binding order.
pub fn resolve_milestones(
    resolved_tasks: &[Task],
    bindings: &[MilestoneBinding],
) -> ScheduleResult<Vec<Milestone>> {
    let by_id: HashMap<TaskId, &Task> = resolved_tasks.iter().map(|t| (t.id, t)).collect();
    let by_name: HashMap<&str, &Task> = resolved_tasks
        .iter()
        .map(|t| (t.name.as_str(), t))
        .collect();

    bindings
        .iter()
        .map(|binding| {
            let task = match &binding.task {
                TaskRef::Id(id) => by_id.get(id),
                TaskRef::Name(name) => by_name.get(name.as_str()),
            }
            .copied()
            .ok_or_else(|| ScheduleError::UnknownTaskReference(binding.task.clone()))?;

            let date = match binding.anchor {
                DateAnchor::Start => task.start_date,
                DateAnchor::End => task.end_date,
            }
            .ok_or(ScheduleError::UnresolvedTask(task.id))?;

            Ok(Milestone {
                name: binding.name.clone(),
                date,
                kind: binding.kind,
                task_id: task.id,
            })
        })
        .collect()
}

/// Milestones of the built-in data center template.
pub fn data_center_bindings() -> Vec<MilestoneBinding> {
    use MilestoneKind::*;
    vec![
        MilestoneBinding::at_start_of("Project Kickoff", "Project Charter & Feasibility", Start),
        MilestoneBinding::at_end_of("Design Completion", "Detailed Design & Engineering", Major),
        MilestoneBinding::at_end_of("Procurement Complete", "Long Lead Items Ordering", Major),
        MilestoneBinding::at_end_of(
            "Foundation Complete",
            "Concrete Work - Foundation",
            Construction,
        ),
        MilestoneBinding::at_end_of(
            "Structure Complete",
            "Concrete Work - Superstructure",
            Construction,
        ),
        MilestoneBinding::at_end_of("MEP Complete", "Power Distribution & UPS", Major),
        MilestoneBinding::at_end_of("Project Completion", "Documentation & Handover", End),
    ]
}
