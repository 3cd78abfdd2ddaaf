//! Static declaration of phases and tasks.
//!
//! Dependencies are declared as positional indices into the flattened task
//! sequence and may only point backwards. Every task receives its stable id at
//! construction time; everything downstream refers to tasks by that id or by
//! name, never by position.

use crate::error::{CatalogViolation, ScheduleResult};
use crate::graph::CatalogDag;
use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDecl {
    pub name: String,
    pub duration_days: i64,
    /// Positional indices of earlier tasks in the flattened declaration.
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDecl {
    pub phase: String,
    pub tasks: Vec<TaskDecl>,
}

impl PhaseDecl {
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(
        mut self,
        name: impl Into<String>,
        duration_days: i64,
        dependencies: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.tasks.push(TaskDecl {
            name: name.into(),
            duration_days,
            dependencies: dependencies.into_iter().collect(),
        });
        self
    }
}

/// Validated, immutable task template.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    declarations: Vec<PhaseDecl>,
    tasks: Vec<Task>,
    by_name: HashMap<String, TaskId>,
    dag: CatalogDag,
}

impl TaskCatalog {
    pub fn new(declarations: Vec<PhaseDecl>) -> ScheduleResult<Self> {
        match Self::build(&declarations) {
            Ok((tasks, by_name, dag)) => {
                tracing::debug!(
                    phases = declarations.len(),
                    tasks = tasks.len(),
                    "catalog validated"
                );
                Ok(Self {
                    declarations,
                    tasks,
                    by_name,
                    dag,
                })
            }
            Err(violation) => {
                tracing::warn!("rejecting catalog: {violation}");
                Err(violation.into())
            }
        }
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, crate::ExportError> {
        let file = File::open(path)?;
        let declarations: Vec<PhaseDecl> = serde_json::from_reader(file)?;
        Self::new(declarations).map_err(|err| crate::ExportError::InvalidData(err.to_string()))
    }

    fn build(
        declarations: &[PhaseDecl],
    ) -> Result<(Vec<Task>, HashMap<String, TaskId>, CatalogDag), CatalogViolation> {
        let len: usize = declarations.iter().map(|phase| phase.tasks.len()).sum();
        let mut tasks = Vec::with_capacity(len);
        let mut by_name = HashMap::with_capacity(len);

        let mut position = 0usize;
        for (phase_position, phase) in declarations.iter().enumerate() {
            if phase.phase.trim().is_empty() {
                return Err(CatalogViolation::BlankPhaseName {
                    position: phase_position,
                });
            }
            for decl in &phase.tasks {
                if decl.name.trim().is_empty() {
                    return Err(CatalogViolation::BlankTaskName {
                        phase: phase.phase.clone(),
                        position,
                    });
                }
                if decl.duration_days <= 0 {
                    return Err(CatalogViolation::NonPositiveDuration {
                        task: decl.name.clone(),
                        duration_days: decl.duration_days,
                    });
                }
                for &index in &decl.dependencies {
                    if index >= len {
                        return Err(CatalogViolation::DependencyOutOfRange {
                            task: decl.name.clone(),
                            index,
                            len,
                        });
                    }
                    if index >= position {
                        return Err(CatalogViolation::ForwardReference {
                            task: decl.name.clone(),
                            position,
                            index,
                        });
                    }
                }

                let id = position as TaskId;
                if by_name.insert(decl.name.clone(), id).is_some() {
                    return Err(CatalogViolation::DuplicateName {
                        name: decl.name.clone(),
                    });
                }
                let task = Task::new(id, decl.name.clone(), phase.phase.clone(), decl.duration_days)
                    .with_dependencies(decl.dependencies.iter().map(|&index| index as TaskId));
                tasks.push(task);
                position += 1;
            }
        }

        let dag = CatalogDag::build(&tasks)?;
        Ok((tasks, by_name, dag))
    }

    /// Tasks in declaration order, without dates.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn phases(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|phase| phase.phase.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.by_name.get(name).copied()
    }

    pub fn dag(&self) -> &CatalogDag {
        &self.dag
    }

    /// The built-in data center construction template.
    pub fn data_center() -> ScheduleResult<Self> {
        Self::new(data_center_phases())
    }
}

pub fn data_center_phases() -> Vec<PhaseDecl> {
    vec![
        PhaseDecl::new("Project Initiation & Planning")
            .task("Project Charter & Feasibility", 10, [])
            .task("Site Survey & Geotechnical", 15, [0])
            .task("Detailed Design & Engineering", 30, [1])
            .task("Permits & Approvals", 20, [2])
            .task("Material Procurement Planning", 10, [2]),
        PhaseDecl::new("Procurement & Contracting")
            .task("Vendor Selection & Contracting", 15, [4])
            .task("Material Orders & Delivery Schedule", 20, [5])
            .task("Equipment Procurement", 25, [5])
            .task("Long Lead Items Ordering", 35, [5]),
        PhaseDecl::new("Site Preparation")
            .task("Site Clearing & Preparation", 12, [3])
            .task("Temporary Facilities Setup", 8, [9])
            .task("Access Roads & Utilities", 15, [9]),
        PhaseDecl::new("Foundation & Structure")
            .task("Excavation & Foundation", 25, [11, 6])
            .task("Concrete Work - Foundation", 20, [12])
            .task("Steel Structure Assembly", 30, [13, 6])
            .task("Concrete Work - Superstructure", 35, [14]),
        PhaseDecl::new("Building Envelope")
            .task("Roofing & Waterproofing", 20, [15])
            .task("Exterior Walls & Cladding", 25, [15])
            .task("Windows & Doors Installation", 15, [17]),
        PhaseDecl::new("MEP Installation")
            .task("Electrical Infrastructure", 40, [15, 7])
            .task("HVAC System Installation", 45, [15, 8])
            .task("Plumbing & Fire Protection", 30, [15])
            .task("Power Distribution & UPS", 35, [19]),
        PhaseDecl::new("Interior & Finishes")
            .task("Interior Partitions", 20, [18])
            .task("Flooring & Ceiling", 25, [23])
            .task("Interior Finishes", 20, [24]),
        PhaseDecl::new("Testing & Commissioning")
            .task("System Integration Testing", 15, [20, 21, 22])
            .task("Performance Testing", 10, [26])
            .task("Final Inspections", 8, [25, 27])
            .task("Documentation & Handover", 5, [28]),
    ]
}
