//! # Task Catalog
//!
//! The fixed set of project tasks, grouped into three phases.

use serde::{Deserialize, Serialize};

use crate::domain::types::{Phase, Task};

/// Identifier of a catalog task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    ReqSpec,
    SysDesign,
    ResProc,
    ProtoSpec,
    ModPlan,
    TestPlan,
    CodeReview,
    CreateContainer,
    RolloutPlan,
    MonitorPlan,
    DocsPlan,
    BlogPostCollab,
}

impl TaskId {
    pub const ALL: [TaskId; 12] = [
        TaskId::ReqSpec,
        TaskId::SysDesign,
        TaskId::ResProc,
        TaskId::ProtoSpec,
        TaskId::ModPlan,
        TaskId::TestPlan,
        TaskId::CodeReview,
        TaskId::CreateContainer,
        TaskId::RolloutPlan,
        TaskId::MonitorPlan,
        TaskId::DocsPlan,
        TaskId::BlogPostCollab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::ReqSpec => "req_spec",
            TaskId::SysDesign => "sys_design",
            TaskId::ResProc => "res_proc",
            TaskId::ProtoSpec => "proto_spec",
            TaskId::ModPlan => "mod_plan",
            TaskId::TestPlan => "test_plan",
            TaskId::CodeReview => "code_review",
            TaskId::CreateContainer => "create_container",
            TaskId::RolloutPlan => "rollout_plan",
            TaskId::MonitorPlan => "monitor_plan",
            TaskId::DocsPlan => "docs_plan",
            TaskId::BlogPostCollab => "blog_post_collab",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        TaskId::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fresh catalog with every task PENDING.
pub fn default_tasks() -> Vec<Task> {
    use Phase::*;
    vec![
        Task::new(TaskId::ReqSpec, "Requirement Specification", "Generate formal, unambiguous, testable, measurable requirements.", LogicalArchitecture, "Generate Specs"),
        Task::new(TaskId::SysDesign, "System Design", "Architect a system diagram with component interactions and data flows, based on defined requirements.", LogicalArchitecture, "Generate Design"),
        Task::new(TaskId::ResProc, "Resource Procurement Plan", "Quantify hardware, software, and personnel based on the system design.", LogicalArchitecture, "Generate Plan"),
        Task::new(TaskId::ProtoSpec, "Prototype Specification", "Define the scope and technical specifications for a functional prototype to validate architecture.", LogicalArchitecture, "Generate Spec"),
        Task::new(TaskId::ModPlan, "Module Creation Plan", "Break down the system design into discrete, independently testable code modules.", StructuredDevelopment, "Generate Plan"),
        Task::new(TaskId::TestPlan, "Rigorous Testing Plan", "Create a comprehensive plan covering unit, integration, performance, and security testing for all modules.", StructuredDevelopment, "Generate Tests"),
        Task::new(TaskId::CodeReview, "Automated Code Review", "Run static analysis on a sample code block to identify bugs, style violations, and performance issues.", StructuredDevelopment, "Analyze Code"),
        Task::new(TaskId::CreateContainer, "Create OpenAI Container", "Create a new container via the OpenAI API for the Code Interpreter tool.", StructuredDevelopment, "Create Container"),
        Task::new(TaskId::RolloutPlan, "Staged Rollout Plan", "Design a phased deployment strategy to minimize risk and gather user feedback.", ControlledDeployment, "Generate Plan"),
        Task::new(TaskId::MonitorPlan, "Monitoring & Alerting Strategy", "Define key metrics, set up monitoring dashboards, and configure automated alerts.", ControlledDeployment, "Generate Strategy"),
        Task::new(TaskId::DocsPlan, "Documentation Framework", "Create a framework and template for project documentation.", ControlledDeployment, "Generate Framework"),
        Task::new(TaskId::BlogPostCollab, "Write Blog Post: Real-time Editing", "Use Bravo to write a developer blog post about the new collaborative editing feature, using existing specs and pseudo-code.", ControlledDeployment, "Write Post"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_round_trip() {
        for id in TaskId::ALL {
            assert_eq!(TaskId::from_str(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(TaskId::from_str("nope"), None);
    }

    #[test]
    fn test_default_catalog_covers_every_id_in_phase_order() {
        let tasks = default_tasks();
        let ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, TaskId::ALL.to_vec());
        assert!(tasks.windows(2).all(|w| w[0].phase <= w[1].phase));
    }
}
