//! # Plan Generator
//!
//! Asks the orchestrator model for a plan and hands back typed steps. Task
//! plans come back as `{ "plan": [...] }`; file plans are normalized here so
//! the executor only ever sees `Vec<FileCreationStep>`.

use serde_json::{Value, json};

use crate::domain::plan::{self, ExecutionStep, FileCreationStep, PlanError};
use crate::domain::traits::LlmGateway;
use crate::domain::types::{Agent, Task};
use crate::strings::prompts;

const PLAN_FAILED: &str = "Failed to create execution plan. Orchestration module failure.";
const FILE_PLAN_FAILED: &str = "Failed to create file creation plan. Orchestration module failure.";

fn execution_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "plan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "taskId": {"type": "STRING"},
                        "agentName": {"type": "STRING"},
                        "justification": {"type": "STRING"}
                    },
                    "required": ["taskId", "agentName", "justification"]
                }
            }
        },
        "required": ["plan"]
    })
}

fn file_plan_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "agentName": {"type": "STRING"},
                "action": {"type": "STRING", "enum": ["GENERATE_CONTENT", "WRITE_FILE"]},
                "justification": {"type": "STRING"},
                "params": {
                    "type": "OBJECT",
                    "properties": {
                        "prompt": {"type": "STRING"},
                        "fileName": {"type": "STRING"},
                        "contentVar": {"type": "STRING"}
                    }
                },
                "outputVar": {"type": "STRING"}
            },
            "required": ["agentName", "action", "justification", "params"]
        }
    })
}

pub async fn generate_plan(
    llm: &dyn LlmGateway,
    goal: &str,
    tasks: &[Task],
    agents: &[Agent],
    custom_instruction: Option<&str>,
) -> Result<Vec<ExecutionStep>, PlanError> {
    let prompt = prompts::execution_plan(goal, agents, tasks);
    let system = prompts::with_directives(prompts::ORCHESTRATOR_SYSTEM, custom_instruction);

    let value = llm
        .complete_json(&prompt, &system, execution_plan_schema(), 0.1)
        .await
        .map_err(|e| {
            tracing::error!("Execution plan request failed: {}", e);
            PlanError::Generation(PLAN_FAILED.to_string())
        })?;

    let steps = plan::parse_task_plan(value).map_err(|e| {
        tracing::error!("Execution plan was malformed: {}", e);
        PlanError::Generation(PLAN_FAILED.to_string())
    })?;
    tracing::info!("Execution plan for '{}' has {} step(s)", goal, steps.len());
    Ok(steps)
}

pub async fn generate_file_creation_plan(
    llm: &dyn LlmGateway,
    goal: &str,
    agents: &[Agent],
    custom_instruction: Option<&str>,
) -> Result<Vec<FileCreationStep>, PlanError> {
    let prompt = prompts::file_plan(goal, agents);
    let system = prompts::with_directives(prompts::FILE_PLAN_SYSTEM, custom_instruction);

    let value = llm
        .complete_json(&prompt, &system, file_plan_schema(), 0.1)
        .await
        .map_err(|e| {
            tracing::error!("File creation plan request failed: {}", e);
            PlanError::Generation(FILE_PLAN_FAILED.to_string())
        })?;

    let steps = plan::normalize_file_plan(value)?;
    tracing::info!("File creation plan for '{}' has {} step(s)", goal, steps.len());
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedGateway;
    use crate::domain::catalog::default_tasks;
    use crate::domain::plan::FileAction;
    use crate::domain::roster::default_agents;

    #[tokio::test]
    async fn test_generate_plan_parses_steps() {
        let llm = ScriptedGateway::new(vec![
            r#"{"plan":[{"taskId":"req_spec","agentName":"Adam","justification":"Specs first."}]}"#,
        ]);
        let steps = generate_plan(llm.as_ref(), "Build auth", &default_tasks(), &default_agents(), None)
            .await
            .unwrap();
        assert_eq!(
            steps,
            vec![ExecutionStep {
                task_id: "req_spec".into(),
                agent_name: "Adam".into(),
                justification: "Specs first.".into(),
            }]
        );
        let prompt = &llm.prompts().await[0];
        assert!(prompt.contains("Build auth"));
        assert!(prompt.contains("- req_spec (Requirement Specification): Belongs to"));
    }

    #[tokio::test]
    async fn test_generate_plan_failure_is_generic() {
        let llm = ScriptedGateway::new(vec!["not json"]);
        let err = generate_plan(llm.as_ref(), "g", &default_tasks(), &default_agents(), None)
            .await
            .unwrap_err();
        assert_eq!(err, PlanError::Generation(PLAN_FAILED.to_string()));

        let llm = ScriptedGateway::new(vec![r#"{"steps":[]}"#]);
        let err = generate_plan(llm.as_ref(), "g", &default_tasks(), &default_agents(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), PLAN_FAILED);
    }

    #[tokio::test]
    async fn test_file_plan_accepts_wrapped_object() {
        let llm = ScriptedGateway::new(vec![
            r#"{"plan":[{"agentName":"Lyra","action":"GENERATE_CONTENT","justification":"j","params":{"prompt":"p"},"outputVar":"doc"}]}"#,
        ]);
        let steps = generate_file_creation_plan(llm.as_ref(), "README", &default_agents(), Some("Use src/"))
            .await
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action, FileAction::GenerateContent);
        assert_eq!(steps[0].output_var.as_deref(), Some("doc"));
    }

    #[tokio::test]
    async fn test_file_plan_rejects_other_shapes() {
        let llm = ScriptedGateway::new(vec![r#""just text""#]);
        let err = generate_file_creation_plan(llm.as_ref(), "g", &default_agents(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Shape(_)));
    }
}
