//! # Prompts
//!
//! Prompt builders for plan generation, task generators and workflows.
//! Long templates live in `prompts/*.md` and are rendered with [`PromptRenderer`].

use crate::domain::types::{Agent, Research, Task, TaskStatus};

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }

        if let Some(start) = result.find("{{") {
            if let Some(end) = result[start..].find("}}") {
                let placeholder = &result[start..start + end + 2];
                tracing::error!("[PROMPT RENDER ERROR] Unreplaced placeholder found in output: {}", placeholder);
            }
        }

        result
    }
}

pub const EXECUTION_PLAN_TEMPLATE: &str = include_str!("../../prompts/execution_plan.md");
pub const FILE_PLAN_TEMPLATE: &str = include_str!("../../prompts/file_plan.md");
pub const DOCUMENTATION_TEMPLATE: &str = include_str!("../../prompts/documentation.md");
pub const BLOG_POST_TEMPLATE: &str = include_str!("../../prompts/blog_post.md");
pub const API_DOCS_TEMPLATE: &str = include_str!("../../prompts/api_docs.md");
pub const SEMANTIC_SEARCH_TEMPLATE: &str = include_str!("../../prompts/semantic_search.md");

pub const ORCHESTRATOR_SYSTEM: &str = "You are Andoy, the King of CASSA VEGAS. You are a master orchestrator. Your job is to create a flawless, efficient execution plan by delegating tasks to your family of AI agents. Be strategic and decisive.";

pub const FILE_PLAN_SYSTEM: &str = "You are an expert orchestrator AI that creates plans involving content generation and file system operations. Your output MUST be a valid JSON array.";

pub const CLI_SYSTEM: &str = "You are a powerful AI assistant operating within a command-line interface. Provide clear, concise, and accurate responses. Use markdown for code snippets.";

pub const BUGGY_CODE_SAMPLE: &str = r#"
function processItems(items) {
  for (var i = 0; i < items.length; i++) {
    setTimeout(function() {
      console.log('Processing item ' + items[i].id);
    }, 100);
  }
  return items;
}
"#;

/// Feature used by the `blog_post_collab` task.
pub const COLLAB_FEATURE: &str = "Real-time collaborative code editing using WebSockets";

const NO_CONTEXT: &str = "No context provided. Assume standard requirements for a new system.";

/// Appends the user's orchestrator directives to a plan system instruction.
pub fn with_directives(base: &str, custom: Option<&str>) -> String {
    match custom.map(str::trim).filter(|c| !c.is_empty()) {
        Some(custom) => format!("{}\n\n**CUSTOM DIRECTIVES:**\n{}", base, custom),
        None => base.to_string(),
    }
}

/// Persona plus the global supervisor instruction.
pub fn agent_prompt(agent: &Agent, supervisor: &str) -> String {
    format!("{}\n\n**SUPERVISOR INSTRUCTIONS:**\n{}", agent.personality_prompt, supervisor)
}

/// Persona, supervisor instruction and the agent's strategic notes.
pub fn task_prompt(agent: &Agent, supervisor: &str) -> String {
    let notes = if agent.strategic_notes.is_empty() {
        "None".to_string()
    } else {
        agent.strategic_notes.join("\n")
    };
    format!("{}\n\nStrategic Notes:\n{}", agent_prompt(agent, supervisor), notes)
}

/// Outputs of every completed task, in catalog order.
pub fn completed_context(tasks: &[Task]) -> String {
    tasks
        .iter()
        .filter(|t| t.status() == TaskStatus::Complete)
        .filter_map(|t| {
            t.details()
                .filter(|d| !d.is_empty())
                .map(|d| format!("PREVIOUS TASK: {}\nOUTPUT:\n{}\n---", t.title, d))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn execution_plan(goal: &str, agents: &[Agent], tasks: &[Task]) -> String {
    let agent_profiles = agents
        .iter()
        .map(|a| format!("- {} ({}): {}", a.name, a.role, a.skills.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    let task_list = tasks
        .iter()
        .map(|t| format!("- {} ({}): Belongs to {}", t.id, t.title, t.phase.label()))
        .collect::<Vec<_>>()
        .join("\n");
    PromptRenderer::new(EXECUTION_PLAN_TEMPLATE)
        .set("{{AGENTS}}", agent_profiles)
        .set("{{TASKS}}", task_list)
        .set("{{GOAL}}", goal)
        .render()
}

pub fn file_plan(goal: &str, agents: &[Agent]) -> String {
    let agent_profiles = agents
        .iter()
        .map(|a| format!("- {} ({}): Best for {}", a.name, a.role, a.skills.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    PromptRenderer::new(FILE_PLAN_TEMPLATE)
        .set("{{AGENTS}}", agent_profiles)
        .set("{{GOAL}}", goal)
        .render()
}

fn with_context(instructions: &str, context: &str) -> String {
    format!("{}\n\nProject Context:\n---\n{}\n---\n", instructions, context)
}

// Task generators

pub fn requirements() -> String {
    r#"Generate a formal requirement specification for a user authentication system. The output must be a single, valid JSON object. The JSON object should have three top-level keys: "functional_requirements", "non_functional_requirements", and "error_handling". Each key's value must be an array of unambiguous, testable, and measurable requirement strings."#.to_string()
}

pub fn system_design(context: &str) -> String {
    let context = if context.trim().is_empty() { NO_CONTEXT } else { context };
    format!(
        "Based on the following project context, describe the system architecture for a user authentication system. Detail component interactions, data flows, and API endpoints. Use markdown for formatting, including lists and code blocks for clarity. The tone must be technical, precise, and efficient.\n\nProject Context:\n---\n{}\n---\n",
        context
    )
}

pub fn resource_plan(context: &str) -> String {
    with_context(
        r#"Based on the provided project context, create a detailed resource procurement plan. The output must be a single, valid JSON object. The plan should quantify required resources across three categories: "hardware" (e.g., server specs, count), "software" (e.g., licenses, subscriptions), and "personnel" (e.g., roles, man-hours)."#,
        context,
    )
}

pub fn prototype_spec(context: &str) -> String {
    with_context(
        "Using the project context, write a technical specification for a functional prototype. The prototype's purpose is to validate the core architecture. The spec should define the prototype's scope, core features to implement, key performance indicators (KPIs) for validation, and the tech stack to be used. Use markdown for formatting.",
        context,
    )
}

pub fn module_plan(context: &str) -> String {
    with_context(
        "Based on the system design in the project context, break down the system into a list of discrete, independently testable code modules. For each module, provide a brief description of its responsibility. Use markdown for formatting.",
        context,
    )
}

pub fn test_plan(context: &str) -> String {
    with_context(
        r#"Based on the project context, create a comprehensive testing plan. The output must be a single, valid JSON object. The plan should outline strategies for "unit_tests", "integration_tests", "performance_tests", and "security_audits". Each strategy should be an array of specific test cases or areas to cover."#,
        context,
    )
}

pub fn rollout_plan(context: &str) -> String {
    with_context(
        r#"Using the project context, devise a staged rollout plan. The plan should define distinct phases (e.g., "Internal Alpha", "Closed Beta", "Public Release"), specify the target user group for each phase, and list key metrics to monitor at each stage. Use markdown for formatting."#,
        context,
    )
}

pub fn monitoring_strategy(context: &str) -> String {
    with_context(
        r#"Based on the project context, define a monitoring and alerting strategy. The strategy should identify key performance indicators (KPIs), infrastructure metrics, and application-level metrics to track. It should also suggest specific alert thresholds (e.g., "CPU > 90% for 5 mins"). Use markdown for formatting."#,
        context,
    )
}

pub fn docs_framework(context: &str) -> String {
    with_context(
        "Based on the project context, create a documentation framework. The framework should outline the structure for the project's documentation, including sections for API references, architectural diagrams, setup guides, and contribution guidelines. Provide a template for a typical documentation page using markdown.",
        context,
    )
}

pub fn code_review() -> String {
    format!(
        "Perform a rigorous, automated code review on the provided Javascript code. Identify bugs, style violations, and potential performance issues. Be direct and unforgiving. Your output MUST be a single, valid JSON object.\n\nCode:\n```javascript\n{}\n```\n",
        BUGGY_CODE_SAMPLE
    )
}

pub fn code_review_report(findings: &str) -> String {
    format!(
        "## STATIC ANALYSIS REPORT\n\n### TARGETED CODE:\n```javascript\n{}\n```\n\n### FINDINGS:\n{}",
        BUGGY_CODE_SAMPLE, findings
    )
}

// Workflows

pub fn research(topic: &str) -> String {
    format!("Research the following topic and provide a concise summary.\nTopic: \"{}\"", topic)
}

/// Summary plus the grounding sources as JSON.
pub fn research_context(research: &Research) -> String {
    let sources = serde_json::to_string(&research.sources).unwrap_or_else(|_| "[]".to_string());
    format!("Research Summary:\n{}\n\nSources:\n{}", research.summary, sources)
}

pub fn documentation(topic: &str, research_context: &str) -> String {
    PromptRenderer::new(DOCUMENTATION_TEMPLATE)
        .set("{{TOPIC}}", topic)
        .set("{{RESEARCH}}", research_context)
        .render()
}

pub fn feature_spec(description: &str) -> String {
    format!(
        "Based on the following feature description, write a high-level technical specification. \nThe spec should outline the core components, data models (if any), and key API endpoints or functions.\nUse markdown for formatting.\n\n**Feature Description:**\n---\n{}\n---\n",
        description
    )
}

pub fn pseudo_code(spec: &str) -> String {
    format!(
        "Based on the provided technical specification, write a clear, language-agnostic pseudo-code implementation for the core logic.\nFocus on logic, control flow, and function signatures.\nWrap the final pseudo-code in a markdown code block.\n\n**Technical Specification:**\n---\n{}\n---\n",
        spec
    )
}

pub fn blog_post(description: &str, spec: &str, pseudo: &str) -> String {
    PromptRenderer::new(BLOG_POST_TEMPLATE)
        .set("{{DESCRIPTION}}", description)
        .set("{{SPEC}}", spec)
        .set("{{PSEUDO_CODE}}", pseudo)
        .render()
}

pub fn api_docs(url: &str, question: &str) -> String {
    PromptRenderer::new(API_DOCS_TEMPLATE)
        .set("{{URL}}", url)
        .set("{{QUESTION}}", question)
        .render()
}

pub fn semantic_search(query: &str, files: &[(String, String)]) -> String {
    let file_context = files
        .iter()
        .map(|(path, content)| format!("--- FILE: {} ---\n{}", path, content))
        .collect::<Vec<_>>()
        .join("\n\n");
    PromptRenderer::new(SEMANTIC_SEARCH_TEMPLATE)
        .set("{{QUERY}}", query)
        .set("{{FILES}}", file_context)
        .render()
}

pub fn yaml_plan(topic: &str) -> String {
    format!(
        "Based on the topic \"{}\", generate a high-level multi-agent workflow plan. The output must be in YAML format. It should describe a sequence of agents, their actions, inputs, and outputs to create a full requirement specification.",
        topic
    )
}

pub fn json_requirements(yaml: &str) -> String {
    format!(
        "Translate the following YAML workflow plan into a structured JSON object representing detailed requirements. The JSON should be well-formed and ready for processing.\n\nYAML Plan:\n---\n{}\n---\n",
        yaml
    )
}

pub fn requirements_summary(json: &str) -> String {
    format!(
        "Summarize the following JSON requirements into a clear, business-friendly summary document. Use markdown for formatting, including a title, introduction, and bullet points for key requirements.\n\nJSON Requirements:\n---\n{}\n---\n",
        json
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::default_tasks;
    use crate::domain::roster::default_agents;

    #[test]
    fn test_prompt_renderer_basic() {
        let renderer = PromptRenderer::new("Hello {{NAME}}")
            .set("{{NAME}}", "World");
        assert_eq!(renderer.render(), "Hello World");
    }

    #[test]
    fn test_prompt_renderer_missing_key() {
        // Logs an error but leaves the text alone.
        let renderer = PromptRenderer::new("Hello {{MISSING}}");
        assert_eq!(renderer.render(), "Hello {{MISSING}}");
    }

    #[test]
    fn test_prompt_renderer_partial_replace() {
        let renderer = PromptRenderer::new("{{A}} and {{B}}")
            .set("{{A}}", "Apple");
        assert_eq!(renderer.render(), "Apple and {{B}}");
    }

    #[test]
    fn test_execution_plan_lists_agents_and_tasks() {
        let prompt = execution_plan("Ship auth", &default_agents(), &default_tasks());
        assert!(prompt.contains("\"Ship auth\""));
        assert!(prompt.contains("- Adam (Architect): System Design, Technical Specifications"));
        assert!(prompt.contains(
            "- req_spec (Requirement Specification): Belongs to Phase 1: Logical Architecture & Resource Allocation"
        ));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_directives_only_when_set() {
        assert_eq!(with_directives("base", None), "base");
        assert_eq!(with_directives("base", Some("  ")), "base");
        assert_eq!(with_directives("base", Some("Be brief")), "base\n\n**CUSTOM DIRECTIVES:**\nBe brief");
    }

    #[test]
    fn test_task_prompt_notes() {
        let mut agent = default_agents().remove(1);
        assert!(task_prompt(&agent, "sup").ends_with("Strategic Notes:\nNone"));
        agent.strategic_notes.push("one".into());
        agent.strategic_notes.push("two".into());
        let prompt = task_prompt(&agent, "sup");
        assert!(prompt.contains("**SUPERVISOR INSTRUCTIONS:**\nsup"));
        assert!(prompt.ends_with("Strategic Notes:\none\ntwo"));
    }

    #[test]
    fn test_completed_context_only_includes_complete_tasks() {
        let mut tasks = default_tasks();
        tasks[0].complete("reqs");
        tasks[1].fail("boom");
        tasks[2].complete("plan");
        assert_eq!(
            completed_context(&tasks),
            "PREVIOUS TASK: Requirement Specification\nOUTPUT:\nreqs\n---\n\nPREVIOUS TASK: Resource Procurement Plan\nOUTPUT:\nplan\n---"
        );
    }

    #[test]
    fn test_system_design_falls_back_without_context() {
        assert!(system_design("").contains(NO_CONTEXT));
        assert!(!system_design("ctx").contains(NO_CONTEXT));
    }
}
