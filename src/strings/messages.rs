//! # Messages
//!
//! Constant strings and format functions for console messages.

pub const WELCOME: &str = "Welcome to CASSA VEGAS. Type /help for a list of commands.";
pub const MOCK_FS_NOTICE: &str =
    "File system is running in mock mode. Files live in memory and zip/unzip are unavailable.";

pub fn unknown_command(cmd: &str) -> String {
    format!("Unknown command: {cmd}")
}

pub fn running_scheduled(command: &str) -> String {
    format!("Running scheduled command: {command}")
}

// Agents

pub fn current_agent(name: &str) -> String {
    format!("Current agent: {name}")
}

pub fn agent_switched(name: &str) -> String {
    format!("Active agent is now {name}.")
}

pub fn agent_not_found(name: &str) -> String {
    format!("Error: Agent \"{name}\" not found.")
}

pub fn agent_list(lines: &str) -> String {
    format!("AVAILABLE AGENTS:\n{lines}")
}

pub const NOTE_USAGE: &str = "Usage: /note <agent> <text>";

pub fn note_added(name: &str) -> String {
    format!("Added strategic note for {name}.")
}

// Tasks

pub fn task_status(lines: &str) -> String {
    format!("CURRENT TASK STATUS:\n{lines}")
}

pub const TASK_ID_REQUIRED: &str = "Error: Task ID is required.";

pub fn unknown_task(id: &str) -> String {
    format!("Error: Unknown task ID \"{id}\".")
}

pub fn task_starting(agent: &str, title: &str) -> String {
    format!("{agent} is starting task: {title}")
}

pub fn task_complete(title: &str) -> String {
    format!("Task \"{title}\" complete.")
}

pub fn task_failed(title: &str, err: &str) -> String {
    format!("Task \"{title}\" failed: {err}")
}

pub const CONTAINER_PROMPT: &str = "Enter a name for the new container:";
pub const CONTAINER_DEFAULT: &str = "CASSA-VEGAS-Container";
pub const CONTAINER_CANCELLED: &str = "Container creation cancelled.";

pub fn collab_orchestrating(feature: &str) -> String {
    format!("Orchestrating blog post for: \"{feature}\"")
}

pub const COLLAB_SPEC: &str = "Adam is drafting the feature spec...";
pub const COLLAB_PSEUDO: &str = "Stan is generating the pseudo-code...";
pub const COLLAB_POST: &str = "Bravo is writing the blog post...";

pub fn blog_saved(path: &str) -> String {
    format!("Blog post saved to {path}.")
}

// Orchestration

pub fn orchestrate_start(goal: &str) -> String {
    format!("Andoy is formulating a plan for: \"{goal}\"")
}

pub fn innovate_start(description: &str) -> String {
    format!("Andoy is formulating a file creation plan for: \"{description}\"")
}

pub fn plan_received(steps: usize, plan_json: &str) -> String {
    format!("Plan received. Executing {steps} steps...\n{plan_json}")
}

pub fn step_handoff(agent: &str, justification: &str) -> String {
    format!("{agent}, you're up. {justification}")
}

pub fn step_skipped(agent: &str, task_id: &str) -> String {
    format!("Agent \"{agent}\" not found; skipping task {task_id}.")
}

pub fn file_step(agent: &str, justification: &str) -> String {
    format!("Step for {agent}: {justification}")
}

pub fn content_generated(var: &str) -> String {
    format!("Content generated for \"{var}\".")
}

pub fn wrote_file(path: &str) -> String {
    format!("Wrote content to file: {path}")
}

pub fn execution_failed(err: &str) -> String {
    format!("Execution failed: {err}")
}

pub const ORCHESTRATION_COMPLETE: &str = "Orchestration complete.";
pub const FILE_PLAN_COMPLETE: &str = "File creation plan completed successfully.";

pub fn orchestration_failed(err: &str) -> String {
    format!("Orchestration failed: {err}")
}

pub fn innovation_failed(err: &str) -> String {
    format!("Innovation failed: {err}")
}

pub const GOAL_REQUIRED: &str = "Error: A goal is required. e.g., /orchestrate \"Build the auth service\"";
pub const DESCRIPTION_REQUIRED: &str = "Error: A description is required. e.g., /innovate \"A README for the API\"";

// Workflows

pub fn research_start(topic: &str) -> String {
    format!("Orchestrating research for: \"{topic}\"")
}

pub const RESEARCH_RUNNING: &str = "David is conducting research...";
pub const RESEARCH_DONE: &str = "Research complete. Lyra will now write the document.";

pub fn documentation_saved(path: &str) -> String {
    format!("Documentation written by Lyra and saved to {path}.")
}

pub fn feature_start(description: &str) -> String {
    format!("Orchestrating feature development: \"{description}\"")
}

pub const FEATURE_SPEC: &str = "Adam is creating the feature spec...";
pub const FEATURE_SPEC_DONE: &str = "Spec created. Stan will now generate pseudo-code.";
pub const FEATURE_PSEUDO: &str = "Stan is generating pseudo-code...";
pub const FEATURE_PSEUDO_DONE: &str = "Pseudo-code generated. Bravo will now write the blog post.";

pub fn feature_saved(path: &str) -> String {
    format!("Feature blog post written by Bravo and saved to {path}.")
}

pub const SPEC_FLOW_TOPIC_REQUIRED: &str =
    "Error: A topic is required for the spec flow. e.g., /spec_flow \"User Auth\"";

pub fn spec_flow_start(topic: &str) -> String {
    format!("Andoy is orchestrating a specification handoff for: \"{topic}\"")
}

pub const SPEC_FLOW_YAML: &str = "Adam is drafting the initial workflow plan...";
pub const SPEC_FLOW_JSON: &str = "Adam is now translating the plan into structured JSON requirements...";
pub const SPEC_FLOW_HANDOFF: &str = "Handing off to David to summarize the requirements for stakeholders...";
pub const SPEC_FLOW_SUMMARY: &str = "David is generating the final summary document...";

pub fn spec_flow_yaml_saved(path: &str) -> String {
    format!("Adam has created the YAML plan. Saved to {path}.")
}

pub fn spec_flow_json_saved(path: &str) -> String {
    format!("Adam has created the JSON requirements. Saved to {path}.")
}

pub fn spec_flow_summary_saved(path: &str) -> String {
    format!("David has completed the summary. Saved to {path}.")
}

pub fn spec_flow_complete(topic: &str) -> String {
    format!("Specification handoff workflow complete for \"{topic}\". All files created in /docs.")
}

pub fn workflow_failed(workflow: &str, err: &str) -> String {
    format!("{workflow} workflow failed: {err}")
}

pub const NO_INDEXED_FILES: &str = "Cannot perform search. No files have been indexed in the vector store yet.";

pub fn searching(count: usize) -> String {
    format!("Searching {count} files...")
}

// Queries

pub const ASK_USAGE: &str = "Usage: /ask <question>";
pub const DOCS_USAGE: &str = "Usage: /docs <url> <question>";
pub const SEARCH_USAGE: &str = "Usage: /search <query>";
pub const CLI_USAGE: &str = "Usage: /cli <gemini|openai> <prompt>";
pub const ASK_FAILED: &str = "Error: Failed to process query. Cognitive module failure.";
pub const DOCS_FAILED: &str = "Error: Failed to process API documentation query. Cognitive module failure.";

pub fn cli_failed(provider: &str, err: &str) -> String {
    format!("Error: Failed to get response from {provider}. Details: {err}")
}

// Logbook

pub const LOG_USAGE: &str = "Usage: /log <message>";
pub const MESSAGE_LOGGED: &str = "Message logged.";
pub const LOGBOOK_EMPTY: &str = "Logbook is empty.";

pub fn log_failed(err: &str) -> String {
    format!("Failed to save log entry: {err}")
}

// Scheduler

pub const SCHEDULE_FORMAT: &str = "Invalid format. Use: /schedule \"<command>\" at <YYYY-MM-DDTHH:MM:SS>";

pub fn invalid_date(value: &str) -> String {
    format!("Invalid date format: {value}")
}

pub fn command_scheduled(id: &str, at: &str) -> String {
    format!("Command scheduled for {at} (id: {id})")
}

pub const NO_SCHEDULED: &str = "No scheduled commands.";

pub fn scheduled_list(lines: &str) -> String {
    format!("SCHEDULED COMMANDS:\n{lines}")
}

pub const CANCEL_USAGE: &str = "Usage: /cancel <id>";

pub fn command_cancelled(id: &str) -> String {
    format!("Scheduled command {id} cancelled.")
}

pub fn cancel_failed(err: &str) -> String {
    format!("Error: {err}")
}

// Filesystem

pub fn fs_error(err: &str) -> String {
    format!("FS Error: {err}")
}

pub const FILE_PATH_REQUIRED: &str = "File path is required.";
pub const FILE_NAME_REQUIRED: &str = "File name is required.";
pub const DIRECTORY_NAME_REQUIRED: &str = "Directory name is required.";
pub const PATH_REQUIRED: &str = "Path is required.";

pub fn file_created(path: &str) -> String {
    format!("File created: {path}")
}

pub fn directory_created(path: &str) -> String {
    format!("Directory created: {path}")
}

pub fn removed(path: &str) -> String {
    format!("Removed: {path}")
}

pub fn wrote_to(path: &str) -> String {
    format!("Wrote to {path}")
}

pub fn archived(dir: &str, archive: &str) -> String {
    format!("Archived {dir} to {archive}")
}

pub fn extracted(path: &str) -> String {
    format!("Extracted {path}")
}

// Settings

pub const KEY_USAGE: &str = "Usage: /key <api-key>";
pub const KEY_VALIDATING: &str = "Validating OpenAI API key...";
pub const KEY_VALID: &str = "OpenAI API key is valid and has been saved.";
pub const KEY_INVALID: &str = "OpenAI API key is invalid. Check the key and try again.";

pub fn provider_status(status: &str) -> String {
    format!("OpenAI API key status: {status}")
}

pub fn instructions_view(orchestrator: &str, supervisor: &str) -> String {
    format!("ORCHESTRATOR INSTRUCTION:\n{orchestrator}\n\nSUPERVISOR INSTRUCTION:\n{supervisor}")
}

pub const INSTRUCTIONS_USAGE: &str = "Usage: /instructions [orchestrator|supervisor] [text]";
pub const INSTRUCTIONS_SAVED: &str = "Custom instructions have been updated and saved.";
