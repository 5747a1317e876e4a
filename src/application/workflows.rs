//! # Workflows
//!
//! Fixed multi-agent pipelines that write their results into the virtual
//! filesystem. Each step runs with the persona of the agent doing the work.

use anyhow::{Context, Result};

use crate::application::state::AppContext;
use crate::domain::types::{FileSystemNode, NodeKind};
use crate::strings::{messages, prompts};

const TEXT_TEMPERATURE: f32 = 0.4;

/// Console lines emitted around the spec → pseudo-code → blog pipeline.
pub struct Narration {
    pub spec: &'static str,
    pub spec_done: Option<&'static str>,
    pub pseudo: &'static str,
    pub pseudo_done: Option<&'static str>,
    pub post: Option<&'static str>,
}

pub const COLLAB_NARRATION: Narration = Narration {
    spec: messages::COLLAB_SPEC,
    spec_done: None,
    pseudo: messages::COLLAB_PSEUDO,
    pseudo_done: None,
    post: Some(messages::COLLAB_POST),
};

pub const FEATURE_NARRATION: Narration = Narration {
    spec: messages::FEATURE_SPEC,
    spec_done: Some(messages::FEATURE_SPEC_DONE),
    pseudo: messages::FEATURE_PSEUDO,
    pseudo_done: Some(messages::FEATURE_PSEUDO_DONE),
    post: None,
};

/// Adam drafts a spec, Stan turns it into pseudo-code, Bravo writes the post.
pub async fn feature_pipeline(ctx: &AppContext, description: &str, narration: &Narration) -> Result<String> {
    let (adam, adam_system) = ctx.persona("Adam").await?;
    let (stan, stan_system) = ctx.persona("Stan").await?;
    let (bravo, bravo_system) = ctx.persona("Bravo").await?;

    ctx.ai(&adam, narration.spec).await;
    let spec = ctx
        .llm
        .complete(&prompts::feature_spec(description), &adam_system, TEXT_TEMPERATURE)
        .await?;
    if let Some(done) = narration.spec_done {
        ctx.orchestrator(done).await;
    }

    ctx.ai(&stan, narration.pseudo).await;
    let pseudo = ctx
        .llm
        .complete(&prompts::pseudo_code(&spec), &stan_system, TEXT_TEMPERATURE)
        .await?;
    if let Some(done) = narration.pseudo_done {
        ctx.orchestrator(done).await;
    }

    if let Some(post) = narration.post {
        ctx.ai(&bravo, post).await;
    }
    let post = ctx
        .llm
        .complete(&prompts::blog_post(description, &spec, &pseudo), &bravo_system, TEXT_TEMPERATURE)
        .await?;
    Ok(post)
}

pub fn documentation_path(topic: &str) -> String {
    format!("/docs/{}.md", topic.replace(' ', "-"))
}

pub fn feature_post_path(description: &str) -> String {
    let first = description.split(' ').next().unwrap_or_default().to_lowercase();
    format!("/docs/blog-{}.md", first)
}

/// David researches with web grounding, Lyra writes the document.
pub async fn research_and_write(ctx: &AppContext, topic: &str) -> Result<String> {
    ctx.orchestrator(messages::research_start(topic)).await;
    let (david, david_system) = ctx.persona("David").await?;
    let (_, lyra_system) = ctx.persona("Lyra").await?;

    ctx.ai(&david, messages::RESEARCH_RUNNING).await;
    let research = ctx.llm.research(topic, &david_system).await?;
    ctx.orchestrator(messages::RESEARCH_DONE).await;

    let research_context = prompts::research_context(&research);
    let document = ctx
        .llm
        .complete(&prompts::documentation(topic, &research_context), &lyra_system, TEXT_TEMPERATURE)
        .await?;
    let path = documentation_path(topic);
    ctx.fs.write(&path, &document).await?;
    ctx.system(messages::documentation_saved(&path)).await;
    Ok(path)
}

pub async fn develop_feature(ctx: &AppContext, description: &str) -> Result<String> {
    ctx.orchestrator(messages::feature_start(description)).await;
    let post = feature_pipeline(ctx, description, &FEATURE_NARRATION).await?;
    let path = feature_post_path(description);
    ctx.fs.write(&path, &post).await?;
    ctx.system(messages::feature_saved(&path)).await;
    Ok(path)
}

fn strip_json_fence(text: &str) -> String {
    text.replace("```json\n", "").replace("```", "").trim().to_string()
}

/// YAML plan → JSON requirements → stakeholder summary, one file each.
pub async fn spec_flow(ctx: &AppContext, topic: &str) -> Result<Vec<String>> {
    ctx.orchestrator(messages::spec_flow_start(topic)).await;
    let (adam, adam_system) = ctx.persona("Adam").await?;
    let (david, david_system) = ctx.persona("David").await?;
    let slug = topic.replace(' ', "_");

    ctx.ai(&adam, messages::SPEC_FLOW_YAML).await;
    let yaml = ctx
        .llm
        .complete(&prompts::yaml_plan(topic), &adam_system, TEXT_TEMPERATURE)
        .await?;
    let yaml_path = format!("/docs/plan_{}.yaml", slug);
    ctx.fs.write(&yaml_path, &yaml).await?;
    ctx.orchestrator(messages::spec_flow_yaml_saved(&yaml_path)).await;

    ctx.ai(&adam, messages::SPEC_FLOW_JSON).await;
    let raw = ctx
        .llm
        .complete(&prompts::json_requirements(&yaml), &adam_system, TEXT_TEMPERATURE)
        .await?;
    let json = strip_json_fence(&raw);
    let json_path = format!("/docs/reqs_{}.json", slug);
    ctx.fs.write(&json_path, &json).await?;
    ctx.orchestrator(messages::spec_flow_json_saved(&json_path)).await;

    ctx.orchestrator(messages::SPEC_FLOW_HANDOFF).await;
    ctx.ai(&david, messages::SPEC_FLOW_SUMMARY).await;
    let summary = ctx
        .llm
        .complete(&prompts::requirements_summary(&json), &david_system, TEXT_TEMPERATURE)
        .await?;
    let summary_path = format!("/docs/summary_{}.md", slug);
    ctx.fs.write(&summary_path, &summary).await?;
    ctx.orchestrator(messages::spec_flow_summary_saved(&summary_path)).await;

    ctx.system(messages::spec_flow_complete(topic)).await;
    Ok(vec![yaml_path, json_path, summary_path])
}

fn collect_files(nodes: &[FileSystemNode], out: &mut Vec<String>) {
    for node in nodes {
        match node.kind {
            NodeKind::File => out.push(node.path.clone()),
            NodeKind::Directory => collect_files(&node.children, out),
        }
    }
}

/// Answers `query` from the workspace files only. Returns `None` when there
/// is nothing to search.
pub async fn semantic_search(ctx: &AppContext, query: &str) -> Result<Option<String>> {
    let tree = ctx.fs.tree("/").await?;
    let mut paths = Vec::new();
    collect_files(&tree, &mut paths);

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match ctx.fs.read(&path).await {
            Ok(content) => files.push((path, content)),
            Err(e) => tracing::warn!("Skipping {} during search: {}", path, e),
        }
    }
    if files.is_empty() {
        ctx.system(messages::NO_INDEXED_FILES).await;
        return Ok(None);
    }

    ctx.system(messages::searching(files.len())).await;
    let (agent, system) = ctx.active_persona().await?;
    let answer = ctx
        .llm
        .complete(&prompts::semantic_search(query, &files), &system, TEXT_TEMPERATURE)
        .await
        .context("Semantic search failed")?;
    ctx.ai(&agent, answer.clone()).await;
    Ok(Some(answer))
}
