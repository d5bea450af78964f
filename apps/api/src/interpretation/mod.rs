// Dream interpretation pipeline.
// PromptBuilder → TextGenerator (llm_client) → ResponseExtractor, composed by the orchestrator.
// HistorySummarizer reads stored responses back for list previews.

pub mod extractor;
pub mod handlers;
pub mod orchestrator;
pub mod prompt_builder;
pub mod prompts;
pub mod sections;
pub mod summarizer;
