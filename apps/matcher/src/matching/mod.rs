// Résumé vs job description crews.
// Implements: agent profiles, prompt templates, the named workflows and their HTTP handlers.
// All LLM calls go through the crew engine; nothing here talks to the client directly.

pub mod agents;
pub mod handlers;
pub mod prompts;
pub mod workflows;
