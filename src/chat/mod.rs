// LLM chat personas: one conversational front per resource, fed windowed
// metrics as context.

mod bedrock;
mod prompts;

pub use bedrock::{ChatMessage, ChatSession, PersonaChat};
pub use prompts::PromptLibrary;
