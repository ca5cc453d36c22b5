// Resume diagnosis: industry extraction from free text, batch risk breakdown
// and transition recommendations. LLM parsing is optional; the keyword path
// never depends on it.

pub mod diagnosis;
pub mod handlers;
pub mod prompts;
