// Chat advisor: knowledge-grounded conversation with the Cycle-Master model,
// plain and streamed over SSE.

pub mod chat;
pub mod handlers;
pub mod prompts;
