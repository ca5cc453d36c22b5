// Explicit per-session state: user profile, the target-industry handoff
// between screens, and the watchlist. In-memory only.

pub mod handlers;
pub mod store;

pub use store::SessionStore;
