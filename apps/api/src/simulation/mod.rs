// Career path simulation: backcast, forecast and stay-versus-move comparison.
// Projections are pure functions of the reference table; `handlers` adds the
// optional model commentary on top.

pub mod handlers;
pub mod projection;
pub mod prompts;
