// Two security tiers:
// Public (no token) -> catalog reads, login, feedback
// Protected (admin token via `middleware::require_admin`) -> item mutations
pub mod protected;
pub mod public;
