use crate::latex::ResumeCompiler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; each compile works in its own scratch directory.
    pub compiler: ResumeCompiler,
}
