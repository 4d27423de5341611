//! LaTeX generation and compilation.

pub mod compiler;
pub mod escape;
pub mod render;

pub use compiler::{CompileError, CompilerConfig, PdfLatex, ResumeCompiler};
