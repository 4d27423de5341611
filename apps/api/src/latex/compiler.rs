//! Compile pipeline: scratch dir → style asset → render → external LaTeX engine → artifact.
//!
//! Each call gets its own scratch directory, removed on every exit path when the
//! `TempDir` guard drops. The persisted artifact name depends only on the person's
//! name, so concurrent compiles for the same name overwrite each other (last write wins).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::latex::render::render;
use crate::models::resume::ResumeRequest;

pub const STYLE_ASSET: &str = "resume.cls";
const TEX_FILE: &str = "resume.tex";
const PDF_FILE: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to generate LaTeX: {0}")]
    Render(String),

    /// Raw engine output, surfaced verbatim.
    #[error("LaTeX engine failed: {status}\n{output}")]
    Compiler { status: String, output: String },

    #[error("failed to read generated PDF {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| CompileError::Io { context, source }
    }
}

/// Captured result of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub success: bool,
    /// Human-readable exit status, e.g. `exit status: 1`.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

/// The external typesetting tool. Given `tex_path`, a successful run leaves
/// `resume.pdf` in `out_dir`.
#[async_trait]
pub trait LatexEngine: Send + Sync {
    async fn run(&self, tex_path: &Path, out_dir: &Path) -> std::io::Result<EngineOutput>;
}

/// Runs `pdflatex` (or a compatible binary) non-interactively.
#[derive(Debug, Clone)]
pub struct PdfLatex {
    pub bin: String,
}

#[async_trait]
impl LatexEngine for PdfLatex {
    async fn run(&self, tex_path: &Path, out_dir: &Path) -> std::io::Result<EngineOutput> {
        info!("Running {} on {}", self.bin, tex_path.display());

        let mut output_dir_arg = std::ffi::OsString::from("-output-directory=");
        output_dir_arg.push(out_dir);

        let output = Command::new(&self.bin)
            .arg("-interaction=nonstopmode")
            .arg(output_dir_arg)
            .arg(tex_path)
            .current_dir(out_dir)
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(EngineOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Read-only settings for [`ResumeCompiler`].
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Directory holding `resume.cls`.
    pub template_dir: PathBuf,
    /// Persistent directory for compiled PDFs.
    pub output_dir: PathBuf,
    /// Parent directory for per-request scratch directories.
    pub scratch_root: PathBuf,
}

/// Stateless compile pipeline, shared across requests.
#[derive(Clone)]
pub struct ResumeCompiler {
    config: CompilerConfig,
    engine: Arc<dyn LatexEngine>,
}

impl ResumeCompiler {
    pub fn new(config: CompilerConfig, engine: Arc<dyn LatexEngine>) -> Self {
        Self { config, engine }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Compiles `request` and returns the artifact file name inside the output directory.
    pub async fn compile(&self, request: &ResumeRequest) -> Result<String, CompileError> {
        let span = tracing::info_span!("compile", request_id = %Uuid::new_v4());
        self.compile_inner(request).instrument(span).await
    }

    async fn compile_inner(&self, request: &ResumeRequest) -> Result<String, CompileError> {
        fs::create_dir_all(&self.config.scratch_root)
            .await
            .map_err(CompileError::io("failed to create temp directory"))?;
        let scratch = tempfile::Builder::new()
            .prefix("resume-")
            .tempdir_in(&self.config.scratch_root)
            .map_err(CompileError::io("failed to create temp directory"))?;
        debug!("Scratch directory {}", scratch.path().display());

        let cls = fs::read(self.config.template_dir.join(STYLE_ASSET))
            .await
            .map_err(CompileError::io(format!("failed to read {STYLE_ASSET}")))?;
        fs::write(scratch.path().join(STYLE_ASSET), cls)
            .await
            .map_err(CompileError::io(format!("failed to write {STYLE_ASSET}")))?;

        let latex = render(&request.basic_details, &request.sections)
            .map_err(|e| CompileError::Render(e.to_string()))?;

        let tex_path = scratch.path().join(TEX_FILE);
        fs::write(&tex_path, latex)
            .await
            .map_err(CompileError::io("failed to write .tex file"))?;

        let output = self
            .engine
            .run(&tex_path, scratch.path())
            .await
            .map_err(CompileError::io("failed to start LaTeX engine"))?;
        if !output.success {
            warn!("LaTeX engine failed ({})", output.status);
            return Err(CompileError::Compiler {
                status: output.status,
                output: format!("stdout: {}\nstderr: {}", output.stdout, output.stderr),
            });
        }

        fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(CompileError::io("failed to create output directory"))?;

        let src_pdf = scratch.path().join(PDF_FILE);
        let pdf = fs::read(&src_pdf)
            .await
            .map_err(|source| CompileError::ArtifactRead {
                path: src_pdf.clone(),
                source,
            })?;

        let name = artifact_name(
            &request.basic_details.first_name,
            &request.basic_details.last_name,
        );
        fs::write(self.config.output_dir.join(&name), &pdf)
            .await
            .map_err(CompileError::io("failed to write PDF to output"))?;
        info!("Wrote {} ({} bytes)", name, pdf.len());

        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch directory: {e}");
        }
        Ok(name)
    }
}

/// `{first}_{last}_Resume.pdf` with filesystem-hostile characters replaced.
pub fn artifact_name(first: &str, last: &str) -> String {
    format!(
        "{}_{}_Resume.pdf",
        sanitize_filename(first),
        sanitize_filename(last)
    )
}

fn sanitize_filename(s: &str) -> String {
    s.replace([' ', '/', '\\'], "_")
}
