//! `flexi` compiles layout templates ahead of time.
//!
//! ```text
//! flexi --config flexi.json --out-dir dist app/templates/*.hbs
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flexi_dsl::{DslConfig, Pipeline, ProjectConfig};

mod logging;

use logging::{LoggingConfig, init_logging};

#[derive(Debug, Parser)]
#[command(name = "flexi", version, about = "Compile flexi layout attributes in templates")]
struct Args {
    /// Project configuration (JSON).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Convert layout attributes on every element, not just layout elements.
    #[arg(long)]
    transform_all: bool,

    /// Write each compiled template here instead of printing it.
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Log filter in `env_logger` syntax; overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,

    #[arg(required = true, value_name = "TEMPLATE")]
    templates: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig::with_filter(args.log.clone()));

    let pipeline = Pipeline::new(load_config(&args)?);

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    for path in &args.templates {
        let output = compile_file(path, &pipeline)?;
        match &args.out_dir {
            Some(dir) => {
                let target = output_path(dir, path)?;
                fs::write(&target, output)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                log::info!("{} -> {}", path.display(), target.display());
            }
            None => print!("{output}"),
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<DslConfig> {
    let mut project = match &args.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::new(),
    };
    if args.transform_all {
        project = project.with_transform_all(true);
    }
    Ok(DslConfig::from_project(project))
}

fn compile_file(path: &Path, pipeline: &Pipeline) -> Result<String> {
    let src =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    compile_source(&src, pipeline).with_context(|| format!("failed to compile {}", path.display()))
}

/// Parse `src`, run every pass, and print the result.
fn compile_source(src: &str, pipeline: &Pipeline) -> Result<String> {
    let mut template = flexi_syntax::parse_str(src)?;
    pipeline.run(&mut template)?;
    Ok(flexi_syntax::print(&template))
}

fn output_path(dir: &Path, template: &Path) -> Result<PathBuf> {
    let name = template
        .file_name()
        .with_context(|| format!("{} has no file name", template.display()))?;
    Ok(dir.join(name))
}
