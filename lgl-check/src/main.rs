//! Compiles and links every shader program named in a manifest against a real
//! OpenGL 3.3 core context and reports what went wrong.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use learngl::{
    BUILTIN_SHADERS, FileReader, FsReader, GraphicsBackend, LoadPolicy, Manifest, ShaderError,
};
use log::{error, info, warn};

mod app;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "lgl-check", version, about)]
/// Compiles and links the shader programs listed in a manifest.
struct Args {
    /// Manifest listing the programs to check. Shader paths are relative to it.
    manifest: Option<PathBuf>,

    /// Check the shaders embedded in the library instead of a manifest on disk.
    #[arg(long, conflicts_with = "manifest")]
    builtin: bool,

    /// Fail a program on its first problem, overriding the manifest's policy.
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Build every program even when it has problems, overriding the manifest's policy.
    #[arg(long)]
    lenient: bool,

    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn policy(&self, manifest: &Manifest) -> LoadPolicy {
        if self.strict {
            LoadPolicy::Strict
        } else if self.lenient {
            LoadPolicy::Lenient
        } else {
            manifest.policy
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Failed to set up logging: {e}");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every program built without diagnostics.
fn run(args: &Args) -> Result<bool, String> {
    if args.builtin {
        let manifest = Manifest::builtin().map_err(|e| e.to_string())?;
        let context = app::GlContext::hidden("lgl-check")?;
        return Ok(check_all(&context.gl, &manifest, args.policy(&manifest), &BUILTIN_SHADERS));
    }

    let Some(path) = &args.manifest else {
        return Err("no manifest given (pass a path or --builtin)".to_string());
    };
    let manifest = Manifest::read(&FsReader::new(), path).map_err(|e| e.to_string())?;
    let reader = FsReader::with_root(path.parent().unwrap_or(Path::new("")));
    let context = app::GlContext::hidden("lgl-check")?;
    Ok(check_all(&context.gl, &manifest, args.policy(&manifest), &reader))
}

fn check_all<B: GraphicsBackend>(
    gl: &Arc<B>,
    manifest: &Manifest,
    policy: LoadPolicy,
    reader: &impl FileReader,
) -> bool {
    let mut clean = true;
    for (name, result) in manifest.load_all(policy, gl, reader) {
        match result {
            Ok(loaded) if loaded.is_clean() => info!("{name}: ok"),
            Ok(loaded) => {
                clean = false;
                warn!(
                    "{name}: built with {} problem(s)",
                    loaded.diagnostics.len()
                );
                for line in report(&name, &loaded.diagnostics) {
                    error!("{line}");
                }
            }
            Err(e) => {
                clean = false;
                for line in report(&name, e.diagnostics()) {
                    error!("{line}");
                }
            }
        }
    }
    clean
}

/// One line per diagnostic, prefixed with the program's name.
fn report(name: &str, diagnostics: &[ShaderError]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|diagnostic| format!("{name}: [{}] {diagnostic}", diagnostic.tag()))
        .collect()
}
