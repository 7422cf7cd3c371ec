use clap::Parser;
use facecheck_core::{ComparisonResult, EmbeddingSource, VerifyError};
use facecheck_onnx::{OnnxEmbeddingSource, SourceConfig};
use std::ffi::OsString;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Prints exactly one JSON result on stdout. Exit status is 0 for every
/// comparison outcome, including "not found" and "no match"; only a wrong
/// argument count exits 1.
///
/// Both arguments are taken verbatim, so `-x.jpg` is a path and `--help` is
/// just a wrong argument count.
#[derive(Parser, Debug)]
#[command(
    name = "facecheck",
    about = "One-to-one face verification",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Reference photo of the enrolled person
    #[arg(allow_hyphen_values = true)]
    reference: PathBuf,
    /// Freshly captured photo to verify
    #[arg(allow_hyphen_values = true)]
    captured: PathBuf,
}

enum Invocation {
    Compare(Cli),
    Bad(clap::Error),
}

fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Invocation::Compare(cli),
        Err(e) => Invocation::Bad(e),
    }
}

/// Run the comparison; a panic anywhere below still yields a result.
fn execute<S>(cli: &Cli, source: &mut S) -> ComparisonResult
where
    S: EmbeddingSource + ?Sized,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        facecheck_core::compare_faces(source, &cli.reference, &cli.captured)
    }));
    outcome.unwrap_or_else(|_| {
        tracing::error!("comparison panicked");
        ComparisonResult::failure(&VerifyError::Internal("unexpected panic".into()))
    })
}

fn report(result: &ComparisonResult, code: i32) -> ExitCode {
    println!("{}", result.to_json());
    ExitCode::from(code as u8)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match parse_args(std::env::args_os()) {
        Invocation::Compare(cli) => {
            tracing::debug!(reference = %cli.reference.display(), captured = %cli.captured.display(), "comparing");
            let mut source = OnnxEmbeddingSource::new(SourceConfig::from_env());
            let result = execute(&cli, &mut source);
            report(&result, 0)
        }
        Invocation::Bad(e) => {
            tracing::warn!(kind = ?e.kind(), "invalid invocation");
            let err = VerifyError::BadInvocation;
            report(&ComparisonResult::failure(&err), err.exit_code())
        }
    }
}
