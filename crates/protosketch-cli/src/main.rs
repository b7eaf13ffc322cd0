mod cli;
#[allow(unused_assignments)]
mod diagnostic;
mod error;

use std::fs;

use clap::Parser;

use crate::error::CliError;

fn main() {
    init_tracing();
    let cli = cli::Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            report(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}

fn run(cli: &cli::Cli) -> Result<(), CliError> {
    let source = fs::read_to_string(&cli.input).map_err(|source| CliError::Io {
        path: cli.input.clone(),
        source,
    })?;

    let output = protosketch_dsl::translate(&source).map_err(|error| CliError::Translate {
        error,
        source_text: source.clone(),
        file: cli.input.clone(),
    })?;

    tracing::debug!(file = %cli.input.display(), bytes = output.len(), "translated");
    print!("{output}");
    Ok(())
}

fn report(err: &CliError) {
    match err {
        CliError::Translate {
            error,
            source_text,
            file,
        } => {
            let diag = diagnostic::sketch_error_to_diagnostic(
                error,
                source_text,
                &file.display().to_string(),
            );
            eprintln!("{:?}", miette::Report::new(diag));
        }
        other => eprintln!("error: {other}"),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
