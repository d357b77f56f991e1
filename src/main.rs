use {
    clap::Parser,
    log::error,
    shader_variants::{prelude::*, run},
    std::{path::PathBuf, process::exit},
};

/// Compiles every variant of a declared shader and writes a source file embedding the SPIR-V.
///
/// Run with RUST_LOG=info to see each variant as it compiles.
fn main() {
    pretty_env_logger::init();

    let args = Args::parse();
    let language = args
        .language
        .unwrap_or_else(|| HeaderLanguage::from_output_path(&args.output));
    let mut info = PipelineInfo::new();

    if let Some(jobs) = args.jobs {
        info = info.jobs(jobs);
    }

    let res = Pipeline::new(info)
        .and_then(|pipeline| run(&OsFileSystem, &pipeline, &args.schema, &args.output, language));

    if let Err(err) = res {
        error!("Unable to compile {}: {err}", args.schema.display());

        exit(1);
    }
}

#[derive(Parser)]
struct Args {
    /// Path of the JSON shader declaration
    #[arg(long)]
    schema: PathBuf,

    /// Path of the generated source file
    #[arg(short, long)]
    output: PathBuf,

    /// Generated language (`rust` or `cpp`); defaults to Rust for `.rs` outputs and C++ otherwise
    #[arg(long)]
    language: Option<HeaderLanguage>,

    /// Number of variants compiled at once
    #[arg(short, long)]
    jobs: Option<usize>,
}
