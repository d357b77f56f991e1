use {
    clap::Parser,
    log::{error, info},
    shader_variants::{
        scan::{collect_shader_paths, collect_variants, VariantsFile},
        vfs::{FileSystem, OsFileSystem},
        Result,
    },
    std::{path::PathBuf, process::exit},
};

/// Finds the `#ifdef` defines used by a tree of shaders and writes them as a variants file.
fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    if let Err(err) = reflect(&args) {
        error!("{err}");

        exit(1);
    }
}

fn reflect(args: &Args) -> Result<()> {
    let shader_paths = collect_shader_paths(&args.shader_dir);

    info!("Found {} shader files", shader_paths.len());

    let variants = collect_variants(&OsFileSystem, &shader_paths);
    let json = VariantsFile::new(&variants).to_json()?;

    OsFileSystem.write_file(&args.output, json.as_bytes())
}

#[derive(Parser)]
struct Args {
    /// Directory searched recursively for shader sources
    #[arg(long)]
    shader_dir: PathBuf,

    /// Path of the JSON variants file
    #[arg(short, long)]
    output: PathBuf,
}
