use std::path::{ Path, PathBuf };
use std::process;

use clap::Parser;
use log::{ error, LevelFilter };

use prism_tracer::consts::{ DEFAULT_MAX_DEPTH, DEFAULT_SAMPLES, OUT_FILE };
use prism_tracer::error::Result;
use prism_tracer::registry::MaterialRegistry;
use prism_tracer::renderer::Renderer;
use prism_tracer::scene::Scene;

/// A multi-threaded Whitted-style ray tracer.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Samples per pixel axis (squared per pixel)
    #[clap(short, long, default_value_t = DEFAULT_SAMPLES)]
    samples: u32,

    /// Maximum ray recursion depth
    #[clap(short = 'r', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Scene description file
    scene_file: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let registry = MaterialRegistry::with_defaults();
    let scene = Scene::load(&args.scene_file, &registry)?;

    let renderer = Renderer::new(scene, args.samples, args.max_depth);
    let (canvas, stats) = renderer.render();
    stats.print_summary();

    canvas.save(Path::new(OUT_FILE))?;
    Ok(())
}

fn main() {
    // Usage errors exit with 84; -h and --version are not errors.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print().ok();
            process::exit(if err.use_stderr() { 84 } else { 0 });
        }
    };

    let mut builder = env_logger::Builder::from_default_env();
    if args.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("Error: {}", err);
        process::exit(84);
    }
}
