use clap::{CommandFactory, Parser};
use imgresize::imaging::RustEngine;
use imgresize::policy::ResizeRequest;
use imgresize::{config, resize};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "imgresize")]
#[command(about = "Resize and transcode a single image")]
#[command(long_about = "\
Resize and transcode a single image

The output file's extension picks the output format; without one the
source format is kept. Width and height default to the source size and
can be set independently.

Examples:

  imgresize --input photo.jpg --width 400 --height 400
      → resized.jpg, fit inside 400x400 keeping the aspect ratio

  imgresize --input photo.jpg --output thumb.webp --width 200 --height 200 --stretch
      → thumb.webp, exactly 200x200

Encoder settings per output format:
  .jpeg/.jpg  quality 85
  .png        compression 7
  .webp       quality 85 (lossy)
  .avif       quality 85, speed 6
  others      encoder defaults

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=imgresize=debug) to
change verbosity.")]
#[command(version)]
struct Cli {
    /// Input image to resize/transcode
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file; its extension determines the output type [default: "resized" + input extension]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output width, 0 keeps the source width
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Output height, 0 keeps the source height
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Stretch to exactly width x height instead of fitting inside it
    #[arg(long)]
    stretch: bool,

    /// Number of times to run the whole resize, one after another
    #[arg(long, default_value_t = 1)]
    iteration: u32,

    /// TOML file with resource limits (buffer size, max dimension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock config file with all options documented, then exit
    #[arg(long)]
    gen_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgresize=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    let Some(input) = cli.input.clone() else {
        println!("No input filename provided, quitting.");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(&cli, input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", error_chain(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::load_config(cli.config.as_deref())?;
    let engine = RustEngine::with_max_dimension(settings.max_dimension);

    let input_bytes = resize::read_input(&input)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| resize::default_output_path(&input));

    let request = ResizeRequest {
        width: cli.width,
        height: cli.height,
        output,
        stretch: cli.stretch,
    };

    resize::run_iterations(
        &engine,
        &input_bytes,
        &request,
        settings.output_buffer_size,
        cli.iteration,
    )?;
    Ok(())
}

/// Render an error and all of its sources as `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
