use bmpfx::codec::BmpFile;
use bmpfx::filters::{Engine, FilterRegistry};
use bmpfx::pipeline::{Pipeline, parse_steps};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bmpfx")]
#[command(about = "Apply a chain of filters to a 24-bit BMP image")]
#[command(long_about = "\
Apply a chain of filters to a 24-bit BMP image

Each filter spec is a name optionally followed by a colon-separated
parameter list:

  bmpfx in.bmp out.bmp 4 grayscale threshold:4
  bmpfx in.bmp out.bmp 8 boxblur:5 unsharp:5,150

Available filters:
  identity              no-op
  negative              invert every channel
  grayscale             Rec. 601 luma
  threshold:N           quantize to N levels (N >= 1)
  boxblur:K             K x K box blur (K odd)
  unsharp:K,S           unsharp mask, kernel K (odd), strength S percent

Filters run in the order given. Only uncompressed 24-bit BMP input is
accepted.")]
#[command(version)]
struct Cli {
    /// Input BMP file
    input: PathBuf,

    /// Output BMP file (overwritten if present)
    output: PathBuf,

    /// Worker threads per filter invocation (at least 1)
    threads: usize,

    /// Filter specs, `name[:param1,param2,...]`
    #[arg(required = true)]
    filters: Vec<String>,
}

fn main() -> ExitCode {
    // The CLI contract is exit 1 on any failure, clap's default of 2 for
    // argument errors included. Help and version still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{e}");
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let bytes = std::fs::read(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input.display()))?;
    let mut bmp = BmpFile::decode(&bytes)
        .map_err(|e| format!("cannot decode {}: {e}", cli.input.display()))?;

    let registry = FilterRegistry::builtin();
    let engine = Engine::new(cli.threads).map_err(|e| e.to_string())?;
    let steps = parse_steps(&cli.filters);
    for step in &steps {
        println!("==> {step}");
    }

    let started = Instant::now();
    Pipeline::new(steps)
        .run(&mut bmp.raster, &registry, &engine)
        .map_err(|e| e.to_string())?;
    println!("Processed in {:.3}s", started.elapsed().as_secs_f64());

    std::fs::write(&cli.output, bmp.encode())
        .map_err(|e| format!("cannot write {}: {e}", cli.output.display()))?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}
