use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};

use framegen::frame::{FrameParameters, PixelFormat};
use framegen::gradient::gradient_frame;
use framegen::log::init_logger;

/// Write synthetic raw-video frames to a file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// frame width in pixels
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// frame height in pixels
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// pixel format
    #[arg(short, long, value_enum, default_value_t = PixelFormat::Rgb)]
    format: PixelFormat,

    /// number of frames to generate
    num_frames: u32,

    /// output file path
    out_path: PathBuf,

    /// log level
    #[arg(long, default_value_t = String::from("info"))]
    log_level: String,

    /// log file
    #[arg(long, default_value_t = String::from("framegen.log"))]
    log_file: String,
}

#[instrument]
fn main() -> Result<()> {
    let args = Args::parse();

    let guard = init_logger(args.log_level, args.log_file)?;

    let params = FrameParameters::new(args.width, args.height, args.format)?;
    info!(
        width = params.width,
        height = params.height,
        format = %params.format,
        frames = args.num_frames,
        "generating gradient frames"
    );

    let mut out = BufWriter::new(File::create(&args.out_path)?);

    let pb = ProgressBar::new(args.num_frames as u64);
    pb.set_style(ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )?);

    for step in 0..args.num_frames {
        let frame = gradient_frame(params, step);
        out.write_all(frame.data())?;
        pb.inc(1);
    }
    out.flush()?;
    pb.finish_and_clear();

    info!(
        path = %args.out_path.display(),
        frames = args.num_frames,
        "frame file written"
    );

    drop(guard);
    Ok(())
}
