use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, instrument};

use framegen::frame::{FrameParameters, PixelFormat};
use framegen::log::init_logger;
use framegen::serve::{bind, serve};
use framegen::source::{FileFrameSource, FrameSource, PatternSource};

/// Serve raw frames to a single TCP client at a fixed frame rate.
///
/// With an input file, frames are replayed from it and the file loops back
/// to the start at end of file; without one, a generated gradient test
/// pattern is served. Only one connected client is supported.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// frame width in pixels
    #[arg(short, long, default_value_t = 640)]
    width: usize,

    /// frame height in pixels
    #[arg(short = 'H', long, default_value_t = 480)]
    height: usize,

    /// target frame rate in frames per second
    #[arg(short = 'r', long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    frame_rate: u32,

    /// pixel format
    #[arg(short, long, value_enum, default_value_t = PixelFormat::Rgb)]
    format: PixelFormat,

    /// port to listen on for the client connection
    listen_port: u16,

    /// file of raw frames to replay; a gradient pattern is served when omitted
    input_file: Option<PathBuf>,

    /// log level
    #[arg(long, default_value_t = String::from("info"))]
    log_level: String,

    /// log file
    #[arg(long, default_value_t = String::from("frameserve.log"))]
    log_file: String,
}

#[instrument]
fn main() -> Result<()> {
    let args = Args::parse();

    let guard = init_logger(args.log_level, args.log_file)?;

    let params = FrameParameters::new(args.width, args.height, args.format)?;

    let mut source: Box<dyn FrameSource> = match &args.input_file {
        Some(path) => {
            info!(path = %path.display(), "replaying frame file");
            Box::new(FileFrameSource::open(path, params)?)
        }
        None => {
            info!("serving generated gradient pattern");
            Box::new(PatternSource::new(params))
        }
    };

    let listener = bind(args.listen_port)?;
    info!(
        addr = %listener.local_addr()?,
        width = params.width,
        height = params.height,
        format = %params.format,
        rate = args.frame_rate,
        "waiting for a client"
    );

    serve(&listener, source.as_mut(), args.frame_rate)?;

    drop(guard);
    Ok(())
}
