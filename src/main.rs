use std::{error::Error, fs, path::PathBuf};

use clap::{Parser, Subcommand};
use dicom_series_crop::{CropRectangle, SeriesId, Session, SessionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dicom-series-crop", version, about)]
struct Cli {
    /// Root folder for `Serie_<n>` copies and cropped output
    #[arg(long, default_value = "dicom_series_organizadas")]
    output_root: PathBuf,

    /// Do not copy files into per-series folders
    #[arg(long)]
    no_mirror: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the series found in a folder
    Series { folder: PathBuf },

    /// Apply one rectangle to every image of a series
    Crop {
        folder: PathBuf,

        #[arg(long, value_parser = parse_series)]
        series: SeriesId,

        /// x1 y1 x2 y2 in image pixels, corners in any order
        #[arg(long, num_args = 4, allow_negative_numbers = true, value_names = ["X1", "Y1", "X2", "Y2"])]
        rect: Vec<i64>,

        /// Destination folder, defaults to `<output-root>/Serie_<n>/recortadas`
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write PNG thumbnails of a series
    Thumbnails {
        folder: PathBuf,

        #[arg(long, value_parser = parse_series)]
        series: SeriesId,

        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 150)]
        size: u32,
    },
}

fn parse_series(raw: &str) -> Result<SeriesId, String> {
    SeriesId::parse(raw).ok_or_else(|| "series must not be empty".to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::new()
        .with_output_root(cli.output_root)
        .with_mirror_series(!cli.no_mirror);

    match cli.command {
        Commands::Series { folder } => {
            let mut session = Session::new(config);
            let report = session.organize(&folder)?;
            for (series, count) in session.list_series() {
                println!("Serie {series} ({count} imágenes)");
            }
            if !report.skipped.is_empty() {
                eprintln!("{} files skipped", report.skipped.len());
            }
        }
        Commands::Crop {
            folder,
            series,
            rect,
            out,
        } => {
            let mut session = Session::new(config);
            session.organize(&folder)?;
            let rect = CropRectangle::new(rect[0], rect[1], rect[2], rect[3]);
            let report = session.crop_series(&series, rect, out.as_deref())?;
            for failure in &report.failed {
                eprintln!("{}: {}", failure.path.display(), failure.reason);
            }
            println!(
                "{} cropped, {} failed",
                report.succeeded(),
                report.failed_count()
            );
        }
        Commands::Thumbnails {
            folder,
            series,
            out,
            size,
        } => {
            config = config.with_thumbnail_size(size);
            let mut session = Session::new(config);
            session.organize(&folder)?;
            fs::create_dir_all(&out)?;
            for thumbnail in session.series_thumbnails(&series)? {
                let name = format!("{:03}_{}.png", thumbnail.slot, thumbnail.caption.replace(' ', "_"));
                thumbnail.image.save(out.join(name))?;
            }
        }
    }
    Ok(())
}
