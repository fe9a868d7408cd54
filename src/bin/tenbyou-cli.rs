use core::fmt::Debug;
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tenbyou::acquire::{acquire, Fit, Source};
use tenbyou::config::Config;
use tenbyou::rand::Rng;
use tenbyou::timer::{Clock, Interval, VirtualClock, WallClock};
use tenbyou::{animate, Canvas, DotLog, RenderSession, Tick};

#[derive(Parser)]
#[clap(about = "Repaint an image as layered, semi-transparent dots")]
struct Opts {
    /// Input image (PNG, JPEG, GIF or BMP).
    input: PathBuf,
    /// Output PNG. Defaults to `<input stem>-tenbyou.png` next to the input.
    #[clap(short, long)]
    out: Option<PathBuf>,
    /// Hex-encoded seed. Defaults to one derived from the current time.
    #[clap(long)]
    seed: Option<Seed>,
    /// Shrink the image to at most this many pixels wide before sampling.
    #[clap(long)]
    max_width: Option<u32>,
    /// Shrink the image to at most this many pixels tall before sampling.
    #[clap(long)]
    max_height: Option<u32>,
    /// Wait out each tick period in real time instead of rendering as fast as possible.
    #[clap(long)]
    realtime: bool,
    /// Write progress snapshots into this directory.
    #[clap(long)]
    frames_dir: Option<PathBuf>,
    /// Ticks between progress snapshots.
    #[clap(long, default_value = "250")]
    frame_every: u64,
    /// Write every dot drawn to this file as JSON.
    #[clap(long)]
    dots_json: Option<PathBuf>,
    /// Print a JSON summary of the session to stdout.
    #[clap(long)]
    summary: bool,
    #[clap(flatten)]
    config: Config,
}

#[derive(Clone)]
struct Seed(pub Vec<u8>);
impl Seed {
    fn from_clock() -> Seed {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Seed(nanos.to_be_bytes().to_vec())
    }
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
impl FromStr for Seed {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).context("seed must be hex")?;
        Ok(Seed(bytes))
    }
}
impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0x")?;
        f.write_str(&hex::encode(&self.0))
    }
}
impl Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    input: &'a Path,
    output: &'a Path,
    seed: String,
    width: u32,
    height: u32,
    ticks: u64,
    dots: u64,
    config: &'a Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let fit = match (opts.max_width, opts.max_height) {
        (None, None) => Fit::Natural,
        (w, h) => Fit::Within {
            max_width: w.unwrap_or(u32::MAX),
            max_height: h.unwrap_or(u32::MAX),
        },
    };
    let buffer = acquire(Source::Path(opts.input.clone()), fit)
        .with_context(|| format!("Failed to load image {}", opts.input.display()))?;
    let (width, height) = (buffer.width(), buffer.height());

    let seed = opts.seed.clone().unwrap_or_else(Seed::from_clock);
    let out = opts.out.clone().unwrap_or_else(|| default_output(&opts.input));
    if let Some(dir) = &opts.frames_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let log = opts.dots_json.as_ref().map(|_| DotLog::new());
    let rng = Rng::from_seed(seed.as_bytes());
    let mut session = RenderSession::start(buffer, (Canvas::new(), log), &opts.config, rng)
        .context("Failed to start render session")?;
    tracing::info!(%seed, output = %out.display(), "rendering");

    let ticks = if opts.realtime {
        run(&mut session, Interval::new(opts.config.period(), WallClock), &opts)?
    } else {
        run(
            &mut session,
            Interval::new(opts.config.period(), VirtualClock::default()),
            &opts,
        )?
    };

    let dots = session.dots_drawn();
    let (canvas, log) = session.into_surface();
    canvas
        .write_png(&out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    tracing::info!(ticks, dots, "wrote png: {}", out.display());

    if let (Some(path), Some(log)) = (&opts.dots_json, &log) {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), log.dots())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if opts.summary {
        let summary = Summary {
            input: &opts.input,
            output: &out,
            seed: seed.to_string(),
            width,
            height,
            ticks,
            dots,
            config: &opts.config,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

type Session = RenderSession<(Canvas, Option<DotLog>)>;

fn run<C: Clock>(
    session: &mut Session,
    mut interval: Interval<C>,
    opts: &Opts,
) -> anyhow::Result<u64> {
    let mut snapshot_error = None;
    let ticks = animate(session, &mut interval, |session, tick| {
        let Some(dir) = &opts.frames_dir else {
            return;
        };
        let due = opts.frame_every > 0 && session.ticks() % opts.frame_every == 0;
        if snapshot_error.is_none() && (due || tick == Tick::Finished) {
            let path = dir.join(format!("frame-{:05}.png", session.ticks()));
            if let Err(e) = session.surface().0.write_png(&path) {
                snapshot_error = Some(anyhow::Error::new(e).context(format!(
                    "Failed to write frame {}",
                    path.display()
                )));
            }
        }
    });
    match snapshot_error {
        Some(e) => Err(e),
        None => Ok(ticks),
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    input.with_file_name(format!("{}-tenbyou.png", stem))
}
