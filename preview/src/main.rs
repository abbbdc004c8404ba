mod cli;
mod config;
mod playback;
mod terminal;

use std::io::{self, BufRead, Read};
use std::path::Path;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use myrtio_light_sequencer::{
    Analysis, BeatSyncDriver, CancelToken, CommandStatus, LightCommand, PatternPlayer,
    RenderWorker, Renderer, Rgb, SmartLedsDriver, ThreadPacer, TrackId,
};

use cli::{Cli, Mode};
use playback::{ClockPlayback, FileAnalysis};
use terminal::TerminalStrip;

type TerminalRenderer = Renderer<SmartLedsDriver<TerminalStrip>, ThreadPacer>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut cfg = match cli.config {
        Some(ref path) => {
            let cfg = config::load_config(path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => config::Config::default(),
    };
    if let Some(leds) = cli.leds {
        if leds == 0 {
            bail!("--leds must be at least 1");
        }
        cfg.strip.led_count = leds;
    }

    match cli.mode {
        Mode::Pattern { ref command, hold } => {
            if hold {
                cfg.pattern.hold = true;
            }
            run_pattern(&cfg, command)
        }
        Mode::Sync {
            ref analysis,
            start,
            end,
            offset_ms,
        } => run_sync(&cfg, analysis, start, end, offset_ms),
    }
}

fn terminal_renderer(cfg: &config::Config) -> TerminalRenderer {
    let strip = TerminalStrip::new(cfg.strip.columns);
    let driver = SmartLedsDriver::new(strip, cfg.strip.led_count);
    Renderer::with_gamma(driver, ThreadPacer, cfg.strip.gamma)
}

fn read_command(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("reading command from stdin")?;
        return Ok(json);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading command {}", path.display()))
}

fn run_pattern(cfg: &config::Config, path: &Path) -> Result<()> {
    let json = read_command(path)?;
    let parsed = LightCommand::parse(&json);
    println!("{}", CommandStatus::of(&parsed));
    let command = parsed?;

    log::info!(
        "Playing {} keyframes, cycle of {} ms",
        command.pattern.len(),
        command.pattern.cycle_duration().as_millis()
    );

    let sequencer = cfg.sequencer();
    let mut renderer = terminal_renderer(cfg);
    let worker = RenderWorker::spawn("pattern", move |cancel| {
        let mut player = PatternPlayer::new(sequencer.pattern);
        player.run(&mut renderer, command.pattern.as_slice(), &cancel)
    })
    .context("starting pattern worker")?;

    let run = wait_for_worker(worker)?;
    log::info!("Stopped after {} cycles, {} frames", run.cycles, run.frames);
    Ok(())
}

fn run_sync(
    cfg: &config::Config,
    path: &Path,
    start: Rgb,
    end: Rgb,
    offset_ms: u64,
) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading analysis {}", path.display()))?;
    let analysis = Analysis::from_seconds_json(&json)?;
    let length_ms = analysis.end_ms();
    if offset_ms >= length_ms {
        bail!("offset {offset_ms} ms is past the end of the track ({length_ms} ms)");
    }

    let track = TrackId::from(
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("track"),
    );
    log::info!(
        "{track}: {} beats, {} segments, {:.1} bpm, {length_ms} ms",
        analysis.beats.len(),
        analysis.segments.len(),
        analysis.tempo_bpm
    );

    let sequencer = cfg.sequencer();
    let mut renderer = terminal_renderer(cfg);
    let playback = ClockPlayback::start(track.clone(), offset_ms, length_ms);
    let analyses = FileAnalysis::new(track, analysis);
    let worker = RenderWorker::spawn("beat-sync", move |cancel| {
        let mut driver = BeatSyncDriver::new(playback, analyses, sequencer.sync, start, end);
        driver.run(&mut renderer, &cancel)
    })
    .context("starting beat sync worker")?;

    let exit = wait_for_worker(worker)?;
    log::info!("Beat sync finished: {exit:?}");
    Ok(())
}

/// Run until Enter is pressed or the worker returns on its own
fn wait_for_worker<T, E>(worker: RenderWorker<Result<T, E>>) -> Result<T>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let token = worker.cancel_token();
    spawn_enter_listener(token);

    while !worker.is_finished() {
        thread::sleep(StdDuration::from_millis(50));
    }

    let result = worker
        .join()
        .map_err(|_| anyhow!("render worker panicked"))?;
    Ok(result?)
}

fn spawn_enter_listener(token: CancelToken) {
    let spawned = thread::Builder::new()
        .name("stdin".to_owned())
        .spawn(move || {
            let mut line = String::new();
            // EOF leaves the run going; only a real line stops it.
            if let Ok(read) = io::stdin().lock().read_line(&mut line)
                && read > 0
            {
                token.cancel();
            }
        });
    if let Err(err) = spawned {
        log::warn!("Enter to stop is unavailable: {err}");
    }
}
