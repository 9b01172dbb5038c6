use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, path::PathBuf, time::Duration};

use fretwise::audio::preview;
use fretwise::config::FretwiseConfig;
use fretwise::fretboard::{Mode, Resolver};
use fretwise::midi::{file::load_pitches, handler::MidiHandler};
use fretwise::report::Report;
use fretwise::types::events::PhraseEvent;
use fretwise::types::note::parse_pitch;
use fretwise::ui::{app::App, events, render};

/// Classical guitar fingering for MIDI phrases
#[derive(Parser, Debug)]
#[command(name = "fretwise")]
#[command(about = "String, fret, finger and position for every note of a phrase", long_about = None)]
struct Args {
    /// Configuration file (YAML)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// List available devices and exit
    #[arg(short = 'l', long = "list")]
    list_devices: bool,

    /// Standard MIDI file to finger
    #[arg(short = 'f', long = "file", conflicts_with = "notes")]
    file: Option<PathBuf>,

    /// Comma-separated pitches, as MIDI numbers or note names (e.g. 64,e4,f#3)
    #[arg(short = 'n', long = "notes", value_delimiter = ',')]
    notes: Option<Vec<String>>,

    /// Hand position: auto, 0-5 or I-V
    #[arg(short = 'p', long = "position")]
    position: Option<Mode>,

    /// Octave shift for printed note names
    #[arg(short = 'o', long = "octave", allow_hyphen_values = true)]
    octave: Option<i8>,

    /// Play the phrase through the audio output after printing it
    #[arg(long = "play")]
    play: bool,
}

/// List available audio output devices
fn list_audio_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let devices: Vec<String> = host
        .output_devices()?
        .filter_map(|device| {
            device
                .description()
                .ok()
                .map(|desc| desc.name().to_string())
        })
        .collect();

    Ok(devices)
}

/// Find device index by name or index string
fn find_device(kind: &str, devices: &[String], search: &str) -> Result<usize> {
    // Try to parse as index first
    if let Ok(index) = search.parse::<usize>() {
        if index < devices.len() {
            return Ok(index);
        }
        return Err(anyhow!(
            "{} device index {} out of range ({} available)",
            kind,
            index,
            devices.len()
        ));
    }

    // Search by name (case-insensitive substring match)
    let search_lower = search.to_lowercase();
    devices
        .iter()
        .position(|device| device.to_lowercase().contains(&search_lower))
        .ok_or_else(|| anyhow!("{} device '{}' not found", kind, search))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if args.list_devices {
        println!("Available MIDI Input Devices:");
        for (i, device) in MidiHandler::list_devices()?.iter().enumerate() {
            println!("  {}: {}", i, device);
        }
        println!("\nAvailable Audio Output Devices:");
        for (i, device) in list_audio_devices()?.iter().enumerate() {
            println!("  {}: {}", i, device);
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => FretwiseConfig::load(path)?,
        None => FretwiseConfig::default(),
    };
    if let Some(octave) = args.octave {
        config.octave = octave;
        config.validate()?;
    }

    let resolver = Resolver::new(config.tuning()?);
    let mode = match args.position {
        Some(mode) => mode,
        None => config.mode()?,
    };

    let pitches = match (&args.file, &args.notes) {
        (Some(path), _) => Some(
            load_pitches(path, config.midi_channel(), config.max_notes)
                .with_context(|| format!("Failed to load {}", path.display()))?,
        ),
        (None, Some(tokens)) => Some(
            tokens
                .iter()
                .map(|t| parse_pitch(t).with_context(|| format!("Invalid note: {}", t)))
                .collect::<Result<Vec<u8>>>()?,
        ),
        (None, None) => None,
    };

    match pitches {
        Some(pitches) => run_report_mode(&config, &resolver, mode, &pitches, args.play),
        None => run_live_mode(&config, resolver, mode),
    }
}

/// Print the fingering of a fixed phrase, optionally playing it back
fn run_report_mode(
    config: &FretwiseConfig,
    resolver: &Resolver,
    mode: Mode,
    pitches: &[u8],
    play: bool,
) -> Result<()> {
    if pitches.is_empty() {
        return Err(anyhow!("The phrase contains no notes"));
    }

    let report = Report::build(resolver, pitches, mode, config.octave);
    print!("{}", report.render());

    if play {
        let device = select_audio_device(config)?;
        preview::play(&device, pitches, &config.preview)?;
    }

    Ok(())
}

fn select_audio_device(config: &FretwiseConfig) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match &config.devices.audioout {
        Some(search) => {
            let devices = list_audio_devices()?;
            let index = find_device("Audio", &devices, search)?;
            host.output_devices()?
                .nth(index)
                .ok_or_else(|| anyhow!("Selected audio device not available"))
        }
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow!("No audio output devices found")),
    }
}

/// Finger notes played live on a MIDI input
fn run_live_mode(config: &FretwiseConfig, resolver: Resolver, mode: Mode) -> Result<()> {
    let midi_devices = MidiHandler::list_devices()?;
    if midi_devices.is_empty() {
        return Err(anyhow!("No MIDI input devices found"));
    }
    let selected_midi_device = match &config.devices.midiin {
        Some(search) => find_device("MIDI", &midi_devices, search)?,
        None => 0,
    };

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let midi_handler = MidiHandler::new_with_device(
        event_tx,
        selected_midi_device,
        config.midi_channel_filter(),
    )?;

    let mut app = App::new(
        resolver,
        mode,
        config.octave,
        midi_handler.port_name().to_string(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui_loop(&mut terminal, &mut app, event_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: crossbeam_channel::Receiver<PhraseEvent>,
) -> Result<()> {
    loop {
        // Drain notes from the MIDI thread
        while let Ok(event) = event_rx.try_recv() {
            app.handle_phrase_event(event);
        }

        terminal.draw(|f| render::render(f, app))?;

        events::handle_events(app)?;

        if app.should_quit {
            break;
        }

        std::thread::sleep(Duration::from_millis(16)); // ~60 FPS
    }

    Ok(())
}
