/// Entry point: CLI, logging, config, then the quiz session.

mod config;
mod domain;
mod sim;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use config::GameConfig;
use domain::alphabet::Dictionary;
use domain::code::LevelId;
use domain::error::MorseError;
use sim::event::{GameEvent, Status};
use sim::generator::RoundGenerator;
use sim::session::{EventSink, GameSession, SessionOutcome, SessionReport};
use ui::console::Console;
use ui::gamepad::GamepadState;
use ui::input::TokenEntry;
use ui::sound::SoundEngine;

#[derive(Parser, Debug)]
#[command(name = "morse-trainer", version, about = "Terminal Morse code quiz with four levels")]
struct Args {
    /// Seed for the symbol generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Start at this level (1-4) instead of showing the menu
    #[arg(long)]
    level: Option<u8>,

    /// Read settings from this file instead of searching for config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    ///
    /// The quiz runs the terminal in raw mode, so log lines interleaved with
    /// the game will not line up. Redirect stderr when raising verbosity,
    /// e.g. `morse-trainer -vv 2>trainer.log`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output at all
    #[arg(short, long)]
    quiet: bool,

    /// Disable audio
    #[arg(long)]
    no_sound: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        .verbosity(level)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
    {
        eprintln!("Logger init failed: {e}");
    }

    let mut config = GameConfig::load(args.config.as_deref());
    if args.seed.is_some() {
        config.game.seed = args.seed;
    }
    if args.level.is_some() {
        config.game.start_level = args.level;
    }
    if args.no_sound {
        config.sound.enabled = false;
    }

    let dict = match Dictionary::new() {
        Ok(d) => d,
        Err(e) => {
            error!("dictionary construction failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let start = match config.game.start_level.map(LevelId::from_number).transpose() {
        Ok(start) => start,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let generator = match config.game.seed {
        Some(seed) => RoundGenerator::new(seed),
        None => RoundGenerator::from_entropy(),
    };
    info!("symbol seed {} (replay with --seed {})", generator.seed(), generator.seed());

    let sound = if config.sound.enabled {
        SoundEngine::new(&config.sound)
    } else {
        None
    };

    let mut gamepad = GamepadState::new();
    gamepad.load_button_config(&config.gamepad);
    if gamepad.connected {
        info!("gamepad connected");
    }

    let mut console = Console::new();
    if let Err(e) = console.init() {
        error!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let result = play(
        &mut console,
        &dict,
        generator,
        sound.as_ref(),
        TokenEntry::new(gamepad),
        start,
        config.game.repeat_after_miss,
    );

    if let Some(sfx) = &sound {
        sfx.drain();
    }
    if let Err(e) = console.cleanup() {
        error!("Terminal cleanup failed: {e}");
    }

    println!();
    println!("Thanks for playing Morse Trainer!");
    match result {
        Ok(Some(report)) => {
            println!("{}", summary(&report));
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Game error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Welcome, level menu, then the session. `None` if the menu was cancelled.
fn play(
    console: &mut Console,
    dict: &Dictionary,
    generator: RoundGenerator,
    sound: Option<&SoundEngine>,
    mut entry: TokenEntry,
    start: Option<LevelId>,
    repeat_after_miss: bool,
) -> Result<Option<SessionReport>, MorseError> {
    console.write_lines(&ui::console::welcome_lines())?;
    console.lamp(Status::idle())?;

    let start = match start {
        Some(level) => level,
        None => match choose_level(console, &mut entry)? {
            Some(level) => level,
            None => return Ok(None),
        },
    };

    let mut session = GameSession::new(dict, generator, repeat_after_miss);
    let mut frontend = Frontend { console, dict, sound };
    session.run(start, &mut entry, &mut frontend).map(Some)
}

fn choose_level(console: &mut Console, entry: &mut TokenEntry) -> Result<Option<LevelId>, MorseError> {
    console.write_lines(&ui::console::menu_lines())?;
    loop {
        let Some(choice) = entry.read_level()? else {
            return Ok(None);
        };
        console.write_lines(&ui::console::menu_reply_lines(choice))?;
        if choice.is_some() {
            return Ok(choice);
        }
    }
}

fn summary(report: &SessionReport) -> String {
    let how = match report.outcome {
        SessionOutcome::Victory => "All levels cleared".to_string(),
        SessionOutcome::Failed { level } => format!("Out of lives on {level}"),
        SessionOutcome::Cancelled { level } => format!("Stopped during {level}"),
    };
    format!(
        "{how}. Levels cleared: {}. Attempts: {}, success rate {}%.",
        report.levels_cleared,
        report.totals.attempts(),
        report.totals.success_rate()
    )
}

/// Routes session events to the console, the status lamp and the speaker.
struct Frontend<'a> {
    console: &'a mut Console,
    dict: &'a Dictionary,
    sound: Option<&'a SoundEngine>,
}

impl EventSink for Frontend<'_> {
    fn emit(&mut self, event: &GameEvent) -> Result<(), MorseError> {
        match event {
            GameEvent::StatusChanged(status) => self.console.lamp(*status)?,
            other => self.console.show(other, self.dict)?,
        }
        process_sound_event(self.sound, event);
        Ok(())
    }
}

fn process_sound_event(sound: Option<&SoundEngine>, event: &GameEvent) {
    let Some(sfx) = sound else {
        return;
    };
    match event {
        GameEvent::SymbolShown { hint: Some(encoding), .. } => sfx.play_pattern(encoding),
        GameEvent::Correct { .. } => sfx.play_correct(),
        GameEvent::Incorrect { .. } => sfx.play_incorrect(),
        GameEvent::LevelComplete { .. } => sfx.play_level_complete(),
        GameEvent::GameOver { .. } => sfx.play_game_over(),
        GameEvent::Victory => sfx.play_victory(),
        _ => {}
    }
}
