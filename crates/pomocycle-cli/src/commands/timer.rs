use std::time::Duration;

use clap::Subcommand;
use pomocycle_core::{
    Event, FileStore, IntervalTicker, ManualTicker, Ports, Settings, TimerEngine, TimerStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::host;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive session in the foreground.
    ///
    /// Reads commands from stdin, one per line: start, pause, resume, stop,
    /// status, preview, set <key> <value>, quit.
    Run {
        /// Length of one tick in milliseconds
        #[arg(long, default_value = "1000")]
        tick_ms: u64,
        /// Start the first work interval immediately
        #[arg(long)]
        autostart: bool,
        /// Exit once all cycles complete
        #[arg(long)]
        until_done: bool,
        /// Never show notifications
        #[arg(long)]
        no_notify: bool,
    },
    /// Print the idle timer state for the stored settings as JSON
    Status,
}

enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Status,
    Preview,
    Set { key: String, value: String },
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "stop" => Command::Stop,
        "status" => Command::Status,
        "preview" => Command::Preview,
        "quit" | "exit" | "q" => Command::Quit,
        "set" => {
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                return Err("usage: set <key> <value>".into());
            };
            Command::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn print_opt(event: Option<Event>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(event) = event {
        print_event(&event)?;
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            tick_ms,
            autostart,
            until_done,
            no_notify,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(session(
                Duration::from_millis(tick_ms.max(1)),
                autostart,
                until_done,
                !no_notify,
            ));
            // A pending stdin read must not hold the process open.
            runtime.shutdown_background();
            result
        }
        TimerAction::Status => {
            let engine = TimerEngine::new(
                Box::new(FileStore::open_default()?),
                Ports::silent(),
                Box::new(ManualTicker::new()),
            );
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            Ok(())
        }
    }
}

async fn session(
    period: Duration,
    autostart: bool,
    until_done: bool,
    notifications: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open_default()?;
    tracing::debug!(path = %store.path().display(), "settings store");
    let (ticker, mut ticks) = IntervalTicker::with_period(period)?;
    let mut engine = TimerEngine::new(
        Box::new(store),
        host::terminal_ports(notifications),
        Box::new(ticker),
    );
    engine.request_notification_permission();

    print_event(&engine.snapshot())?;
    if autostart {
        print_opt(engine.start())?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                let event = engine.tick(tick.generation);
                let finished = matches!(event, Some(Event::AllCyclesCompleted { .. }));
                print_opt(event)?;
                if finished && until_done {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Only a running --until-done session outlasts its input;
                    // idle and paused engines have no armed ticker to wake us.
                    if !until_done || engine.status() != TimerStatus::Running {
                        break;
                    }
                    stdin_open = false;
                    continue;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                match command {
                    Command::Start => print_opt(engine.start())?,
                    Command::Pause => print_opt(engine.pause())?,
                    Command::Resume => print_opt(engine.resume())?,
                    Command::Stop => print_opt(engine.stop())?,
                    Command::Status => print_event(&engine.snapshot())?,
                    Command::Preview => engine.preview_volume(),
                    Command::Set { key, value } => {
                        let mut settings: Settings = *engine.settings();
                        match settings.set_field(&key, &value) {
                            Ok(()) => print_opt(engine.update_settings(settings))?,
                            Err(e) => eprintln!("{e}"),
                        }
                    }
                    Command::Quit => break,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert!(matches!(parse_command("start"), Ok(Some(Command::Start))));
        assert!(matches!(parse_command("  PAUSE "), Ok(Some(Command::Pause))));
        assert!(matches!(parse_command("q"), Ok(Some(Command::Quit))));
        assert!(matches!(parse_command(""), Ok(None)));
    }

    #[test]
    fn parses_set() {
        match parse_command("set workMinutes 30") {
            Ok(Some(Command::Set { key, value })) => {
                assert_eq!(key, "workMinutes");
                assert_eq!(value, "30");
            }
            _ => panic!("Expected Set"),
        }
        assert!(parse_command("set cycles").is_err());
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(parse_command("dance").is_err());
    }
}
