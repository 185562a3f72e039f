//! Line-command shell: the thin presentation surface over the controller.
//!
//! Slots and lines are numbered from 1 here, as on the front panel
//! buttons; the controller works from 0.

use std::fmt::Write;

use crate::constants::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use crate::display::{ControllerError, DisplayController, TimerHost, Transport};
use crate::presets::preset_names;

pub const HELP: &str = "\
show <n>                 show message n
next                     advance to the next non-blank message
auto on [secs]           advance automatically
auto off                 stop advancing
interval <secs>          seconds between automatic advances
test                     lamp test (all pixels lit)
set <n> <line> [text]    change one line of message n
preset <name>            load a preset message set
presets                  list presets
list                     show all messages
status                   current message and auto-advance state
quit                     clear the display and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(usize),
    Next,
    Auto { enabled: bool, interval: Option<u32> },
    Interval(u32),
    Test,
    Set { slot: usize, line: usize, text: String },
    Preset(String),
    Presets,
    List,
    Status,
    Help,
    Quit,
}

/// What the shell should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

fn index(arg: Option<&str>, what: &str) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| format!("missing {} number", what))?;
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("bad {} number: {}", what, arg)),
    }
}

fn interval(arg: &str) -> Result<u32, String> {
    match arg.parse::<u32>() {
        Ok(secs) if (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) => Ok(secs),
        _ => Err(format!(
            "interval must be {}..={} seconds, got {}",
            MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, arg
        )),
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let input = input.trim_end_matches(['\r', '\n']);
    let trimmed = input.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let mut args = rest.split_whitespace();

    let cmd = match word.to_ascii_lowercase().as_str() {
        "show" | "s" => Command::Show(index(args.next(), "message")?),
        "next" | "n" => Command::Next,
        "auto" => match args.next() {
            Some("on") => Command::Auto {
                enabled: true,
                interval: args.next().map(interval).transpose()?,
            },
            Some("off") => Command::Auto { enabled: false, interval: None },
            _ => return Err("usage: auto on [secs] | auto off".to_string()),
        },
        "interval" => {
            let secs = args.next().ok_or("usage: interval <secs>")?;
            Command::Interval(interval(secs)?)
        }
        "test" => Command::Test,
        "set" => {
            // text is everything after "<n> <line> ", spacing kept
            let rest = rest.trim_start();
            let (slot, rest) = rest.split_once(' ').unwrap_or((rest, ""));
            let rest = rest.trim_start();
            let (line, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Command::Set {
                slot: index(Some(slot).filter(|s| !s.is_empty()), "message")?,
                line: index(Some(line).filter(|s| !s.is_empty()), "line")?,
                text: text.to_string(),
            }
        }
        "preset" => {
            let name = args.next().ok_or("usage: preset <name>")?;
            Command::Preset(name.to_string())
        }
        "presets" => Command::Presets,
        "list" | "ls" => Command::List,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {} (try help)", other)),
    };

    Ok(Some(cmd))
}

/// Run a command against the controller.
pub fn execute<T, H>(ctl: &mut DisplayController<T, H>, cmd: Command) -> Result<Outcome, ControllerError>
where
    T: Transport,
    H: TimerHost,
{
    let reply = match cmd {
        Command::Show(slot) => {
            ctl.select_slot(slot)?;
            None
        }
        Command::Next => {
            ctl.advance()?;
            Some(format!("message {}", ctl.current_slot() + 1))
        }
        Command::Auto { enabled: true, interval } => {
            if let Some(secs) = interval {
                ctl.set_interval(secs);
            }
            ctl.enable_auto_advance()?;
            Some(format!("auto every {}s", ctl.interval_secs()))
        }
        Command::Auto { enabled: false, .. } => {
            ctl.set_auto_advance(false, 0)?;
            Some("auto off".to_string())
        }
        Command::Interval(secs) => {
            ctl.set_interval(secs);
            if ctl.is_auto_advancing() {
                ctl.enable_auto_advance()?;
            }
            Some(format!("interval {}s", secs))
        }
        Command::Test => {
            ctl.trigger_test_pattern()?;
            None
        }
        Command::Set { slot, line, text } => {
            ctl.edit_line(slot, line, &text)?;
            let shown = ctl.store().active_lines();
            (line >= shown).then(|| {
                format!(
                    "warning: line {} is stored but not shown, the display has {} lines",
                    line + 1,
                    shown
                )
            })
        }
        Command::Preset(name) => {
            ctl.apply_preset(&name)?;
            Some(list(ctl))
        }
        Command::Presets => Some(preset_names().collect::<Vec<_>>().join(" ")),
        Command::List => Some(list(ctl)),
        Command::Status => Some(status(ctl)),
        Command::Help => Some(HELP.to_string()),
        Command::Quit => return Ok(Outcome::Quit),
    };

    Ok(Outcome::Continue(reply))
}

/// One row per message, current marked with `*`.
pub fn list<T: Transport, H: TimerHost>(ctl: &DisplayController<T, H>) -> String {
    let store = ctl.store();
    let mut out = String::new();
    for slot in 0..store.slot_count() {
        let mark = if slot == ctl.current_slot() { '*' } else { ' ' };
        let _ = write!(out, "{}{}", slot + 1, mark);
        for line in store.get_lines(slot).unwrap_or_default() {
            let _ = write!(out, " [{:<20}]", line);
        }
        out.push('\n');
    }
    out.pop();
    out
}

pub fn status<T: Transport, H: TimerHost>(ctl: &DisplayController<T, H>) -> String {
    let mut out = format!("message {}", ctl.current_slot() + 1);
    if ctl.is_showing_test_pattern() {
        out.push_str(", lamp test");
    }
    if ctl.is_auto_advancing() {
        let _ = write!(out, ", auto every {}s", ctl.interval_secs());
    } else {
        out.push_str(", auto off");
    }
    out
}
