/*
 *  main.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

use ba63mon::config;
use ba63mon::console::{self, Outcome};
use ba63mon::display::{
    DisplayController, MockTransport, SerialTransport, TickToken, TokioTimer, Transport,
};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Everything the controller reacts to arrives on one queue, so the
/// controller is only ever touched by the main task.
#[derive(Debug)]
enum Event {
    Tick(TickToken),
    Line(String),
    EndOfInput,
    Shutdown,
}

impl From<TickToken> for Event {
    fn from(token: TickToken) -> Self {
        Event::Tick(token)
    }
}

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
///
/// Once a signal is caught it is logged and the function returns,
/// allowing for graceful shutdown.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Forward stdin lines to the event queue
async fn read_commands(events: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if events.send(Event::Line(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        }
    }
    let _ = events.send(Event::EndOfInput);
}

#[tokio::main(flavor = "current_thread")] // one thread owns the display
async fn main() -> anyhow::Result<()> {
    let (cfg, cli) = config::load()?;

    // Initialize the logger with the appropriate level
    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let transport: Box<dyn Transport> = if cli.dry_run {
        info!("Dry run - display output goes to a mock link");
        Box::new(MockTransport::new())
    } else {
        // a display on a misconfigured link only shows garbage; give up now
        match SerialTransport::open_with_baud(cfg.port(), cfg.baud()) {
            Ok(t) => Box::new(t),
            Err(e) => {
                error!("{}", e);
                return Err(e).context("serial display unavailable");
            }
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let timer = TokioTimer::new(tx.clone());
    let controller_config = cfg.controller_config();
    let mut ctl = DisplayController::new(transport, timer, &controller_config);

    // write failures from here on are transient
    if let Err(e) = ctl.start() {
        warn!("Display start-up sequence failed: {}", e);
    }

    if let Some(name) = cfg.preset() {
        if let Err(e) = ctl.apply_preset(name) {
            warn!("{}", e);
        } else {
            let _ = ctl.select_slot(0);
        }
    }
    if cfg.auto() {
        let _ = ctl.enable_auto_advance();
    }

    tokio::spawn(read_commands(tx.clone()));

    let shutdown_tx = tx.clone();
    tokio::spawn(async move {
        if let Err(e) = signal_handler().await {
            error!("Signal handler setup failed: {}", e);
            return;
        }
        let _ = shutdown_tx.send(Event::Shutdown);
    });
    drop(tx);

    println!("{}", console::status(&ctl));

    while let Some(event) = rx.recv().await {
        match event {
            Event::Tick(token) => {
                if let Some(slot) = ctl.on_tick(token) {
                    debug!("Auto-advanced to slot {}", slot);
                }
            }
            Event::Line(line) => match console::parse_command(&line) {
                Ok(None) => {}
                Ok(Some(cmd)) => match console::execute(&mut ctl, cmd) {
                    Ok(Outcome::Continue(Some(reply))) => println!("{}", reply),
                    Ok(Outcome::Continue(None)) => {}
                    Ok(Outcome::Quit) => break,
                    Err(e) => println!("error: {}", e),
                },
                Err(msg) => println!("{}", msg),
            },
            Event::EndOfInput => {
                if ctl.is_auto_advancing() {
                    info!("Input closed, rotating until signalled.");
                    continue;
                }
                info!("End of input.");
                break;
            }
            Event::Shutdown => break,
        }
    }

    info!("Main application exiting. Clearing display.");
    if let Err(e) = ctl.shutdown() {
        warn!("Could not clear display on exit: {}", e);
    }

    Ok(())
}
