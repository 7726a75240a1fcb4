//! `aligned_log_demo` - prints a handful of events through the aligned layer
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin aligned_log_demo
//! ALIGNED_LOG_LEVEL=debug cargo run --bin aligned_log_demo -- --time-format %H:%M:%S
//! cargo run --bin aligned_log_demo 2>demo.log   # bracket-fallback mode
//! ```
//!
//! Resize the terminal while `--watch` is running to see locations follow
//! the right edge.

use aligned_log::{
    AlignedHandler, AlignedLayer, DiagLevel, HandlerOptions, Level, Record, Style, Value,
    set_diag_callback,
};
use std::collections::HashMap;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing_subscriber::prelude::*;

const LEVEL_ENV: &str = "ALIGNED_LOG_LEVEL";

#[derive(Debug, Default)]
struct Args {
    time_format: Option<String>,
    no_color: bool,
    watch: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--time-format" => {
                args.time_format = Some(iter.next().ok_or("--time-format needs a value")?);
            }
            "--no-color" => args.no_color = true,
            "--watch" => args.watch = true,
            "-h" | "--help" => {
                return Err(
                    "usage: aligned_log_demo [--time-format FMT] [--no-color] [--watch]".into(),
                );
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn options(args: &Args) -> Result<HandlerOptions, String> {
    let mut options = HandlerOptions::default()
        .color(!args.no_color)
        .key_style(Style::dim());
    if let Ok(level) = std::env::var(LEVEL_ENV) {
        options = options.level(level.parse::<Level>()?);
    }
    if let Some(format) = &args.time_format {
        options = options.time_format(format.clone());
    }
    Ok(options)
}

fn emit_samples(handler: &AlignedHandler) {
    tracing::debug!(cache_entries = 512_u64, "warming cache");
    tracing::info!(port = 8080_u64, tls = true, "listening");

    let span = tracing::info_span!("request", method = "POST", path = "/api/orders");
    let _entered = span.enter();
    tracing::warn!(elapsed = ?Duration::from_millis(1240), "slow handler");

    let limits: HashMap<String, Value> = HashMap::from([
        ("max_items".to_string(), Value::from(50)),
        ("currency".to_string(), Value::from("EUR")),
        ("express".to_string(), Value::from(false)),
    ]);
    tracing::error!(reason = "quota exceeded\nretry after 30s", "order rejected");

    // tracing fields cannot carry maps
    let record = Record::new(Level::Info, "limits loaded").attr("limits", Value::Map(limits));
    if let Err(e) = handler.with_group("billing").handle(&record) {
        eprintln!("{e}");
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    let options = match options(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    set_diag_callback(|level, message| {
        if level != DiagLevel::Debug {
            eprintln!("aligned_log: {message}");
        }
    });

    let handler = match AlignedHandler::stderr(options) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(AlignedLayer::new(handler.clone()))
        .init();

    emit_samples(&handler);
    if args.watch {
        let mut tick = 0_u64;
        loop {
            thread::sleep(Duration::from_secs(2));
            tick += 1;
            tracing::info!(tick, "resize the terminal");
        }
    }
    ExitCode::SUCCESS
}
