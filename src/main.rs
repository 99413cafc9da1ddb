// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Simscene CLI entrypoint.
//!
//! Builds the demo script, optionally drops recorded protocols into it, and prints the laid-out
//! scene. Set `RUST_LOG=debug` to follow the notifications the scene handles.

use std::error::Error;

use simscene::config::SceneConfig;
use simscene::interaction::Editor;
use simscene::model::fixtures::{demo_protocols, demo_tree};
use simscene::scene::{DropPosition, SceneSnapshot};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--json] [--drop <payload>]\n\n--config reads scene geometry from a JSON file (missing keys keep their defaults).\n--json prints the scene snapshot as JSON instead of a text outline.\n--drop imports recorded protocols addressed by a `row,column,parent_row/` payload,\n       e.g. `0,0,-1/` for the whole demo group."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<String>,
    json: bool,
    drop: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--json" => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--drop" => {
                if options.drop.is_some() {
                    return Err(());
                }
                options.drop = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn print_outline(snapshot: &SceneSnapshot) {
    println!("extent: {:?}", snapshot.extent);
    for actor in &snapshot.actors {
        let state = if actor.visible { "visible" } else { "hidden" };
        println!("actor {:<10} x={:<7} {state}", actor.name, actor.x);
    }
    for item in &snapshot.items {
        let indent = "  ".repeat(item.depth);
        let marker = if item.valid { ' ' } else { '!' };
        println!(
            "{marker}{indent}{:<8} {:<14} {:<28} @({}, {}) {}x{}",
            item.index,
            format!("{:?}", item.kind),
            item.text,
            item.rect.x,
            item.rect.y,
            item.rect.width,
            item.rect.height,
        );
    }
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "simscene".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config = match options.config.as_deref() {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        let mut editor = Editor::with_config(demo_tree(), config)?;

        if let Some(payload) = options.drop.as_deref() {
            let protocols = demo_protocols(None);
            let last = editor.scene().top_level().last().copied();
            let added = editor.add_protocols_from_payload(last, DropPosition::Below, payload, &protocols)?;
            log::info!("dropped {} message(s)", added.len());
        }

        let snapshot = editor.scene().snapshot();
        if options.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            print_outline(&snapshot);
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
