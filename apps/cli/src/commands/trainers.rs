//! `trainers` command: list built-in trainers.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use trainbox_job::{trainer_by_id, DEFAULT_TRAINER, TRAINER_IDS};

pub fn execute(json_output: bool) -> Result<()> {
    let trainers: Vec<_> = TRAINER_IDS
        .iter()
        .filter_map(|id| trainer_by_id(id))
        .map(|t| (t.id(), t.artifact_kind().extension()))
        .collect();

    if json_output {
        let out: Vec<_> = trainers
            .iter()
            .map(|(id, ext)| json!({ "id": id, "artifact": ext, "default": *id == DEFAULT_TRAINER }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Trainers".bold().cyan());
    for (id, ext) in trainers {
        let marker = if id == DEFAULT_TRAINER { " (default)".dimmed().to_string() } else { String::new() };
        println!("  {:<12} model.{}{}", id, ext, marker);
    }
    Ok(())
}
