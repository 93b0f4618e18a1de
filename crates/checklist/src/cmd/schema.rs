use anyhow::Result;
use checklist_spec::{SelectionEntry, Template};
use clap::{Args, ValueEnum};
use schemars::schema_for;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchemaKind {
    #[default]
    Template,
    Selection,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Which document to describe
    #[arg(long, value_enum, default_value_t = SchemaKind::Template)]
    pub kind: SchemaKind,
}

pub fn run(args: &SchemaArgs) -> Result<()> {
    println!("{}", render(args.kind)?);
    Ok(())
}

pub fn render(kind: SchemaKind) -> Result<String> {
    let schema = match kind {
        SchemaKind::Template => schema_for!(Template),
        SchemaKind::Selection => schema_for!(Vec<SelectionEntry>),
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}
