//! Code-emitter pipeline
//!
//! Sequences "compute import alias" -> "build render context" -> "render
//! template" -> "format output" as a chain of `and_async` steps. Each step is
//! an ordinary fallible function lifted into an `Outcome`. Two independent
//! lookups are fanned in with `and2_async` before rendering starts.
//!
//! Run with `NEBULA_OUTCOME_LOG=debug cargo run --example pipeline` to watch
//! the deferred tasks being scheduled and resolved.

use std::fmt::Write as _;

use nebula_outcome::prelude::*;
use nebula_outcome::{LogConfig, Probe, init_logging};

#[derive(Debug, Clone)]
struct RenderContext {
    package: String,
    alias: String,
    fields: Vec<String>,
}

fn import_alias(path: &str) -> Result<String, std::io::Error> {
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('-', "_"))
        .ok_or_else(|| std::io::Error::other(format!("no package segment in `{path}`")))
}

fn field_names(schema: &str) -> Result<Vec<String>, String> {
    let fields: Vec<String> = schema
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        return Err(format!("schema `{schema}` declares no fields"));
    }
    Ok(fields)
}

fn render(ctx: &RenderContext) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "use {}::{};", ctx.package, ctx.alias)?;
    writeln!(out)?;
    writeln!(out, "pub struct Generated {{")?;
    for field in &ctx.fields {
        writeln!(out, "    pub {field}: {}::Value,", ctx.alias)?;
    }
    writeln!(out, "}}")?;
    Ok(out)
}

fn format_output(source: String) -> Outcome<String> {
    // collapse blank runs the way a formatter would
    let mut formatted = String::with_capacity(source.len());
    let mut blank = false;
    for line in source.lines() {
        if line.trim().is_empty() {
            if blank {
                continue;
            }
            blank = true;
        } else {
            blank = false;
        }
        formatted.push_str(line.trim_end());
        formatted.push('\n');
    }
    Ok(formatted)
}

fn emit(package: &'static str, schema: &'static str) -> Deferred<String> {
    let alias = defer(move || lift(import_alias(package)));
    let fields = defer(move || lift(field_names(schema)));

    let context = and2_async(alias, fields, move |alias, fields| {
        Outcome::Ok(RenderContext {
            package: package.to_string(),
            alias,
            fields,
        })
    });
    let rendered = and_async(context, |ctx: RenderContext| lift(render(&ctx)));
    and_async(rendered, format_output)
}

#[tokio::main]
async fn main() {
    if let Err(error) = init_logging(&LogConfig::from_env()) {
        eprintln!("logging disabled: {error}");
    }

    let good = emit("nebula/value-types", "id, name, created_at");
    let bad = emit("nebula/empty", " , ");

    let outputs = vec![good.clone(), bad.clone()];
    for (index, output) in outputs.into_iter().enumerate() {
        let output = output
            .if_ok(|source| println!("== output #{index} ==\n{source}"))
            .await
            .if_error(|error| println!("== output #{index} failed: {error}"))
            .await;
        assert!(output.is_resolved());
    }

    // every step must succeed for the batch to be written
    let batch: Vec<Box<dyn Probe>> = vec![Box::new(good), Box::new(bad)];
    match proof_async(batch).await {
        Ok(()) => println!("all outputs rendered"),
        Err(error) => println!("batch rejected: {error}"),
    }
}
