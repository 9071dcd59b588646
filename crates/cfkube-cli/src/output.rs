use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use cfkube_core::StoreEvent;
use colored::Colorize;
use serde::Serialize;

pub fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = render(value, format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("Failed to render JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML"),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_event(event: &StoreEvent) {
    let guid = if event.resource_guid.is_empty() {
        "-"
    } else {
        event.resource_guid.as_str()
    };
    println!("  {} {}", event.operation.as_str().cyan(), guid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_formats() {
        let value: BTreeMap<&str, i32> = [("instances", 2)].into();
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "{\n  \"instances\": 2\n}"
        );
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "instances: 2\n");
    }
}
