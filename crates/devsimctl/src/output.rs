use clap::ValueEnum;
use color_eyre::owo_colors::OwoColorize;
use camino::Utf8Path;
use comfy_table::{Cell, Color, Table};
use devsim_runner::RunSummary;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    Json,
    #[default]
    PlainText,
}

#[derive(Debug, Default)]
pub struct Output {
    format: Format,
}

pub trait Report {
    fn report(&self);
}

impl Output {
    pub const fn new(output_type: Format) -> Self {
        Self {
            format: output_type,
        }
    }

    pub fn write<T: Serialize + Report>(&self, value: &T) {
        match self.format {
            Format::Json => match serde_json::to_string(&value) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("Failed to serialize to JSON: {err}"),
            },
            Format::PlainText => value.report(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InfoLine<'a>(pub &'a str);

impl Report for InfoLine<'_> {
    fn report(&self) {
        println!("{} {}", "[INFO]".green(), self.0);
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WarnLine<'a>(pub &'a str);

impl Report for WarnLine<'_> {
    fn report(&self) {
        println!("{} {}", "[WARN]".yellow(), self.0);
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct RunReport<'a>(pub &'a RunSummary);

impl Report for RunReport<'_> {
    fn report(&self) {
        let summary = self.0;

        let mut table = Table::new();
        let _ = table.set_header(vec![
            Cell::new("Run").fg(Color::Blue),
            Cell::new("").fg(Color::Blue),
        ]);

        if let Some(model) = &summary.model {
            let _ = table.add_row(vec!["Model".to_owned(), model.name.clone()]);
            let _ = table.add_row(vec!["Ids".to_owned(), model.capabilities_list()]);
        }

        if let Some(origin) = &summary.origin {
            let _ = table.add_row(vec!["Origin".to_owned(), origin.to_string()]);
        }

        if let Some(state) = summary.state {
            let _ = table.add_row(vec!["State".to_owned(), state.to_string()]);
        }

        let _ = table.add_row(vec!["Steps".to_owned(), summary.steps.to_string()]);
        let _ = table.add_row(vec![
            "Current time".to_owned(),
            summary.current_time.to_string(),
        ]);
        let _ = table.add_row(vec![
            "Time max".to_owned(),
            summary
                .time_max
                .map_or_else(|| "unset".to_owned(), |max| max.to_string()),
        ]);

        println!("{table}");
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct ModelList<'a>(pub &'a [String]);

impl Report for ModelList<'_> {
    fn report(&self) {
        if self.0.is_empty() {
            println!("No models available");
            return;
        }

        let mut table = Table::new();
        let _ = table.set_header(vec![
            Cell::new("#").fg(Color::Blue),
            Cell::new("Model").fg(Color::Blue),
        ]);

        for (idx, name) in self.0.iter().enumerate() {
            let _ = table.add_row(vec![(idx + 1).to_string(), name.clone()]);
        }

        println!("{table}");
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterTemplate<'a> {
    pub model: &'a str,
    pub path: &'a Utf8Path,
    pub parameters: &'a Value,
}

impl Report for ParameterTemplate<'_> {
    fn report(&self) {
        let mut table = Table::new();
        let _ = table.set_header(vec![
            Cell::new("Parameter").fg(Color::Blue),
            Cell::new("Default").fg(Color::Blue),
        ]);

        if let Some(entries) = self.parameters.as_object() {
            for (key, value) in entries {
                let _ = table.add_row(vec![key.clone(), value.to_string()]);
            }
        }

        println!("{table}");
        println!(
            "{} Wrote parameters of {} to {}",
            "[INFO]".green(),
            self.model,
            self.path
        );
    }
}
