use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;

use ifc_scheduler::config::ProductivityTable;
use ifc_scheduler::export::{export_completion, export_report, export_schedule};
use ifc_scheduler::inputs::{read_actuals, read_price_list, read_task_table};
use ifc_scheduler::parser::import_ifc_file;
use ifc_scheduler::pipeline::{
    assign_tasks, build_cost_items, link_costs, sequence_and_estimate, update_actuals,
};
use ifc_scheduler::store::{load_project, save_project};

#[derive(Parser, Debug)]
#[command(name = "ifc-scheduler")]
#[command(about = "IFC Scheduler - construction scheduling and costing from IFC models")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import structural elements from an IFC file into a new project document
    Import {
        /// Path to IFC file
        file: PathBuf,

        /// Output project document
        #[arg(short, long, value_name = "FILE", default_value = "project.json")]
        output: PathBuf,
    },
    /// Assign tasks to elements from a WBS task table
    AssignTasks {
        /// Project document
        project: PathBuf,

        /// Task table CSV (IfcEntity, Parent, Task Name columns)
        #[arg(long, value_name = "FILE")]
        tasks: PathBuf,

        /// Output project document (defaults to in-place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Work schedule name
        #[arg(long, default_value = "Construction Schedule")]
        schedule_name: String,
    },
    /// Build cost items by matching element cost codes against a price list
    BuildCosts {
        /// Project document
        project: PathBuf,

        /// Price list CSV
        #[arg(long, value_name = "FILE")]
        prices: PathBuf,

        /// Output project document (defaults to in-place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Cost schedule name
        #[arg(long, default_value = "Cost Estimation")]
        schedule_name: String,
    },
    /// Link cost items to the tasks their quantities fund
    LinkCosts {
        /// Project document
        project: PathBuf,

        /// Output project document (defaults to in-place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Sequence all tasks and estimate durations
    Sequence {
        /// Project document
        project: PathBuf,

        /// Output project document (defaults to in-place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the planned schedule CSV here
        #[arg(long, value_name = "FILE")]
        schedule: Option<PathBuf>,

        /// Productivity rates JSON (built-in defaults when omitted)
        #[arg(long, value_name = "FILE")]
        rates: Option<PathBuf>,

        /// Schedule start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, defaults to now)
        #[arg(long)]
        start: Option<String>,
    },
    /// Reconcile reported actual dates and compute completion
    UpdateActuals {
        /// Project document
        project: PathBuf,

        /// Actuals CSV exported from the field tracker
        #[arg(long, value_name = "FILE")]
        actuals: PathBuf,

        /// Output project document (defaults to in-place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the completion CSV here
        #[arg(long, value_name = "FILE")]
        completion: Option<PathBuf>,

        /// Reference date for in-progress tasks (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Export the task-by-task cost report
    ExportReport {
        /// Project document
        project: PathBuf,

        /// Output CSV path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|_| eyre!("invalid date: {value} (expected YYYY-MM-DD)"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    match args.command {
        Command::Import { file, output } => {
            let project = import_ifc_file(&file)?;
            println!(
                "Imported {} elements, {} storeys from {}",
                project.elements.len(),
                project.storeys.len(),
                file.display()
            );
            save_project(&project, &output)?;
            println!("Project document: {}", output.display());
        }
        Command::AssignTasks {
            project,
            tasks,
            output,
            schedule_name,
        } => {
            let mut document = load_project(&project)?;
            let rules = read_task_table(&tasks)?;
            let created = assign_tasks(&mut document, &rules, &schedule_name);
            save_project(&document, output.as_ref().unwrap_or(&project))?;
            println!("Created {created} tasks in schedule '{schedule_name}'");
        }
        Command::BuildCosts {
            project,
            prices,
            output,
            schedule_name,
        } => {
            let mut document = load_project(&project)?;
            let price_list = read_price_list(&prices)?;
            let created = build_cost_items(&mut document, &price_list, &schedule_name);
            save_project(&document, output.as_ref().unwrap_or(&project))?;
            println!("Created {created} cost items in schedule '{schedule_name}'");
        }
        Command::LinkCosts { project, output } => {
            let mut document = load_project(&project)?;
            let created = link_costs(&mut document);
            save_project(&document, output.as_ref().unwrap_or(&project))?;
            println!("Created {created} task-cost links");
        }
        Command::Sequence {
            project,
            output,
            schedule,
            rates,
            start,
        } => {
            let mut document = load_project(&project)?;
            let table = match rates {
                Some(path) => ProductivityTable::from_file(path)?,
                None => ProductivityTable::default(),
            };
            let start = match start {
                Some(value) => parse_datetime(&value)?,
                None => chrono::Local::now().naive_local(),
            };
            let rows = sequence_and_estimate(&mut document, &table, start);
            save_project(&document, output.as_ref().unwrap_or(&project))?;
            println!("Sequenced {} tasks", rows.len());
            if let Some(path) = schedule {
                export_schedule(&rows, &path)?;
                println!("Exported schedule: {}", path.display());
            }
        }
        Command::UpdateActuals {
            project,
            actuals,
            output,
            completion,
            now,
        } => {
            let mut document = load_project(&project)?;
            let rows = read_actuals(&actuals)?;
            let now = match now {
                Some(value) => parse_datetime(&value)?,
                None => chrono::Local::now().naive_local(),
            };
            let completions = update_actuals(&mut document, &rows, now);
            save_project(&document, output.as_ref().unwrap_or(&project))?;
            println!("Reconciled {} tasks", completions.len());
            if let Some(path) = completion {
                export_completion(&completions, &path)?;
                println!("Exported completion: {}", path.display());
            }
        }
        Command::ExportReport { project, output } => {
            let document = load_project(&project)?;
            export_report(&document, &output)?;
            println!("Exported cost report: {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn sequence_parses_without_a_start_date() {
        let args = Args::try_parse_from(["ifc-scheduler", "sequence", "project.json"]).unwrap();
        match args.command {
            Command::Sequence { start, .. } => assert_eq!(start, None),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn datetime_accepts_date_and_datetime_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-03-04").unwrap(), expected);
        assert_eq!(
            parse_datetime("2024-03-04T08:00:00").unwrap(),
            expected + chrono::Duration::hours(8)
        );
        assert!(parse_datetime("04/03/2024").is_err());
    }
}
