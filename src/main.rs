mod ai;
mod config;
mod llm;
mod logging;
mod model;
mod store;

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use uuid::Uuid;

use crate::ai::{SuggestionService, TaskParser};
use crate::config::AppConfig;
use crate::llm::CompletionClient;
use crate::logging::init_logging;
use crate::model::{TaskGroup, TodoTask, completion_rate};
use crate::store::{InterestStore, TaskStore};

// Interest records are keyed by user id; the CLI has exactly one user.
const LOCAL_USER: &str = "local";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "flowtask",
    version,
    about = "Task manager with natural-language task creation (CLI)"
)]
pub struct Cli {
    /// OpenAI-compatible API base URL
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Model name
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// API key (set via env OPENAI_API_KEY recommended)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory for task and interest data (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn print_help() {
    println!(
        "/help  Show help\n/new <text>  Create a task from natural language (AI)\n/add <group> <project> <description>  Create a task manually\n/list [group]  Show tasks, optionally for one group\n/done <id>  Mark a task completed\n/start <id>  Mark a task in progress\n/reset <id>  Mark a task back to to-do\n/toggle <id>  Toggle completion\n/progress <id> <pct>  Set task progress\n/delete <id>  Delete a task\n/stats  Show task statistics\n/interests [a, b, ...]  Show or replace your interests\n/suggest  Suggest tasks from your interests (AI)\n/quit  Quit"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let cfg = AppConfig::from_cli(cli)?;
    info!(base_url=%cfg.base_url, model=%cfg.model, data_dir=%cfg.data_dir.display(), "app config");

    run_cli_loop(cfg).await
}

async fn run_cli_loop(cfg: AppConfig) -> Result<()> {
    println!("flowtask (CLI) - type /help for commands");
    let stdin = io::stdin();
    let reader = BufReader::new(stdin).lines();

    let tasks = TaskStore::new(cfg.data_dir.join("tasks"))?;
    let interests = InterestStore::new(&cfg.data_dir)?;

    let client = match cfg.api_key.clone() {
        Some(key) => Some(
            CompletionClient::new(cfg.base_url.clone(), key)?.with_llm_config(&cfg.llm),
        ),
        None => None,
    };
    let parser = client
        .clone()
        .map(|c| TaskParser::new(c, cfg.model.clone()));
    let suggester = client.map(|c| SuggestionService::new(c, cfg.model.clone()));

    for line in reader {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            "/help" => {
                print_help();
                continue;
            }
            "/quit" | "/exit" => break,
            "/list" => {
                match tasks.list() {
                    Ok(all) => print_tasks(&all),
                    Err(e) => eprintln!("list error: {e}"),
                }
                continue;
            }
            "/stats" => {
                match tasks.list() {
                    Ok(all) => print_stats(&all),
                    Err(e) => eprintln!("stats error: {e}"),
                }
                continue;
            }
            "/suggest" => {
                let Some(ref suggester) = suggester else {
                    eprintln!("OPENAI_API_KEY not set; cannot call the AI.");
                    continue;
                };
                let saved = match interests.get(LOCAL_USER) {
                    Ok(v) => v,
                    Err(e) => {
                        eprintln!("interests error: {e}");
                        continue;
                    }
                };
                if saved.is_empty() {
                    eprintln!("No interests saved; set some with /interests first.");
                    continue;
                }
                match suggester.generate(&saved).await {
                    Ok(suggestions) => {
                        for s in suggestions {
                            println!("[{}] {} - {}", s.category, s.title, s.description);
                        }
                    }
                    Err(e) => eprintln!("AI error: {e}"),
                }
                continue;
            }
            "/interests" => {
                match interests.get(LOCAL_USER) {
                    Ok(v) if v.is_empty() => println!("No interests saved."),
                    Ok(v) => println!("Interests: {}", v.join(", ")),
                    Err(e) => eprintln!("interests error: {e}"),
                }
                continue;
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("/new ") {
            let Some(ref parser) = parser else {
                eprintln!("OPENAI_API_KEY not set; cannot call the AI.");
                continue;
            };
            match parser.parse_task(rest, Utc::now()).await {
                Ok(draft) => {
                    let task = TodoTask::from_draft(draft);
                    match tasks.save(&task) {
                        Ok(()) => println!(
                            "Created {} [{}] {} ({} - {})",
                            task.id,
                            task.group,
                            task.project_name,
                            task.start_date.format("%Y-%m-%d %H:%M"),
                            task.end_date.format("%Y-%m-%d %H:%M"),
                        ),
                        Err(e) => eprintln!("save error: {e}"),
                    }
                }
                Err(e) => eprintln!("AI error: {e}"),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/add ") {
            let mut parts = rest.splitn(3, ' ');
            let (group, project, description) = match (parts.next(), parts.next(), parts.next()) {
                (Some(g), Some(p), Some(d)) => (g, p, d),
                _ => {
                    eprintln!("usage: /add <group> <project> <description>");
                    continue;
                }
            };
            if project.trim().is_empty() {
                eprintln!("Project name is required");
                continue;
            }
            let now = Utc::now();
            let task = TodoTask::new(
                TaskGroup::normalize(group, TaskGroup::Work),
                project,
                description,
                now,
                now + chrono::Duration::hours(2),
            );
            match tasks.save(&task) {
                Ok(()) => println!("Created {}", task.id),
                Err(e) => eprintln!("save error: {e}"),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/list ") {
            let group = TaskGroup::normalize(rest, TaskGroup::Work);
            match tasks.query(|t| t.group == group) {
                Ok(filtered) => print_tasks(&filtered),
                Err(e) => eprintln!("list error: {e}"),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/done ") {
            with_task(&tasks, rest.trim(), |task| task.mark_completed());
            continue;
        }
        if let Some(rest) = line.strip_prefix("/start ") {
            with_task(&tasks, rest.trim(), |task| task.mark_in_progress());
            continue;
        }
        if let Some(rest) = line.strip_prefix("/reset ") {
            with_task(&tasks, rest.trim(), |task| task.mark_todo());
            continue;
        }
        if let Some(rest) = line.strip_prefix("/toggle ") {
            with_task(&tasks, rest.trim(), |task| task.toggle_completion());
            continue;
        }
        if let Some(rest) = line.strip_prefix("/progress ") {
            let mut parts = rest.split_whitespace();
            let (id, pct) = match (parts.next(), parts.next().and_then(|s| s.parse::<f64>().ok()))
            {
                (Some(id), Some(pct)) => (id, pct),
                _ => {
                    eprintln!("usage: /progress <id> <pct>");
                    continue;
                }
            };
            with_task(&tasks, id, |task| task.update_progress(pct));
            continue;
        }
        if let Some(rest) = line.strip_prefix("/delete ") {
            match Uuid::parse_str(rest.trim()) {
                Ok(id) => match tasks.delete(id) {
                    Ok(()) => println!("Deleted {id}"),
                    Err(e) => eprintln!("delete error: {e}"),
                },
                Err(_) => eprintln!("invalid task id: {rest}"),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/interests ") {
            let list: Vec<String> = rest
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if list.is_empty() {
                eprintln!("usage: /interests <a, b, c>");
                continue;
            }
            match interests.save(LOCAL_USER, list) {
                Ok(()) => println!("Interests saved."),
                Err(e) => eprintln!("interests error: {e}"),
            }
            continue;
        }

        println!("Unknown command: {line} (try /help)");
    }

    Ok(())
}

fn with_task(tasks: &TaskStore, id: &str, f: impl FnOnce(&mut TodoTask)) {
    let id = match Uuid::parse_str(id) {
        Ok(id) => id,
        Err(_) => {
            eprintln!("invalid task id: {id}");
            return;
        }
    };
    match tasks.load(id) {
        Ok(mut task) => {
            f(&mut task);
            match tasks.save(&task) {
                Ok(()) => println!("Updated {id}"),
                Err(e) => eprintln!("save error: {e}"),
            }
        }
        Err(e) => eprintln!("load error: {e}"),
    }
}

fn print_tasks(all: &[TodoTask]) {
    if all.is_empty() {
        println!("No tasks.");
        return;
    }
    let now = Utc::now();
    for t in all {
        let marker = if t.completed {
            "x"
        } else if t.is_overdue(now) {
            "!"
        } else {
            " "
        };
        println!(
            "[{marker}] {} [{}] {}: {} ({} - {}, {:.0}%)",
            t.id,
            t.group,
            t.project_name,
            t.description,
            t.start_date.format("%Y-%m-%d %H:%M"),
            t.end_date.format("%Y-%m-%d %H:%M"),
            t.progress_percentage(now),
        );
    }
}

fn print_stats(all: &[TodoTask]) {
    let now = Utc::now();
    let completed = all.iter().filter(|t| t.completed).count();
    let in_progress = all.iter().filter(|t| t.is_in_progress()).count();
    let overdue = all.iter().filter(|t| t.is_overdue(now)).count();
    println!(
        "{} tasks: {completed} completed, {in_progress} in progress, {overdue} overdue ({:.0}% done)",
        all.len(),
        completion_rate(all),
    );
}
