use clap::Parser;
use colored::Colorize;
use eyre::{Result, eyre};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tasklist::{Filter, SqlitePrefs, TaskListStore};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Interactive to-do list with a persisted dark-mode preference")]
#[command(version)]
struct Cli {
    /// Path to the preferences database (default: under the user data directory)
    #[arg(short, long)]
    prefs_path: Option<PathBuf>,
}

fn default_prefs_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
        .join("prefs.db")
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let prefs_path = cli.prefs_path.unwrap_or_else(default_prefs_path);

    let prefs = SqlitePrefs::open(&prefs_path)?;
    let mut store = TaskListStore::new(prefs);

    println!("{}", "To-Do List".bold());
    println!("Type 'help' for commands.\n");
    render(&store);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        match dispatch(&mut store, line) {
            Ok(()) => render(&store),
            Err(e) => println!("{} {}", "error:".red().bold(), e),
        }
    }

    Ok(())
}

/// Route one input line to a store operation
fn dispatch(store: &mut TaskListStore<SqlitePrefs>, line: &str) -> Result<()> {
    let (command, rest) = match line.trim_start().split_once(char::is_whitespace) {
        Some((c, r)) => (c, r),
        None => (line.trim(), ""),
    };

    match command {
        "add" => {
            // Blank text is silently ignored, like the empty input box
            store.add_task(rest);
            Ok(())
        }
        "edit" => store.start_edit(parse_id(rest)?),
        "draft" => store.update_draft(rest),
        "save" => store.save_edit(),
        "toggle" => store.toggle_complete(parse_id(rest)?),
        "filter" => {
            let filter: Filter = rest.trim().parse().map_err(|e: String| eyre!(e))?;
            store.set_filter(filter);
            Ok(())
        }
        "theme" => {
            let dark = match rest.trim() {
                "on" | "dark" => true,
                "off" | "light" => false,
                other => return Err(eyre!("expected 'on' or 'off', got '{other}'")),
            };
            store.set_theme(dark);
            Ok(())
        }
        "list" => Ok(()),
        "help" => {
            print_help();
            Ok(())
        }
        other => Err(eyre!("unknown command: {other} (try 'help')")),
    }
}

fn parse_id(arg: &str) -> Result<u64> {
    arg.trim()
        .parse()
        .map_err(|_| eyre!("expected a task id, got '{}'", arg.trim()))
}

fn render(store: &TaskListStore<SqlitePrefs>) {
    let theme = if store.theme() { "dark" } else { "light" };
    println!("[{} | {} theme]", store.filter(), theme);

    let visible = store.visible_tasks();
    if visible.is_empty() {
        println!("  (no tasks)");
    }
    for task in visible {
        let text = match store.edit_session() {
            Some(edit) if edit.task_id == task.id => {
                format!("{} {}", edit.draft, "(editing)".italic())
            }
            _ if task.completed => task.text.magenta().strikethrough().to_string(),
            _ => task.text.red().bold().to_string(),
        };
        let mark = if task.completed { "x" } else { " " };
        println!("  {:>3} [{}] {}", task.id, mark, text);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add <text>                      add a task");
    println!("  edit <id>                       start editing a task");
    println!("  draft <text>                    replace the draft text");
    println!("  save                            save the draft into the task");
    println!("  toggle <id>                     flip a task's completion");
    println!("  filter <all|completed|pending>  change the view");
    println!("  theme <on|off>                  toggle dark mode (persisted)");
    println!("  list                            redraw the list");
    println!("  quit                            exit");
}
