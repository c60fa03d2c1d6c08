use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use codev_core::{NodeKind, TreeNode};
use codev_project::{ActiveView, EditorSession, NewFilePolicy, ProjectSeed};
use codev_settings::{Preferences, PreferencesStore};
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "codev-cli",
    about = "Utility commands for CoDev editor sessions",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 顯示除錯紀錄。 / Enable debug logging.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 對編輯工作階段執行指令稿。 / Run an editing script against a session.
    Run(RunArgs),
    /// 顯示專案檔案樹。 / Print the project tree.
    Tree(TreeArgs),
    /// 匯入/匯出偏好設定。 / Import or export preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Args)]
struct RunArgs {
    /// 指令稿檔案，每行一個指令。 / Script file with one command per line.
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// 從空白專案開始。 / Start from an empty project.
    #[arg(long, conflicts_with = "seed")]
    empty: bool,

    /// 以 JSON 專案描述作為起點。 / Start from a JSON project seed.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// 以 JSON 輸出最終狀態。 / Print the final state as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TreeArgs {
    /// 以 JSON 專案描述取代範例專案。 / Project seed to print instead of the sample project.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 匯出目前偏好設定。 / Export current preferences.
    Export(PreferencesExportArgs),
    /// 匯入偏好設定 JSON。 / Import preferences from JSON.
    Import(PreferencesImportArgs),
}

#[derive(Args)]
struct PreferencesExportArgs {
    /// 輸出檔案路徑。 / Destination file path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PreferencesImportArgs {
    /// 輸入檔案路徑。 / Source preferences JSON.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);

    let workspace_root = resolve_workspace(workspace)?;
    match command {
        Commands::Run(args) => execute_run(args, &workspace_root),
        Commands::Tree(args) => execute_tree(args),
        Commands::Preferences(subcommand) => {
            execute_preferences_command(subcommand, &workspace_root)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn execute_run(args: RunArgs, workspace_root: &Path) -> Result<()> {
    let preferences = load_preferences(workspace_root)?;
    let seed = if args.empty {
        ProjectSeed::empty()
    } else if let Some(path) = &args.seed {
        load_seed(path)?
    } else if preferences.explorer.seed_sample_project {
        ProjectSeed::sample()
    } else {
        ProjectSeed::empty()
    };
    let policy = match preferences.explorer.default_file_suffix.as_deref() {
        Some(suffix) => NewFilePolicy::with_suffix(suffix),
        None => NewFilePolicy::disabled(),
    };
    let mut session = EditorSession::from_seed(&seed, policy).context("failed to seed project")?;

    let script_path = resolve_input_path(&args.script)?;
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = ScriptCommand::parse(line)
            .with_context(|| format!("{}:{}", script_path.display(), index + 1))?;
        command.apply(&mut session);
    }
    session
        .verify()
        .context("session state became inconsistent")?;

    if args.json {
        let report = json!({
            "tree": session.snapshot(),
            "tabs": session.tab_strip(),
            "active": session.active_view(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_session(&session);
    }
    Ok(())
}

/// 指令稿中的單一指令。 / One line of an editing script.
#[derive(Debug, PartialEq, Eq)]
enum ScriptCommand {
    AddFile(String),
    AddFolder(String),
    Delete(String),
    Select(String),
    Switch(String),
    Close(String),
    Toggle(String),
    Edit(String),
}

impl ScriptCommand {
    fn parse(line: &str) -> Result<Self> {
        let (verb, argument) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let argument = argument.to_string();
        let command = match verb {
            "add-file" => ScriptCommand::AddFile(argument),
            "add-folder" => ScriptCommand::AddFolder(argument),
            "delete" => ScriptCommand::Delete(argument),
            "select" => ScriptCommand::Select(argument),
            "switch" => ScriptCommand::Switch(argument),
            "close" => ScriptCommand::Close(argument),
            "toggle" => ScriptCommand::Toggle(argument),
            "edit" => ScriptCommand::Edit(unescape(&argument)),
            other => bail!("unknown command '{other}'"),
        };
        Ok(command)
    }

    fn apply(self, session: &mut EditorSession) {
        match self {
            ScriptCommand::AddFile(name) => {
                session.explorer().add_file(&name);
            }
            ScriptCommand::AddFolder(name) => {
                session.explorer().add_folder(&name);
            }
            ScriptCommand::Delete(path) => {
                let kind = session.tree().find(&path).map(|node| node.kind());
                match kind {
                    Some(kind) => {
                        session.explorer().delete_item(&path, kind);
                    }
                    None => log::warn!("delete ignored: '{path}' does not exist"),
                }
            }
            ScriptCommand::Select(path) => {
                session.explorer().select_file(&path);
            }
            ScriptCommand::Switch(path) => {
                session.workspace().switch(&path);
            }
            ScriptCommand::Close(path) => session.workspace().close(&path),
            ScriptCommand::Toggle(path) => {
                session.explorer().toggle_folder(&path);
            }
            ScriptCommand::Edit(text) => {
                session.workspace().apply_edit(text);
            }
        }
    }
}

fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}

fn print_session(session: &EditorSession) {
    println!("Explorer:");
    for row in session.tree().visible_rows() {
        let indent = "  ".repeat(row.depth + 1);
        match row.is_open {
            Some(true) => println!("{indent}v {}/", row.name),
            Some(false) => println!("{indent}> {}/", row.name),
            None => println!("{indent}{}", row.name),
        }
    }

    let tabs = session.tab_strip();
    if tabs.is_empty() {
        println!("Tabs: (none)");
    } else {
        let titles: Vec<String> = tabs
            .iter()
            .map(|tab| {
                if tab.is_selected {
                    format!("[{}]", tab.path)
                } else {
                    tab.path.clone()
                }
            })
            .collect();
        println!("Tabs: {}", titles.join(" "));
    }

    match session.active_view() {
        ActiveView::Welcome => println!("Active: welcome"),
        ActiveView::Document {
            path,
            language,
            content,
        } => {
            println!("Active: {path} ({language})");
            for line in content.lines() {
                println!("  | {line}");
            }
        }
    }
}

fn execute_tree(args: TreeArgs) -> Result<()> {
    let seed = match &args.seed {
        Some(path) => load_seed(path)?,
        None => ProjectSeed::sample(),
    };
    let session = EditorSession::from_seed(&seed, NewFilePolicy::default())
        .context("failed to seed project")?;
    print_nodes(&session.snapshot(), 0);
    println!(
        "{} files, {} folders",
        session.tree().file_paths().len(),
        session.tree().len() - session.tree().file_paths().len()
    );
    Ok(())
}

fn print_nodes(nodes: &[TreeNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match (node.kind, &node.children) {
            (NodeKind::Folder, Some(children)) => {
                println!("{indent}{}/", node.name);
                print_nodes(children, depth + 1);
            }
            _ => println!("{indent}{}", node.name),
        }
    }
}

fn load_seed(path: &Path) -> Result<ProjectSeed> {
    let path = resolve_input_path(path)?;
    if !path.exists() {
        bail!("seed file '{}' does not exist", path.display());
    }
    ProjectSeed::load(&path).with_context(|| format!("failed to load seed {}", path.display()))
}

fn load_preferences(workspace_root: &Path) -> Result<Preferences> {
    let prefs_path = preferences_path(workspace_root);
    let store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    Ok(store.preferences().clone())
}

fn execute_preferences_command(command: PreferencesCommand, workspace_root: &Path) -> Result<()> {
    match command {
        PreferencesCommand::Export(args) => export_preferences(args, workspace_root),
        PreferencesCommand::Import(args) => import_preferences(args, workspace_root),
    }
}

fn export_preferences(args: PreferencesExportArgs, workspace_root: &Path) -> Result<()> {
    let prefs_path = preferences_path(workspace_root);
    let store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    let output = resolve_input_path(&args.output)?;
    store
        .export_to(&output)
        .with_context(|| format!("failed to export preferences to {}", output.display()))?;
    println!("Exported preferences to {}", output.display());
    Ok(())
}

fn import_preferences(args: PreferencesImportArgs, workspace_root: &Path) -> Result<()> {
    let prefs_path = preferences_path(workspace_root);
    let mut store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    let input = resolve_input_path(&args.input)?;
    if !input.exists() {
        bail!("preferences file '{}' does not exist", input.display());
    }
    store
        .import_from(&input)
        .with_context(|| format!("failed to import preferences from {}", input.display()))?;
    println!("Imported preferences from {}", input.display());
    Ok(())
}

fn preferences_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".codev").join("preferences.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
