use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, InputMode};
use crate::guard::Route;
use crate::session::AppContext;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut AppContext) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("home", "Go to Home (chart and transactions)", cmd_home, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("login", "Go to Login", cmd_login, r);
    register_command!("register", "Go to Register", cmd_register, r);
    register_command!("back", "Go back to the previous screen", cmd_back, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("refresh", "Re-fetch data for this screen", cmd_refresh, r);
    register_command!("new", "Start a new entry in this screen's form", cmd_new, r);
    register_command!("cancel", "Cancel the edit in progress", cmd_cancel, r);
    register_command!("logout", "Sign out", cmd_logout, r);
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    ctx: &mut AppContext,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ctx)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ctx: &mut AppContext) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_home(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.navigate(ctx, Route::Home);
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.navigate(ctx, Route::Categories);
    Ok(())
}

fn cmd_login(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.navigate(ctx, Route::Login);
    Ok(())
}

fn cmd_register(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.navigate(ctx, Route::Register);
    Ok(())
}

fn cmd_back(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.back(ctx);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ctx: &mut AppContext) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    app.refresh(ctx);
    Ok(())
}

fn cmd_new(_args: &str, app: &mut App, _ctx: &mut AppContext) -> anyhow::Result<()> {
    if app.is_auth_screen() {
        return Ok(());
    }
    app.cancel_edit();
    app.input_mode = InputMode::Editing;
    Ok(())
}

fn cmd_cancel(_args: &str, app: &mut App, _ctx: &mut AppContext) -> anyhow::Result<()> {
    app.cancel_edit();
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    if !ctx.has_credentials() {
        app.set_status("Not signed in");
        return Ok(());
    }
    app.log_out(ctx);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, ctx: &mut AppContext) -> anyhow::Result<()> {
    if !ctx.session().is_authenticated() {
        app.set_status("Sign in to export transactions");
        return Ok(());
    }
    let path = if args.is_empty() {
        default_export_path()
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };

    let count = app.ledger.export_csv(&path, ctx.categories())?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {}", path.display()));
    }
    Ok(())
}

pub(crate) fn default_export_path() -> PathBuf {
    let home = directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let today = chrono::Local::now().format("%Y-%m-%d");
    home.join(format!("expensetui-export-{today}.csv"))
}
