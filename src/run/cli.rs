use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::bootstrap::{bootstrap, BootOutcome};
use crate::chart::monthly_bars;
use crate::forms::{self, AuthFailure, LoginDraft};
use crate::ledger::Ledger;
use crate::session::AppContext;
use crate::ui::commands::default_export_path;
use crate::ui::util::format_amount;

const NOT_SIGNED_IN: &str = "Not signed in. Run `expensetui login <email>` first.";

pub(crate) fn as_cli(args: &[String], ctx: &mut AppContext) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&args[1..], ctx, &mut stdin.lock(), &mut stdout.lock())
}

/// Dispatch one command. `args` excludes the program name.
pub(crate) fn run(
    args: &[String],
    ctx: &mut AppContext,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(out)?;
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "login" => cli_login(rest, ctx, input, out),
        "logout" => cli_logout(ctx, out),
        "whoami" => cli_whoami(ctx, out),
        "categories" | "c" => cli_categories(ctx, out),
        "summary" | "s" => cli_summary(ctx, out),
        "export" => cli_export(rest, ctx, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "expensetui {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "ExpenseTUI - terminal client for the expense tracker API")?;
    writeln!(out)?;
    writeln!(out, "Usage: expensetui [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                        Launch interactive TUI")?;
    writeln!(out, "  login <email>                 Sign in (password read from stdin)")?;
    writeln!(out, "  logout                        Forget the saved session")?;
    writeln!(out, "  whoami                        Show the signed-in user")?;
    writeln!(out, "  categories                    List your categories")?;
    writeln!(out, "  summary                       Print monthly expense totals")?;
    writeln!(out, "  export [path]                 Export transactions to CSV")?;
    writeln!(out, "  --help, -h                    Show this help")?;
    writeln!(out, "  --version, -V                 Show version")?;
    Ok(())
}

/// Validate the saved token; every command below needs a live session.
fn require_session(ctx: &mut AppContext) -> Result<()> {
    match bootstrap(ctx) {
        BootOutcome::SignedIn => Ok(()),
        BootOutcome::Anonymous | BootOutcome::Expired => bail!(NOT_SIGNED_IN),
        BootOutcome::Unreachable => {
            bail!("Could not reach the server; the saved session was cleared. {NOT_SIGNED_IN}")
        }
    }
}

fn cli_login(
    args: &[String],
    ctx: &mut AppContext,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(email) = args.first() else {
        bail!("Usage: expensetui login <email>");
    };

    eprint!("Password: ");
    let mut password = String::new();
    input
        .read_line(&mut password)
        .context("Failed to read password")?;

    let draft = LoginDraft {
        email: email.clone(),
        password: password.trim_end_matches(['\r', '\n']).to_string(),
    };
    match forms::login(ctx, &draft) {
        Ok(()) => {
            let name = ctx.session().user().map(|u| u.full_name()).unwrap_or_default();
            writeln!(out, "Signed in as {name}")?;
            Ok(())
        }
        Err(e @ (AuthFailure::Invalid(_) | AuthFailure::WrongCredentials)) => bail!("{e}"),
        Err(e) => Err(e).context("Login failed"),
    }
}

fn cli_logout(ctx: &mut AppContext, out: &mut impl Write) -> Result<()> {
    forms::log_out(ctx);
    writeln!(out, "Signed out")?;
    Ok(())
}

fn cli_whoami(ctx: &mut AppContext, out: &mut impl Write) -> Result<()> {
    require_session(ctx)?;
    let Some(user) = ctx.session().user() else {
        bail!(NOT_SIGNED_IN);
    };
    writeln!(out, "{} <{}>", user.full_name(), user.email)?;
    writeln!(out, "{} categories", user.categories.len())?;
    Ok(())
}

fn cli_categories(ctx: &mut AppContext, out: &mut impl Write) -> Result<()> {
    require_session(ctx)?;
    let categories = ctx.categories();
    if categories.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }

    writeln!(out, "{:<26} {:<10} Icon", "ID", "Label")?;
    writeln!(out, "{}", "─".repeat(48))?;
    for cat in categories {
        writeln!(
            out,
            "{:<26} {:<10} {} {}",
            cat.id.as_deref().unwrap_or("-"),
            cat.label,
            cat.display_icon(),
            cat.icon,
        )?;
    }
    Ok(())
}

fn cli_summary(ctx: &mut AppContext, out: &mut impl Write) -> Result<()> {
    require_session(ctx)?;
    let mut ledger = Ledger::new();
    ledger.refresh(ctx).context("Failed to load transactions")?;

    writeln!(out, "Monthly Expense Overview")?;
    writeln!(out, "{}", "─".repeat(40))?;
    let bars = monthly_bars(ledger.months());
    if bars.is_empty() {
        writeln!(out, "  No expenses recorded")?;
    }
    for bar in &bars {
        writeln!(out, "  {:<12} {:>16}", bar.label, format_amount(bar.total))?;
    }
    writeln!(out, "  Total Txns: {}", ledger.len())?;
    Ok(())
}

fn cli_export(args: &[String], ctx: &mut AppContext, out: &mut impl Write) -> Result<()> {
    require_session(ctx)?;
    let mut ledger = Ledger::new();
    ledger.refresh(ctx).context("Failed to load transactions")?;

    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(default_export_path);

    let count = ledger.export_csv(&path, ctx.categories())?;
    if count == 0 {
        writeln!(out, "No transactions to export")?;
    } else {
        writeln!(out, "Exported {count} transactions to {}", path.display())?;
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
