//! Connection diagnostics. Always exits 0 once the checks have run.

use std::fmt::Write as _;

use unisense_core::{DiagnosticReport, Diagnostics, Section};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, Palette};

const RULE: &str = "============================================================";

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let target = config::load(global)?.diagnostic_target()?;
    let report = Diagnostics::new(target)?.run().await;

    let palette = Palette::new(global.color);
    let out = output::render_report(global.output, &report, |r| {
        render_text(r, palette)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Text report ─────────────────────────────────────────────────────

fn header(out: &mut String, text: &str, palette: Palette) {
    let _ = writeln!(out, "\n{RULE}\n  {}\n{RULE}\n", palette.heading(text));
}

fn render_text(report: &DiagnosticReport, palette: Palette) -> String {
    let mut out = String::new();
    header(&mut out, "UniFi Authentication Diagnostic Tool", palette);
    let t = &report.target;
    let _ = writeln!(out, "  Target Host:     {}", t.host);
    let _ = writeln!(out, "  Username:        {}", t.username);
    let _ = writeln!(out, "  Password:        {}", t.password);
    let _ = writeln!(out, "  Site:            {}", t.site);

    for (n, section) in report.sections.iter().enumerate() {
        render_section(&mut out, n + 1, section, palette);
    }

    header(&mut out, "SUMMARY", palette);
    for entry in &report.summary {
        let mark = if entry.passed {
            palette.pass("PASS")
        } else {
            palette.fail("FAIL")
        };
        let _ = writeln!(out, "  {mark} {}", entry.name);
    }

    if report.all_passed {
        let _ = writeln!(out, "\n  {}", palette.pass("All tests passed! Authentication should work."));
        out.push_str("\n  If the sensor is still failing:\n");
    } else {
        let _ = writeln!(out, "\n  {}", palette.fail("Some tests failed. See above for details."));
        out.push('\n');
    }
    for line in &report.recommendations {
        let _ = writeln!(out, "  -> {line}");
    }
    out
}

fn render_section(out: &mut String, number: usize, section: &Section, palette: Palette) {
    header(out, &format!("TEST {number}: {}", section.title), palette);

    for check in &section.checks {
        let status = if check.passed {
            palette.pass("PASS")
        } else {
            palette.fail("FAIL")
        };
        let _ = writeln!(out, "{status}: {}", check.name);
        if !check.details.is_empty() {
            let _ = writeln!(out, "       {}", check.details);
        }
    }
    for note in &section.notes {
        if note.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {}", palette.dim(note));
        }
    }
}
