//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;
use std::io::{self, BufRead, Write};
use ycp_core::report::{
    ActionableInsights, CompetitiveLandscape, DetailedEvaluation, QuickVerdict, YcReadyPitch,
};
use ycp_core::submission::{validate_email, validate_idea, validate_name};
use ycp_core::{FitBand, Result, ScoreBand, StructuredReport, ValidationReport};

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "YC-Pilot - Startup Idea Validator";
    println!(
        "{}{}{}{}",
        "│  ".blue(),
        title.blue().bold(),
        " ".repeat(inner.saturating_sub(title.chars().count() + 2)),
        "│".blue()
    );
    println!("{}", empty_line.blue());

    let feature_lines = [
        "Get detailed feedback on your startup concept in minutes",
        "",
        "• Quick verdict with overall score and YC fit",
        "• Detailed evaluation across five criteria",
        "• Similar YC companies and differentiation",
        "• Actionable insights and a YC-ready pitch",
    ];

    for line in feature_lines {
        let padding = " ".repeat(inner.saturating_sub(line.chars().count() + 2));
        println!("{}", format!("│  {}{}│", line, padding).blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "Tip: press Enter to validate an idea, or type 'help' for commands".dimmed()
    );
    println!();
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Validate a startup idea", "<Enter> / new".green());
    println!("  {} - Check that API credentials are configured", "health".green());
    println!("  {} - Send a test submission to the agent", "probe".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
}

/// Read one trimmed line. End of input is reported as an IO error.
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{} ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
    }
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Read lines until an empty one; joined with newlines.
pub fn read_paragraph(prompt: &str) -> Result<String> {
    println!("{} {}", prompt, "(finish with an empty line)".dimmed());

    let mut lines = Vec::new();
    loop {
        let line = read_line("  │")?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Ask until `validate` accepts the answer.
fn ask_field<R, V>(mut read: R, validate: V) -> Result<String>
where
    R: FnMut() -> Result<String>,
    V: Fn(&str) -> Option<String>,
{
    loop {
        let value = read()?;
        match validate(&value) {
            Some(message) => println!("{} {}", "✗".red(), message.red()),
            None => return Ok(value),
        }
    }
}

/// Prompt for the three form fields, re-asking for each invalid one.
pub fn read_form() -> Result<(String, String, String)> {
    let name = ask_field(|| read_line(&"Your Full Name:".bold().to_string()), validate_name)?;
    let email = ask_field(|| read_line(&"Email Address:".bold().to_string()), validate_email)?;
    let idea = ask_field(
        || {
            read_paragraph(
                &"Describe your startup idea: the problem, target market and any traction"
                    .bold()
                    .to_string(),
            )
        },
        validate_idea,
    )?;
    println!("{}", format!("{} characters", idea.chars().count()).dimmed());
    Ok((name, email, idea))
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = read_line(&format!("{} {} [y/N]:", "?".cyan(), question))?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&format!("{}\n", title.blue().bold()));
    out.push_str(&format!("{}\n", "─".repeat(title.chars().count()).blue()));
}

fn score_colored(score: &str) -> ColoredString {
    match ScoreBand::from_score(score) {
        ScoreBand::Strong => score.green().bold(),
        ScoreBand::Moderate => score.yellow().bold(),
        ScoreBand::Weak => score.red().bold(),
    }
}

fn fit_colored(fit: &str) -> ColoredString {
    match FitBand::from_label(fit) {
        FitBand::High => fit.green(),
        FitBand::Medium => fit.yellow(),
        FitBand::Low => fit.red(),
        FitBand::Unrated => fit.normal(),
    }
}

fn push_field(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        lines.push(format!("  {} {}", format!("{}:", label).bold(), value));
    }
}

fn push_list(lines: &mut Vec<String>, label: &str, items: Option<&Vec<String>>) {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return;
    };
    lines.push(format!("  {}", label.bold()));
    for item in items {
        lines.push(format!("    • {}", item));
    }
}

fn quick_verdict_lines(verdict: &QuickVerdict) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(score) = &verdict.overall_score {
        lines.push(format!("  {} {}", "Overall Score:".bold(), score_colored(score)));
    }
    if let Some(fit) = &verdict.yc_fit {
        lines.push(format!("  {} {}", "YC Fit:".bold(), fit_colored(fit)));
    }
    push_field(&mut lines, "Key Strength", verdict.key_strength.as_deref());
    push_field(&mut lines, "Major Risk", verdict.major_risk.as_deref());
    lines
}

fn evaluation_lines(evaluation: &DetailedEvaluation) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, criterion) in evaluation.criteria() {
        match &criterion.score {
            Some(score) => lines.push(format!("  {} {}", format!("{}:", label).bold(), score_colored(score))),
            None => lines.push(format!("  {}", label.bold())),
        }
        if let Some(reasoning) = &criterion.reasoning {
            lines.push(format!("    {}", reasoning));
        }
    }
    lines
}

fn landscape_lines(landscape: &CompetitiveLandscape) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(companies) = landscape.similar_yc_companies.as_ref().filter(|c| !c.is_empty()) {
        lines.push(format!("  {}", "Similar YC Companies".bold()));
        for company in companies {
            let name = company.company_name.as_deref().unwrap_or("Unnamed");
            match &company.batch_year {
                Some(batch) => lines.push(format!("    • {} ({})", name, batch.dimmed())),
                None => lines.push(format!("    • {}", name)),
            }
        }
    }
    push_field(&mut lines, "Differentiation", landscape.differentiation_analysis.as_deref());
    push_field(&mut lines, "Market Position", landscape.market_position.as_deref());
    push_field(&mut lines, "Learning Opportunities", landscape.learning_opportunities.as_deref());
    lines
}

fn insight_lines(insights: &ActionableInsights) -> Vec<String> {
    let mut lines = Vec::new();
    push_list(&mut lines, "Strengthen", insights.strengthen.as_ref());
    push_list(&mut lines, "Validate", insights.validate.as_ref());
    push_list(&mut lines, "Consider Pivoting", insights.pivot_consider.as_ref());
    lines
}

fn pitch_lines(pitch: &YcReadyPitch) -> Vec<String> {
    pitch
        .pitch
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("  {}", p.italic()))
        .collect()
}

fn format_structured(report: &StructuredReport) -> String {
    let sections = [
        ("Quick Verdict", report.quick_verdict.as_ref().map(quick_verdict_lines)),
        ("Detailed Evaluation", report.detailed_evaluation.as_ref().map(evaluation_lines)),
        ("Competitive Landscape", report.competitive_landscape.as_ref().map(landscape_lines)),
        ("Actionable Insights", report.actionable_insights.as_ref().map(insight_lines)),
        ("YC-Ready Pitch", report.yc_ready_pitch.as_ref().map(pitch_lines)),
    ];

    let mut out = format!("{}\n", "YC-Pilot Analysis".green().bold());
    for (title, lines) in sections {
        let Some(lines) = lines.filter(|l| !l.is_empty()) else {
            continue;
        };
        heading(&mut out, title);
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Render a report for the terminal, section by section.
pub fn format_report(report: &ValidationReport) -> String {
    match report {
        ValidationReport::Structured(structured) => format_structured(structured),
        ValidationReport::Opaque(text) => format!(
            "{}\n{}\n\n{}\n",
            "YC-Pilot Analysis Complete!".green().bold(),
            "Your startup validation results are ready".dimmed(),
            text
        ),
    }
}

pub fn display_report(report: &ValidationReport) {
    println!("{}", format_report(report));
}

/// Show a user-facing error.
pub fn display_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}
