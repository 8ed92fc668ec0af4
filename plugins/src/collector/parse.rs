//! Pure parsers for probe output. Each returns `None` when the expected
//! marker is absent so the caller decides the fallback.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

static INSERTIONS_REGEX: OnceLock<Regex> = OnceLock::new();
static DELETIONS_REGEX: OnceLock<Regex> = OnceLock::new();
static MUTATION_REGEX: OnceLock<Regex> = OnceLock::new();
static COVERAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static DEVIRT_REGEX: OnceLock<Regex> = OnceLock::new();
static CONTRACTS_REGEX: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static probe regex is valid"))
}

/// `numerator / denominator` capped at 1.0; a zero denominator counts as 1.
pub fn capped_ratio(numerator: usize, denominator: usize) -> f64 {
    (numerator as f64 / denominator.max(1) as f64).min(1.0)
}

/// Insertions plus deletions from a `git diff --stat` summary line.
pub fn parse_changed_lines(summary: &str) -> Option<usize> {
    let grab = |re: &Regex| {
        re.captures(summary)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    };

    let ins = grab(cached(&INSERTIONS_REGEX, r"(\d+) insertions?"));
    let del = grab(cached(&DELETIONS_REGEX, r"(\d+) deletions?"));

    if ins.is_none() && del.is_none() {
        return None;
    }
    Some(ins.unwrap_or(0) + del.unwrap_or(0))
}

/// Share of `git diff --name-status` entries that are additions.
pub fn novelty_from_name_status(output: &str) -> f64 {
    let entries: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    if entries.is_empty() {
        return 0.0;
    }
    let added = entries.iter().filter(|l| l.starts_with("A\t")).count();
    capped_ratio(added, entries.len())
}

/// Changed dependency lines in a `package.json` diff.
pub fn count_dependency_changes(diff: &str) -> usize {
    diff.lines()
        .filter(|l| !l.starts_with("+++") && !l.starts_with("---"))
        .filter(|l| l.starts_with('+') || l.starts_with('-'))
        .filter(|l| l.contains("dependencies") || l.contains("devDependencies"))
        .count()
}

/// Number of declared dependencies plus dev dependencies.
pub fn count_declared_dependencies(package_json: &Value) -> usize {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|k| package_json.get(*k).and_then(Value::as_object))
        .map(|m| m.len())
        .sum()
}

fn percent(re: &Regex, output: &str) -> Option<f64> {
    re.captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|p| (p / 100.0).clamp(0.0, 1.0))
}

/// `Mutation score: 83.5%`
pub fn parse_mutation_score(output: &str) -> Option<f64> {
    percent(
        cached(&MUTATION_REGEX, r"Mutation score: (\d+\.?\d*)%"),
        output,
    )
}

/// Istanbul-style table row `All files | 91.2 | ...`
pub fn parse_coverage(output: &str) -> Option<f64> {
    percent(
        cached(&COVERAGE_REGEX, r"All files\s+\|\s+(\d+\.?\d*)"),
        output,
    )
}

/// `Success rate: 64%`
pub fn parse_devirt_rate(output: &str) -> Option<f64> {
    percent(cached(&DEVIRT_REGEX, r"Success rate: (\d+\.?\d*)%"), output)
}

/// `12 of 12 contracts passing`; zero contracts count as passing.
pub fn parse_contract_pass_rate(output: &str) -> Option<f64> {
    let caps = cached(&CONTRACTS_REGEX, r"(\d+) of (\d+) contracts passing").captures(output)?;
    let passed = caps.get(1)?.as_str().parse::<usize>().ok()?;
    let total = caps.get(2)?.as_str().parse::<usize>().ok()?;
    if total == 0 {
        return Some(1.0);
    }
    Some(capped_ratio(passed, total))
}

fn severity_weight(severity: &str) -> f64 {
    match severity {
        "critical" => 1.0,
        "high" => 0.8,
        "moderate" => 0.5,
        "low" => 0.2,
        _ => 0.1,
    }
}

/// Mean severity weight over the `vulnerabilities` map of `npm audit --json`.
pub fn sast_severity(audit: &Value) -> f64 {
    let Some(vulns) = audit.get("vulnerabilities").and_then(Value::as_object) else {
        return 0.0;
    };
    if vulns.is_empty() {
        return 0.0;
    }

    let total: f64 = vulns
        .values()
        .map(|v| {
            let sev = v.get("severity").and_then(Value::as_str).unwrap_or("low");
            severity_weight(sev)
        })
        .sum();

    total / vulns.len() as f64
}
