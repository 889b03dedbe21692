use crate::fork::{by_rank, ForkRecord};
use chrono::{Local, NaiveDateTime};
use itertools::Itertools;

const DETAIL_LIMIT: usize = 20;
const RECOMMEND_LIMIT: usize = 5;
const UNIQUE_COMMIT_LIMIT: usize = 3;
const COMMIT_WIDTH: usize = 80;
const HOUSEKEEPING_KEYWORDS: &[&str] = &["merge", "upstream", "sync"];

pub fn generate(records: &[ForkRecord], project: &str) -> String {
    generate_at(records, project, Local::now().naive_local())
}

/// Interesting records, best first. Ties keep their input order.
pub fn ranked(records: &[ForkRecord]) -> Vec<&ForkRecord> {
    records
        .iter()
        .filter(|r| r.interesting)
        .sorted_by(by_rank)
        .collect()
}

pub fn unique_commits(commits: &[String]) -> impl Iterator<Item = &String> {
    commits.iter().filter(|c| {
        let lower = c.to_lowercase();
        !HOUSEKEEPING_KEYWORDS.iter().any(|k| lower.contains(k))
    })
}

pub fn reasons(fork: &ForkRecord) -> String {
    let mut reasons = Vec::new();
    if fork.stars > 0 {
        reasons.push(format!("{} stars", fork.stars));
    }
    if fork.ahead_by > 0 {
        reasons.push(format!("{} commits ahead", fork.ahead_by));
    }
    if fork.branch_count > 0 {
        reasons.push(format!("{} custom branches", fork.branch_count));
    }
    if reasons.is_empty() {
        "Active fork".to_string()
    } else {
        reasons.join(", ")
    }
}

pub fn generate_at(records: &[ForkRecord], project: &str, generated: NaiveDateTime) -> String {
    let mut report = Vec::new();
    report.push(format!("# {project} Fork Analysis Report"));
    report.push(format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")));
    report.push(String::new());

    let interesting = ranked(records);
    let count = |pred: fn(&ForkRecord) -> bool| interesting.iter().filter(|r| pred(r)).count();

    report.push("## Summary".to_string());
    report.push(format!("- Total forks analyzed: {}", records.len()));
    report.push(format!("- Interesting forks: {}", interesting.len()));
    report.push(format!(
        "- Forks with custom branches: {}",
        count(|r| r.branch_count > 0)
    ));
    report.push(format!(
        "- Forks ahead of upstream: {}",
        count(|r| r.ahead_by > 0)
    ));
    report.push(format!("- Forked repos with stars: {}", count(|r| r.stars > 0)));
    report.push(String::new());

    if !interesting.is_empty() {
        report.push("## Most Interesting Forks".to_string());
        report.push(String::new());

        for (i, fork) in interesting.iter().take(DETAIL_LIMIT).enumerate() {
            push_detail(&mut report, i + 1, fork);
        }
    }

    report.push("## Recommendations".to_string());
    report.push(String::new());

    if !interesting.is_empty() {
        report.push(format!("### Top {RECOMMEND_LIMIT} Forks to Review:"));
        for (i, fork) in interesting.iter().take(RECOMMEND_LIMIT).enumerate() {
            report.push(format!("{}. **{}** - {}", i + 1, fork.owner, reasons(fork)));
            report.push(format!("   {}", fork.url));
        }
    }

    report.join("\n")
}

fn push_detail(report: &mut Vec<String>, rank: usize, fork: &ForkRecord) {
    report.push(format!("### {rank}. {}", fork.owner));
    report.push(format!("**URL:** {}", fork.url));
    report.push(format!("**Stars:** {}", fork.stars));

    if !fork.description.is_empty() {
        report.push(format!("**Description:** {}", fork.description));
    }
    if fork.branch_count > 0 {
        report.push(format!(
            "**Custom Branches:** {}",
            fork.custom_branches.join(", ")
        ));
    }
    if fork.ahead_by > 0 {
        report.push(format!("**Ahead of upstream:** {} commits", fork.ahead_by));
    }
    if fork.behind_by > 0 {
        report.push(format!("**Behind upstream:** {} commits", fork.behind_by));
    }

    let unique: Vec<_> = unique_commits(&fork.recent_commits)
        .take(UNIQUE_COMMIT_LIMIT)
        .collect();
    if !unique.is_empty() {
        report.push("**Recent Unique Commits:**".to_string());
        for commit in unique {
            let line: String = commit.chars().take(COMMIT_WIDTH).collect();
            report.push(format!("  - {line}"));
        }
    }

    if fork.worth_investigating() {
        report.push("**⚠️ WORTH INVESTIGATING**".to_string());
    }
    report.push(String::new());
}

/// Console recap printed after the report is written.
pub fn console_summary(records: &[ForkRecord]) -> String {
    let interesting = ranked(records);
    let mut lines = vec![format!(
        "✓ Found {} interesting forks out of {} total",
        interesting.len(),
        records.len()
    )];

    if !interesting.is_empty() {
        lines.push(String::new());
        lines.push(format!("Top {RECOMMEND_LIMIT} Most Interesting:"));
        for (i, fork) in interesting.iter().take(RECOMMEND_LIMIT).enumerate() {
            lines.push(format!("{}. {} ({})", i + 1, fork.owner, fork.url));
            if fork.stars > 0 {
                lines.push(format!("   ⭐ {} stars", fork.stars));
            }
            if fork.branch_count > 0 {
                lines.push(format!("   🌿 {} custom branches", fork.branch_count));
            }
            if fork.ahead_by > 0 {
                lines.push(format!("   ⬆️ {} commits ahead", fork.ahead_by));
            }
        }
    }

    lines.join("\n")
}
