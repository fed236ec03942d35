//! Report rendering shared by the commands.

use anyhow::Result;
use serde::Serialize;

use stratum_cost::CostEstimate;
use stratum_iac::ValidationResult;
use stratum_policy::{FindingKind, SecurityLevel, SecurityReport};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_validation(result: &ValidationResult) {
    println!("🏗️  Validation ({} resources)", result.resource_count);
    if result.valid {
        println!("   ✅ Structure is valid");
    } else {
        println!("   ❌ Structural errors:");
        for error in &result.errors {
            println!("      - {}", error);
        }
    }
    for warning in &result.warnings {
        println!("   ⚠️  {}", warning);
    }
    for suggestion in &result.suggestions {
        println!("   💡 {}", suggestion);
    }
}

pub fn print_cost(estimate: &CostEstimate) {
    println!(
        "💰 Estimated cost: {} ({}{:.2}/year, {})",
        estimate.format_total(),
        estimate.currency,
        estimate.annual_cost,
        estimate.region
    );
    for item in &estimate.line_items {
        println!(
            "   {:<36} {}{:>8.2}  {}",
            item.service, estimate.currency, item.total, item.specification
        );
    }
    if estimate.free_tier_eligible {
        println!("   ✅ Free tier eligible");
    }
    for tip in &estimate.optimization_tips {
        println!("   💡 {}", tip);
    }
}

pub fn print_security(report: &SecurityReport) {
    let badge = match report.level {
        SecurityLevel::Good => "✅",
        SecurityLevel::Moderate => "⚠️ ",
        SecurityLevel::NeedsImprovement => "❌",
    };
    println!("🔒 Security score: {}/100 {} {}", report.score, badge, report.level);
    for finding in &report.findings {
        let marker = match finding.kind {
            FindingKind::Positive => "✅",
            FindingKind::Warning => "⚠️ ",
            FindingKind::Negative => "❌",
            FindingKind::Info => "ℹ️ ",
        };
        match finding.severity {
            Some(severity) => println!(
                "   {} [{}] {} ({})",
                marker,
                finding.category,
                finding.text,
                severity.as_str()
            ),
            None => println!("   {} [{}] {}", marker, finding.category, finding.text),
        }
    }
    for recommendation in &report.recommendations {
        println!("   → {}", recommendation);
    }
}
