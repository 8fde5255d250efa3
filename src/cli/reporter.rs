// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::assembly::Assembly;
use crate::dimensions::DerivedDimensions;
use crate::geometry::analyze;
use crate::utils::UnitConverter;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Per-part table for a finished build
    pub fn report_build(assembly: &Assembly, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "{} {} parts in {}",
            "Built:".bold(),
            assembly.len().to_string().cyan(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {:<20} {:<13} {:>11} {:>12} {:>8}",
            "Part".bold(),
            "Material".bold(),
            "Offset (m)".bold(),
            "Volume (cm³)".bold(),
            "Tris".bold()
        );

        for part in assembly.parts() {
            let stats = analyze(part.solid.mesh());
            println!(
                "  {:<20} {:<13} {:>11} {:>12} {:>8}",
                part.name.cyan(),
                part.material.as_str().bright_black(),
                format!("{:+.5}", part.placement().offset),
                format!("{:.3}", stats.volume * 1e6),
                stats.triangle_count
            );
        }

        let bounds = assembly.bounds();
        let size = bounds.size();
        println!(
            "\n  {} {:.4} x {:.4} x {:.4} m",
            "Envelope:".bright_black(),
            size.x,
            size.y,
            size.z
        );
        println!(
            "  {} {}",
            "Fingerprint:".bright_black(),
            assembly.fingerprint().yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Derived dimension table, shown in meters and the input unit
    pub fn report_dimensions(dims: &DerivedDimensions, converter: &UnitConverter) {
        let unit = converter.unit();
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{}", "Derived dimensions".bold());
        println!("{}", "━".repeat(80).bright_black());

        let rows = [
            ("tube_od", dims.tube_od),
            ("tube_id", dims.tube_id),
            ("tube_length", dims.tube_length),
            ("insert_od", dims.insert_od),
            ("insert_id", dims.insert_id),
            ("insert_center", dims.insert_center),
            ("shoulder_center", dims.shoulder_center),
            ("weld_center", dims.weld_center),
            ("shank_center", dims.shank_center),
            ("body_center", dims.body_center),
            ("ball_center", dims.ball_center),
            ("eye_bore_length", dims.eye_bore_length),
            ("nut_center", dims.nut_center),
            ("nut_circumradius", dims.nut_circumradius),
            ("nut_bore_radius", dims.nut_bore_radius),
            ("overall_length", dims.overall_length()),
        ];
        for (name, meters) in rows {
            println!(
                "  {:<18} {:>12} {:>12}",
                format!("{name}:").bright_black(),
                format!("{meters:.6} m"),
                format!("{:.4} {unit}", converter.from_meters(meters)).cyan()
            );
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
