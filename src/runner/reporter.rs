use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::runner::types::{RequestOutcome, RouteReport, RunOptions};
use crate::utils::ResponseFormatter;

pub struct RouteReporter {
    formatter: ResponseFormatter,
}

impl RouteReporter {
    pub fn new() -> Self {
        Self {
            formatter: ResponseFormatter::new(),
        }
    }

    /// 打印运行开始
    pub fn print_header(&self, route_count: usize, options: &RunOptions) {
        let mode = if options.concurrent {
            format!("concurrent, pool {}", options.pool_size())
        } else {
            "sequential".to_string()
        };
        println!(
            "\nTesting {} route(s), {} request(s) each ({})...\n",
            route_count.to_string().bold(),
            options.request_count,
            mode
        );
    }

    /// 打印单个路由的报告
    pub fn print_report(&self, report: &RouteReport) {
        let symbol = if report.aborted.is_some() || report.success_count < report.total_requests {
            "✗".red()
        } else {
            "✓".green()
        };

        let target = match (&report.method, &report.url) {
            (Some(method), Some(url)) => format!(" {} {}", method.cyan(), url),
            _ => String::new(),
        };
        println!(" {} {}{}", symbol, report.route_name.bold(), target);

        if let Some(reason) = &report.aborted {
            println!("   {}: {}", "Aborted".red().bold(), reason);
            println!();
            return;
        }

        for line in report_table(report).to_string().lines() {
            println!("   {}", line);
        }
        println!();
    }

    /// 详细模式：打印完整响应
    pub fn print_detail(&self, route_name: &str, outcome: &RequestOutcome) {
        println!("\n{}", route_name.bold());
        match self.formatter.format(outcome) {
            Ok(formatted) => {
                for line in formatted.lines() {
                    println!("   {}", line);
                }
            }
            Err(e) => {
                println!(
                    "   {}: Failed to format response: {}",
                    "Warning".yellow(),
                    e
                );
            }
        }
        println!();
    }

    /// 打印所有路由的摘要
    pub fn print_summary(&self, reports: &[RouteReport]) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));
        println!("{}", summary_table(reports));

        let total: usize = reports.iter().map(|r| r.total_requests).sum();
        let succeeded: usize = reports.iter().map(|r| r.success_count).sum();
        let aborted = reports.iter().filter(|r| r.aborted.is_some()).count();

        if succeeded == total && aborted == 0 {
            println!(
                "  {}: {} succeeded, {} total",
                "Requests".bold(),
                succeeded.to_string().green(),
                total
            );
        } else {
            println!(
                "  {}: {} succeeded, {} failed, {} total",
                "Requests".bold(),
                succeeded.to_string().green(),
                (total - succeeded).to_string().red(),
                total
            );
        }
        if aborted > 0 {
            println!(
                "  {}: {}",
                "Aborted routes".bold(),
                aborted.to_string().red()
            );
        }
        println!();
    }
}

impl Default for RouteReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个路由的统计表
pub fn report_table(report: &RouteReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    let rate_color = if report.success_count == report.total_requests {
        Color::Green
    } else {
        Color::Red
    };

    table.add_row(vec![
        Cell::new("Requests"),
        Cell::new(report.total_requests),
    ]);
    table.add_row(vec![
        Cell::new("Success"),
        Cell::new(format!(
            "{} ({:.1}%)",
            report.success_count,
            report.success_rate()
        ))
        .fg(rate_color),
    ]);
    table.add_row(vec![
        Cell::new("Failures"),
        Cell::new(report.failure_count),
    ]);

    for (code, count) in &report.status_codes {
        let color = if *code < 400 { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(format!("Status {}", code)),
            Cell::new(count).fg(color),
        ]);
    }

    if report.failed > 0 {
        table.add_row(vec![
            Cell::new("Failed (no response)"),
            Cell::new(format!("{} ({} timeouts)", report.failed, report.timeouts)).fg(Color::Red),
        ]);
    }

    match &report.timing {
        Some(timing) => {
            for (label, value) in [
                ("Min", timing.min),
                ("Max", timing.max),
                ("Mean", timing.mean),
                ("Median", timing.median),
                ("P90", timing.p90),
                ("P95", timing.p95),
                ("P99", timing.p99),
            ] {
                table.add_row(vec![Cell::new(label), Cell::new(format!("{:.2}ms", value))]);
            }
        }
        None => {
            table.add_row(vec![
                Cell::new("Timing"),
                Cell::new("no successful requests").add_attribute(Attribute::Dim),
            ]);
        }
    }

    table
}

/// 多路由对比表
pub fn summary_table(reports: &[RouteReport]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Route", "Requests", "Success", "Failures", "Mean", "P95",
    ]);

    for report in reports {
        let (mean, p95) = match &report.timing {
            Some(t) => (format!("{:.2}ms", t.mean), format!("{:.2}ms", t.p95)),
            None => ("-".to_string(), "-".to_string()),
        };
        let name = if report.aborted.is_some() {
            Cell::new(format!("{} (aborted)", report.route_name)).fg(Color::Red)
        } else {
            Cell::new(&report.route_name)
        };

        table.add_row(vec![
            name,
            Cell::new(report.total_requests),
            Cell::new(format!("{:.1}%", report.success_rate())),
            Cell::new(report.failure_count),
            Cell::new(mean),
            Cell::new(p95).add_attribute(Attribute::Dim),
        ]);
    }

    table
}
