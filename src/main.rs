mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;

use rupress::config::template::{generator_help, save_config_template};
use rupress::http::Client;
use rupress::runner::{RouteReporter, RouteRunner, save_results};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    rupress::logger::init_logger();

    let cli = Cli::parse();

    if let Some(path) = &cli.create_template {
        save_config_template(path)?;
        println!("Template created: {}", path.display().to_string().bold());
        println!("\nAvailable placeholders:\n{}", generator_help());
        return Ok(());
    }

    let config = cli.load_config()?;
    let runner = RouteRunner::new(Client::new()?, cli.run_options());
    let reporter = RouteReporter::new();

    if runner.options().detail {
        let (name, outcome) = runner.run_detail(&config, &cli.routes).await?;
        reporter.print_detail(&name, &outcome);
        return Ok(());
    }

    let routes = runner.select(&config, &cli.routes)?;
    reporter.print_header(routes.len(), runner.options());

    let mut reports = Vec::with_capacity(routes.len());
    for route in routes {
        let report = runner.run_route(route, &config.global).await?;
        reporter.print_report(&report);
        reports.push(report);
    }
    reporter.print_summary(&reports);

    if let Some(path) = &cli.output {
        save_results(path, &reports)?;
        println!("Results saved to {}", path.display().to_string().bold());
    }

    Ok(())
}
