mod cli;

use clap::Parser;
use cli::{commands::EvaluateArgs, Cli, Commands};
use colored::*;
use returnwise::{
    assessment::{self, payload, ActionDecoder, AssessmentRecord, RecommendedAction},
    error::{self, ReturnError},
    returns::{CustomerHistory, EligibilityChecker, EligibilityReport, WardrobingDetector},
    session::{ProcessingScreen, ReturnSession},
    utils, Config,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("returnwise=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Decode { raw, format } => decode_list(&config, &raw, &format),

        Commands::Evaluate(args) => evaluate(&config, args),

        Commands::Grade {
            grading,
            actions,
            repair,
            received,
            ineligible,
            format,
        } => {
            info!("Assembling assessment from grading output");
            grade(
                &config,
                &grading,
                actions.as_deref(),
                repair.as_deref(),
                &received,
                !ineligible,
                &format,
            )
        }

        Commands::Tag { file } => print_tag(&file),

        Commands::Scan { payload, action } => {
            info!("Scanning return tag...");
            scan_tag(&config, &payload, action).await
        }

        Commands::Wardrobe { file, format } => check_wardrobing(&config, &file, &format),

        Commands::Init => show_config(&config),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn decoder(config: &Config) -> ActionDecoder {
    ActionDecoder::new(config.actions.unknown_code)
}

fn decode_list(config: &Config, raw: &str, format: &str) -> error::Result<()> {
    let actions = decoder(config).decode(raw)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    print_actions(&actions);
    Ok(())
}

fn print_actions(actions: &[RecommendedAction]) {
    if actions.is_empty() {
        println!("{}", "No recommended actions".yellow());
        return;
    }

    let rows: Vec<Vec<String>> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            vec![
                (i + 1).to_string(),
                action.label().to_string(),
                utils::format_money(action.value),
            ]
        })
        .collect();
    utils::print_table(&["#", "Action", "Value"], &rows, &[3, 30, 12]);
}

fn evaluate(config: &Config, args: EvaluateArgs) -> error::Result<()> {
    let (name, record) = match (&args.payload, &args.condition, &args.received) {
        (Some(path), _, _) => {
            let product = payload::decode(&std::fs::read_to_string(path)?)?;
            let record = AssessmentRecord::try_from(&product)?;
            (format!("{} ({})", product.name, product.id), record)
        }
        (None, Some(condition), Some(received)) => {
            let mut record = AssessmentRecord::new(
                condition.as_str().into(),
                args.refund,
                assessment::parse_date(received)?,
            )?;
            record.eligible_for_resale = !args.ineligible;
            record.repairs_needed = args.repairs;
            record.is_wardrobing = args.wardrobing;
            record.recommended_action_raw = args.actions.clone().unwrap_or_default();
            ("Product".to_string(), record)
        }
        _ => {
            return Err(ReturnError::InvalidSelection(
                "provide --payload, or --condition with --received".to_string(),
            ))
        }
    };

    let actions = decoder(config).decode(&record.recommended_action_raw)?;
    let report = EligibilityChecker::new(config).evaluate(&record);

    if args.format == "json" {
        let output = serde_json::json!({
            "record": record,
            "actions": actions,
            "report": report,
            "nonReturnable": report.is_non_returnable(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report(&name, &record, &report);
    if !actions.is_empty() {
        println!("\n{}", "Recommended actions:".cyan());
        print_actions(&actions);
    }
    Ok(())
}

fn print_report(name: &str, record: &AssessmentRecord, report: &EligibilityReport) {
    println!("{}", "=== Assessment Summary ===".cyan().bold());
    println!("Product:          {}", name);
    println!("Condition:        {}", record.condition);
    println!("Estimated Refund: {}", utils::format_money(record.estimated_refund_value));
    println!("Received:         {}", utils::format_date(&record.received_date));
    println!();

    for (label, ok) in report.checklist() {
        println!("  {} {}", utils::check_mark(ok), label);
    }
    if report.wardrobing_suspected {
        println!("  {} {}", "!".yellow(), "Flagged for possible wardrobing".yellow());
    }

    let options = report.drop_off_options();
    if options.is_empty() {
        println!("\n{}", "This item cannot be returned".red().bold());
        for reason in &report.reasons {
            println!("  {}", reason.message(report.window_days));
        }
        println!("Please contact customer support if you believe this is a mistake.");
        return;
    }

    println!("\n{}", "Eligible for return. Drop-off options:".green().bold());
    let rows: Vec<Vec<String>> = options
        .iter()
        .map(|option| vec![option.name.to_string(), option.price_label()])
        .collect();
    utils::print_table(&["Drop-off", "Fee"], &rows, &[24, 10]);
}

fn grade(
    config: &Config,
    grading: &str,
    actions: Option<&str>,
    repair: Option<&str>,
    received: &str,
    eligible_for_resale: bool,
    format: &str,
) -> error::Result<()> {
    let result = assessment::assemble(
        &decoder(config),
        grading,
        actions,
        repair,
        assessment::parse_date(received)?,
        eligible_for_resale,
    )?;
    let report = EligibilityChecker::new(config).evaluate(&result.record);

    if format == "json" {
        let output = serde_json::json!({
            "record": result.record,
            "actions": result.actions,
            "repair": result.repair,
            "report": report,
            "nonReturnable": report.is_non_returnable(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report("Graded product", &result.record, &report);

    println!("\n{}", "Recommended actions:".cyan());
    print_actions(&result.actions);

    if let Some(repair) = result.repair.as_ref().filter(|r| r.needed) {
        println!("\n{}", "Recommended repair steps:".cyan());
        println!("  {}", repair.explanation);
    }
    Ok(())
}

fn print_tag(file: &str) -> error::Result<()> {
    let product = payload::decode(&std::fs::read_to_string(file)?)?;
    println!("{}", payload::encode(&product)?);
    Ok(())
}

async fn scan_tag(config: &Config, text: &str, action: Option<usize>) -> error::Result<()> {
    let product = match payload::scan(text, &decoder(config)) {
        Ok(product) => product,
        Err(e) => {
            warn!("Could not read tag: {}", e);
            println!("{}", "No product data found on this tag".yellow());
            return Err(e);
        }
    };

    let mut session = ReturnSession::new();
    session.select_product(product);
    let Some(product) = session.current() else {
        return Err(ReturnError::NoProductSelected);
    };

    println!("{}", "=== Product Summary ===".cyan().bold());
    println!("Name:      {}", product.name);
    println!("Order ID:  {}", product.id);
    println!("Ordered:   {}", utils::format_date(&product.ordered));
    println!("Received:  {}", utils::format_date(&product.received));
    if let Some(condition) = &product.condition {
        println!("Condition: {}", condition);
    }
    if let Some(value) = product.estimated_refund_value {
        println!("Estimated Resale Value: {}", utils::format_money(value));
    }
    println!(
        "  {} Eligible for resale",
        utils::check_mark(product.eligible_for_resale.unwrap_or(false))
    );
    println!(
        "  {} No refurbishments needed",
        utils::check_mark(!product.repairs_needed.unwrap_or(false))
    );

    println!("\n{}", "Recommended action:".cyan());
    print_actions(product.action_options.as_deref().unwrap_or_default());

    if product.repairs_needed.unwrap_or(false) {
        if let Some(steps) = &product.recommended_repair {
            println!("\n{}", "Recommended repair steps:".cyan());
            println!("  {}", steps);
        }
    }

    let index = action.unwrap_or(1).checked_sub(1).ok_or_else(|| {
        ReturnError::InvalidSelection("actions are numbered from 1".to_string())
    })?;
    let chosen = session.select_action(index)?.clone();
    println!("\nContinuing with: {}", chosen.label().green());

    let mut screen = ProcessingScreen::new(config.processing.delay_ms);
    let spinner = utils::spinner("Processing resale...");
    screen.run().await;
    spinner.finish_and_clear();

    if let Some(product) = session.finish() {
        println!(
            "{} {} routed to {} ({})",
            "✓".green(),
            product.name,
            chosen.label(),
            utils::format_money(chosen.value)
        );
    }
    Ok(())
}

fn check_wardrobing(config: &Config, file: &str, format: &str) -> error::Result<()> {
    let history: CustomerHistory = serde_json::from_str(&std::fs::read_to_string(file)?)?;
    let detector = WardrobingDetector::new(&config.wardrobing)?;
    let assessment = detector.assess(&history)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("{}", "=== Wardrobing Check ===".cyan().bold());
    if let Some(name) = &history.name {
        println!("Customer:    {}", name);
    }
    println!("IP:          {}", history.ip);
    println!("Return rate: {:.1}%", assessment.return_rate * 100.0);

    if assessment.suspected {
        println!("{}", "Suspected wardrobing".red().bold());
        for signal in &assessment.signals {
            println!("  {} {}", "✗".red(), signal);
        }
    } else {
        println!("{}", "No wardrobing signals".green());
    }
    Ok(())
}

fn show_config(config: &Config) -> error::Result<()> {
    println!("{}", "Configuration:".cyan());
    let rendered = toml::to_string_pretty(config).map_err(anyhow::Error::from)?;
    println!("{}", rendered);
    Ok(())
}
