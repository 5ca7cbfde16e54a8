use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "returnwise")]
#[command(about = "Return eligibility and resale triage for assessed products")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = returnwise::config::DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a pipe-delimited recommended-action list
    Decode {
        /// Raw list, e.g. "1,140|3,75|5,0"
        raw: String,

        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Decide whether a product can be returned
    Evaluate(EvaluateArgs),

    /// Build an assessment from the grading service output and evaluate it
    Grade {
        /// Grading result, e.g. "Used - Like New,99"
        grading: String,

        /// Recommended-action result
        #[arg(short, long)]
        actions: Option<String>,

        /// Repair result, e.g. "YES,Replace the zipper"
        #[arg(short, long)]
        repair: Option<String>,

        /// Date the customer received the item (YYYY-MM-DD)
        #[arg(long)]
        received: String,

        /// Mark the item as not eligible for resale
        #[arg(long)]
        ineligible: bool,

        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the QR tag payload for a product JSON file
    Tag {
        /// Product JSON file
        file: String,
    },

    /// Scan a QR tag at the counter and route the item
    Scan {
        /// Tag payload (JSON text)
        payload: String,

        /// Action to take, 1-based (defaults to the first option)
        #[arg(short, long)]
        action: Option<usize>,
    },

    /// Check a customer's history for wardrobing signals
    Wardrobe {
        /// Customer history JSON file
        file: String,

        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show the effective configuration
    Init,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Product JSON file (same shape as the QR tag)
    #[arg(
        short,
        long,
        conflicts_with_all = ["condition", "received", "ineligible", "repairs", "wardrobing", "refund", "actions"]
    )]
    pub payload: Option<String>,

    /// Condition grade, e.g. "Used-Good" or "Salvage"
    #[arg(long, requires = "received")]
    pub condition: Option<String>,

    /// Date the customer received the item (YYYY-MM-DD)
    #[arg(long, requires = "condition")]
    pub received: Option<String>,

    /// Mark the item as not eligible for resale
    #[arg(long)]
    pub ineligible: bool,

    /// Mark the item as needing repairs
    #[arg(long)]
    pub repairs: bool,

    /// Mark the item as a suspected wardrobing return
    #[arg(long)]
    pub wardrobing: bool,

    /// Estimated refund value
    #[arg(long, default_value = "0")]
    pub refund: f64,

    /// Raw recommended-action list
    #[arg(long)]
    pub actions: Option<String>,

    /// Output format: table or json
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse_kind(args: &[&str]) -> Option<ErrorKind> {
        Cli::try_parse_from(args.iter().copied()).err().map(|e| e.kind())
    }

    #[test]
    fn test_payload_rejects_manual_fields() {
        let cases: [&[&str]; 6] = [
            &["--ineligible"],
            &["--repairs"],
            &["--wardrobing"],
            &["--refund", "5"],
            &["--actions", "1,10"],
            &["--condition", "New", "--received", "2025-03-05"],
        ];
        for extra in cases {
            let mut args = vec!["returnwise", "evaluate", "--payload", "product.json"];
            args.extend_from_slice(extra);
            assert_eq!(parse_kind(&args), Some(ErrorKind::ArgumentConflict), "{:?}", extra);
        }
    }

    #[test]
    fn test_payload_alone_parses() {
        let cli = Cli::try_parse_from(["returnwise", "evaluate", "--payload", "product.json"]).unwrap();
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.payload.as_deref(), Some("product.json"));
                assert_eq!(args.refund, 0.0);
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_manual_fields_parse() {
        let cli = Cli::try_parse_from([
            "returnwise", "evaluate", "--condition", "Used-Good", "--received", "2025-03-05",
            "--refund", "120", "--repairs",
        ])
        .unwrap();
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.condition.as_deref(), Some("Used-Good"));
                assert_eq!(args.refund, 120.0);
                assert!(args.repairs);
                assert!(!args.ineligible);
            }
            _ => panic!("expected evaluate"),
        }
    }
}
