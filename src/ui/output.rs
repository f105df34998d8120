use crate::error::{DecompError, UserFriendlyError};
use crate::report::RunReport;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn verbose_level(&self) -> u8 {
        self.verbose_level
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Warning, message),
            OutputMode::Json => self.print_json_message("warning", message),
            OutputMode::Plain => println!("WARNING: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &DecompError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Human/plain one-screen summary of a finished run. The JSON mode
    /// prints nothing here; the full report is emitted separately.
    pub fn print_run_summary(&self, report: &RunReport) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", CHECKMARK, style("Extraction complete").bold());
                } else {
                    println!("Extraction complete");
                }
                println!("  Containers extracted: {}", report.containers_extracted);
                println!("  Artifacts decoded:    {}", report.artifacts_decoded);
                println!("  Files copied:         {}", report.files_copied);
                if report.warnings.is_empty() {
                    println!("  Warnings:             0");
                } else if self.use_colors {
                    println!(
                        "  {}",
                        style(format!("Warnings:             {}", report.warnings.len()))
                            .yellow()
                    );
                } else {
                    println!("  Warnings:             {}", report.warnings.len());
                }
                println!("  Duration:             {:.2?}", report.duration);
                println!("  Output:               {}", report.output_root.display());
            }
            _ => {
                println!(
                    "DONE: containers={} decoded={} copied={} warnings={} output={}",
                    report.containers_extracted,
                    report.artifacts_decoded,
                    report.files_copied,
                    report.warnings.len(),
                    report.output_root.display()
                );
            }
        }
    }

    pub fn print_run_report(&self, report: &RunReport) {
        if self.mode == OutputMode::Json {
            let json_output =
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json_output);
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }
        if self.use_colors {
            println!("{}", style("─".repeat(50)).dim());
        } else {
            println!("{}", "-".repeat(50));
        }
    }

    fn should_show_message(&self, required_level: u8) -> bool {
        !self.quiet && self.verbose_level >= required_level
    }

    fn print_human_message(&self, message_type: MessageType, message: &str) {
        match message_type {
            MessageType::Success => {
                if self.use_colors {
                    println!("{}{}", CHECKMARK, style(message).green());
                } else {
                    println!("✓ {}", message);
                }
            }
            MessageType::Error => {
                if self.use_colors {
                    eprintln!("{}{}", CROSS, style(message).red());
                } else {
                    eprintln!("✗ {}", message);
                }
            }
            MessageType::Warning => {
                if self.use_colors {
                    println!("{}{}", WARNING, style(message).yellow());
                } else {
                    println!("! {}", message);
                }
            }
            MessageType::Info => {
                if self.use_colors {
                    println!("{}{}", INFO, style(message).cyan());
                } else {
                    println!("i {}", message);
                }
            }
        }
    }

    fn print_json_message(&self, message_type: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": message_type,
            "message": message
        }));
    }

    fn print_json_object(&self, value: &serde_json::Value) {
        println!("{}", value);
    }
}
