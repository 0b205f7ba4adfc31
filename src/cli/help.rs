//! Command-line help with usage examples and topic pages
//!
//! Topic pages document the input and manifest formats, which clap's
//! generated `--help` has no room for.

use crate::config::env::EnvManager;
use colored::*;

/// Help system for the CLI application
pub struct HelpSystem {
    platform: String,
}

impl HelpSystem {
    /// Topics accepted by `--help-topic`
    pub const TOPICS: [&'static str; 5] = ["config", "manifest", "input", "output", "examples"];

    /// Create a new help system
    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_environment_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_footer(use_colors));

        help
    }

    /// Display help for a specific topic
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.trim().to_lowercase().as_str() {
            "config" | "configuration" | "env" | "environment" => Some(self.format_configuration_help(use_colors)),
            "manifest" | "batch" => Some(self.format_manifest_help(use_colors)),
            "input" | "format" => Some(self.format_input_help(use_colors)),
            "output" | "summary" => Some(self.format_output_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn heading(&self, text: &str, use_colors: bool) -> String {
        if use_colors {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format the main header
    fn format_header(&self, use_colors: bool) -> String {
        let title = "Stratos Stats";
        let subtitle = "Means and 95% confidence intervals for batches of simulation results";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title, subtitle, version, self.platform
            )
        }
    }

    /// Format the usage section
    fn format_usage_section(&self, use_colors: bool) -> String {
        let usage_patterns = [
            "stratos-stats [--root DIR] [--manifest FILE] [--output FILE]",
            "stratos-stats --file FILE [--packets N] [--requesters N]",
            "stratos-stats --print-manifest",
            "stratos-stats --help-topic TOPIC",
        ];

        let mut usage = format!("{}\n", self.heading("USAGE:", use_colors));
        for pattern in usage_patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }

        usage
    }

    /// Format the options section
    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                short: Some("r"),
                long: "root",
                value: "<DIR>",
                description: "Directory the input files are resolved against",
                example: Some("--root ~/simulations/run-7"),
            },
            OptionHelp {
                short: Some("m"),
                long: "manifest",
                value: "<FILE>",
                description: "JSON manifest listing the input groups",
                example: None,
            },
            OptionHelp {
                short: Some("o"),
                long: "output",
                value: "<FILE>",
                description: "Summary file (default: centralized_statics.txt)",
                example: None,
            },
            OptionHelp {
                short: Some("f"),
                long: "file",
                value: "<FILE>",
                description: "Aggregate one file and print its summary lines",
                example: Some("--file centralized_mobile_0.txt"),
            },
            OptionHelp {
                short: Some("p"),
                long: "packets",
                value: "<N>",
                description: "Expected packets per request with --file (default: 10)",
                example: None,
            },
            OptionHelp {
                short: Some("n"),
                long: "requesters",
                value: "<N>",
                description: "Requester lines per run with --file (default: 4)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "print-manifest",
                value: "",
                description: "Print the effective manifest as JSON and exit",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "log-format",
                value: "<FORMAT>",
                description: "Log format: console, json or compact",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "verbose",
                value: "",
                description: "Log progress and print a report table",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "debug",
                value: "",
                description: "Log per-series details and source locations",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "no-color",
                value: "",
                description: "Disable colored output",
                example: None,
            },
        ];

        let mut output = format!("{}\n", self.heading("OPTIONS:", use_colors));
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }

        output
    }

    /// Format the examples section
    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Full experiment batch",
                command: "stratos-stats --root ./results",
                description: "Aggregate the 19 built-in inputs into ./results/centralized_statics.txt",
            },
            ExampleHelp {
                title: "Custom batch",
                command: "stratos-stats --root ./results --manifest batch.json --output summary.txt --verbose",
                description: "Use a JSON manifest and print a report table",
            },
            ExampleHelp {
                title: "Single file",
                command: "stratos-stats --file centralized_requesters_16.txt --requesters 16",
                description: "Print the confidence and mean lines of one file to stdout",
            },
            ExampleHelp {
                title: "Start a manifest from the built-in table",
                command: "stratos-stats --print-manifest > batch.json",
                description: "Write the default experiment layout as editable JSON",
            },
        ];

        let mut output = format!("{}\n", self.heading("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }

        output
    }

    /// Format the environment variables section
    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.heading("ENVIRONMENT VARIABLES:", use_colors));
        output.push_str("Configuration priority: CLI arguments > Environment variables > .env file > Defaults\n\n");

        for (var_name, description, _example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("  {}: {}\n",
                    var_name.bright_yellow().bold(),
                    description.white()
                ));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
        }

        output
    }

    /// Format the footer listing topic pages
    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = format!("{}\n", self.heading("ADDITIONAL HELP:", use_colors));

        let help_topics = [
            ("--help-topic config", "Environment variables and the .env file"),
            ("--help-topic manifest", "Batch manifest format and the built-in table"),
            ("--help-topic input", "Results file layout"),
            ("--help-topic output", "Summary file layout"),
            ("--help-topic examples", "Usage examples"),
        ];

        for (command, description) in help_topics {
            if use_colors {
                footer.push_str(&format!("  {}: {}\n", command.bright_yellow(), description.white()));
            } else {
                footer.push_str(&format!("  {}: {}\n", command, description));
            }
        }

        footer
    }

    /// Format detailed configuration help
    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.heading("CONFIGURATION REFERENCE:", use_colors));

        help.push_str("CONFIGURATION PRIORITY (highest to lowest):\n");
        help.push_str("1. Command-line arguments\n");
        help.push_str("2. Environment variables\n");
        help.push_str("3. .env file in the working directory\n");
        help.push_str("4. Default values\n\n");

        help.push_str("VARIABLES:\n");
        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n  {:<18} e.g. {}\n", var_name, description, "", example));
        }

        help.push_str("\nEXAMPLE .env FILE:\n");
        for (var_name, _, example) in EnvManager::get_supported_env_vars() {
            help.push_str(&format!("  {}={}\n", var_name, example));
        }

        help
    }

    /// Format manifest help
    fn format_manifest_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.heading("MANIFEST FORMAT:", use_colors));

        help.push_str("A manifest is a JSON list of groups; each group lists input files with\n");
        help.push_str("the parameters they were simulated with. `packets` defaults to 10 and\n");
        help.push_str("`requesters` to 4 when omitted.\n\n");
        help.push_str("  {\n");
        help.push_str("    \"groups\": [\n");
        help.push_str("      { \"name\": \"mobility\",\n");
        help.push_str("        \"inputs\": [ { \"file\": \"centralized_mobile_0.txt\", \"packets\": 10, \"requesters\": 4 } ] }\n");
        help.push_str("    ]\n");
        help.push_str("  }\n\n");

        help.push_str("BUILT-IN TABLE (used without --manifest):\n");
        help.push_str("  mobility    centralized_mobile_{0,25,50,100}.txt\n");
        help.push_str("  requesters  centralized_requesters_{1,2,4,8,16,24,32}.txt, requesters = N\n");
        help.push_str("  services    centralized_services_{1,2,4,8}.txt\n");
        help.push_str("  packets     centralized_packets_{10,20,40,60}.txt, packets = N\n");

        help
    }

    /// Format input file help
    fn format_input_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.heading("RESULTS FILE FORMAT:", use_colors));

        help.push_str("One block per simulation run: one line per requester, then a control line.\n\n");
        help.push_str("  time|success|found|packets     (repeated `requesters` times)\n");
        help.push_str("  control_bytes\n\n");
        help.push_str("- time: time until the first data packet; negative when no data arrived\n");
        help.push_str("- success: 1 when the best provider was found\n");
        help.push_str("- found: 1 when any provider was found\n");
        help.push_str("- packets: data packets received\n");
        help.push_str("- control_bytes: control traffic of the whole run\n\n");
        help.push_str("Lines after the last control line are ignored with a warning.\n");

        help
    }

    /// Format output file help
    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", self.heading("SUMMARY FILE FORMAT:", use_colors));

        help.push_str("Two lines per input file, four decimals per field:\n\n");
        help.push_str("  ci_time|ci_success|ci_found|ci_packets|ci_overhead\n");
        help.push_str("  time|success|found|packets|overhead\n\n");
        help.push_str("The first line holds 95% confidence half-widths (1.96 * sd / sqrt(n)),\n");
        help.push_str("the second the means. success, found and packets are percentages;\n");
        help.push_str("overhead is control bytes per data byte. An empty line separates groups.\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = String::new();

        if let Some(short) = self.short {
            if use_colors {
                option_str.push_str(&format!("  {}, ", format!("-{}", short).bright_cyan()));
            } else {
                option_str.push_str(&format!("  -{}, ", short));
            }
        } else {
            option_str.push_str("      ");
        }

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<24} {}",
                long_with_value.bright_cyan(),
                self.description.white()
            ));
        } else {
            option_str.push_str(&format!("{:<24} {}", long_with_value, self.description));
        }

        if let Some(example) = self.example {
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(31),
                    format!("Example: {}", example).bright_blue().italic()
                ));
            } else {
                option_str.push_str(&format!("\n{}Example: {}", " ".repeat(31), example));
            }
        }

        option_str
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n",
                self.title, self.command, self.description
            )
        }
    }
}
