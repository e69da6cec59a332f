use clap::{Args, Subcommand, ValueEnum};

use shoplist::config::Config;
use shoplist::{Category, SortOption};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        let output = serde_json::json!({
                            "config": config,
                            "sort_options": SortOption::ALL
                                .iter()
                                .map(|o| serde_json::json!({"name": o.to_string(), "label": o.label()}))
                                .collect::<Vec<_>>(),
                            "categories": Category::ALL.iter().map(|c| c.name()).collect::<Vec<_>>(),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("database_path: {}", config.database_path.value.display());
                        println!("  source: {}", config.database_path.source);
                        println!();

                        println!(
                            "default_sort: {} ({})",
                            config.default_sort.value,
                            config.default_sort.value.label()
                        );
                        println!("  source: {}", config.default_sort.source);
                        println!("  options: {}", sort_choices());
                        println!();

                        println!("categories: {}", category_choices());
                    }
                }
                Ok(())
            }
        }
    }
}

/// `alphabetical (Alphabetically), ...` for the sort setting help line
fn sort_choices() -> String {
    SortOption::ALL
        .iter()
        .map(|option| format!("{} ({})", option, option.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn category_choices() -> String {
    Category::ALL
        .iter()
        .map(|category| category.name())
        .collect::<Vec<_>>()
        .join(", ")
}
