use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "dialbook", bin_name = "dialbook", version = get_version())]
#[command(
    about = "Manage countries and phone prefixes on a remote collection service",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Service base URL (overrides config and DIALBOOK_BASE_URL)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub base_url: Option<String>,

    /// Run against built-in sample data instead of a server
    #[arg(long, global = true, help_heading = "Options")]
    pub demo: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with countries
    #[command(alias = "c", display_order = 1)]
    Country {
        #[command(subcommand)]
        action: CountryCommands,
    },

    /// Work with phone prefixes
    #[command(alias = "p", display_order = 2)]
    Prefix {
        #[command(subcommand)]
        action: PrefixCommands,
    },

    /// Get or set configuration
    #[command(display_order = 3)]
    Config {
        /// Configuration key (e.g., base-url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CountryFields {
    /// Country name
    #[arg(long)]
    pub name: Option<String>,

    /// International dialing code, e.g. +7
    #[arg(long)]
    pub phone_code: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CountryCommands {
    /// List all countries
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show one country as the service has it
    #[command(display_order = 2)]
    Show { code: String },

    /// Create a country
    #[command(alias = "n", display_order = 3)]
    Create {
        /// Country code, e.g. RU
        #[arg(long)]
        code: Option<String>,

        #[command(flatten)]
        fields: CountryFields,
    },

    /// Change a country's name or phone code (the code itself is fixed)
    #[command(alias = "e", display_order = 4)]
    Update {
        code: String,

        #[command(flatten)]
        fields: CountryFields,
    },

    /// Delete a country
    #[command(alias = "rm", display_order = 5)]
    Delete {
        code: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Find a country by code, name or phone code (no value lists all)
    #[command(display_order = 6)]
    Search { value: Option<String> },

    /// Create every country in a JSON array file
    #[command(display_order = 7)]
    Import { path: PathBuf },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PrefixFields {
    /// The dialing prefix, e.g. 495
    #[arg(long)]
    pub prefix: Option<String>,

    /// Code of the country the prefix belongs to
    #[arg(long)]
    pub country_code: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PrefixCommands {
    /// List all prefixes with their country names
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show one prefix as the service has it
    #[command(display_order = 2)]
    Show { id: i64 },

    /// Create a prefix
    #[command(alias = "n", display_order = 3)]
    Create {
        #[command(flatten)]
        fields: PrefixFields,
    },

    /// Change a prefix
    #[command(alias = "e", display_order = 4)]
    Update {
        id: i64,

        #[command(flatten)]
        fields: PrefixFields,
    },

    /// Delete a prefix
    #[command(alias = "rm", display_order = 5)]
    Delete {
        id: i64,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Filter prefixes by country (no filter lists all)
    #[command(display_order = 6)]
    Search {
        /// Country code to filter by
        #[arg(long, conflicts_with = "name")]
        code: Option<String>,

        /// Country name to filter by
        #[arg(long)]
        name: Option<String>,
    },
}

impl CountryFields {
    /// Only the flags that were given, as `(field, value)` pairs.
    pub fn pairs(&self, code: Option<&str>) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(code) = code {
            pairs.push(("code".to_string(), code.to_string()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name".to_string(), name.clone()));
        }
        if let Some(phone) = &self.phone_code {
            pairs.push(("phoneCode".to_string(), phone.clone()));
        }
        pairs
    }
}

impl PrefixFields {
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(prefix) = &self.prefix {
            pairs.push(("prefix".to_string(), prefix.clone()));
        }
        if let Some(code) = &self.country_code {
            pairs.push(("countryCode".to_string(), code.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_country_create() {
        let cli = Cli::try_parse_from([
            "dialbook",
            "country",
            "create",
            "--code",
            "RU",
            "--name",
            "Russia",
            "--phone-code",
            "+7",
        ])
        .unwrap();

        match cli.command {
            Commands::Country {
                action: CountryCommands::Create { code, fields },
            } => {
                assert_eq!(
                    fields.pairs(code.as_deref()),
                    vec![
                        ("code".to_string(), "RU".to_string()),
                        ("name".to_string(), "Russia".to_string()),
                        ("phoneCode".to_string(), "+7".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_only_carries_given_flags() {
        let cli =
            Cli::try_parse_from(["dialbook", "p", "update", "3", "--country-code", "DE"]).unwrap();
        match cli.command {
            Commands::Prefix {
                action: PrefixCommands::Update { id, fields },
            } => {
                assert_eq!(id, 3);
                assert_eq!(
                    fields.pairs(),
                    vec![("countryCode".to_string(), "DE".to_string())]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["dialbook", "country", "list", "--demo", "-v"]).unwrap();
        assert!(cli.demo);
        assert!(cli.verbose);
    }

    #[test]
    fn prefix_search_takes_one_filter() {
        assert!(Cli::try_parse_from([
            "dialbook", "prefix", "search", "--code", "RU", "--name", "Russia"
        ])
        .is_err());
    }

    #[test]
    fn prefix_ids_must_be_numbers() {
        assert!(Cli::try_parse_from(["dialbook", "prefix", "show", "abc"]).is_err());
    }
}
