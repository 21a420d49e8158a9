//! Command-line interface definitions.
//!
//! This module defines the CLI structure using `clap` derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main CLI structure for vessel-notify.
#[derive(Parser, Debug)]
#[command(
    name = "vessel-notify",
    version,
    about = "Format vessel-monitoring notifications and coordinates"
)]
pub struct Cli {
    /// API base URL (overrides VESSEL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// API bearer token (overrides VESSEL_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a decimal latitude/longitude pair to degrees, minutes, seconds
    Dms {
        /// Latitude in decimal degrees (e.g. 6.17)
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees (e.g. 105.9067)
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        /// Zero-padded, rounded seconds (message style)
        #[arg(long)]
        compact: bool,
    },
    /// Print how long ago a timestamp was
    Ago {
        /// RFC 3339 or "YYYY-MM-DD HH:MM:SS" (UTC) timestamp
        timestamp: String,
        /// Escalate to days after 24 hours
        #[arg(long)]
        days: bool,
    },
    /// Render one notification from a JSON file
    Render {
        /// Template text; defaults to the template of the notification's type
        #[arg(long)]
        template: Option<String>,
        /// Notification record (JSON)
        #[arg(long)]
        notification: PathBuf,
        /// Notification type list (JSON array)
        #[arg(long)]
        types: Option<PathBuf>,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Fetch and print the notification inbox from the API
    Inbox {
        /// First page to print (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Notifications per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        /// Keep loading pages until the inbox is exhausted
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Poll the inbox and print notifications as they arrive
    Watch {
        /// Polling interval in seconds (default: 60s)
        #[arg(long, default_value_t = 60)]
        interval: u64,
        /// Notifications fetched per poll
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        #[command(flatten)]
        style: StyleArgs,
    },
}

/// Options shared by the commands that render messages.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Show timestamps as "time ago" instead of local date and time
    #[arg(long)]
    pub relative: bool,
    /// With --relative, escalate to days after 24 hours
    #[arg(long)]
    pub days: bool,
    /// Show seconds in absolute timestamps
    #[arg(long)]
    pub seconds: bool,
    /// Show locations with fractional seconds
    #[arg(long)]
    pub verbose_location: bool,
    /// Replace unknown {{tokens}} with an empty value instead of keeping them
    #[arg(long)]
    pub blank_unknown: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dms_with_negative_values() {
        let cli = Cli::try_parse_from(["vessel-notify", "dms", "-6.17", "-105.9", "--compact"]).unwrap();
        match cli.command {
            Commands::Dms { lat, lng, compact } => {
                assert_eq!(lat, -6.17);
                assert_eq!(lng, -105.9);
                assert!(compact);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_render_with_style_flags() {
        let cli = Cli::try_parse_from([
            "vessel-notify",
            "render",
            "--notification",
            "n.json",
            "--types",
            "types.json",
            "--relative",
            "--blank-unknown",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { template, notification, types, style } => {
                assert!(template.is_none());
                assert_eq!(notification, PathBuf::from("n.json"));
                assert_eq!(types, Some(PathBuf::from("types.json")));
                assert!(style.relative);
                assert!(style.blank_unknown);
                assert!(!style.days);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_api_flags() {
        let cli = Cli::try_parse_from(["vessel-notify", "inbox", "--all", "--api-url", "http://x/api"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));
        match cli.command {
            Commands::Inbox { page, per_page, all, .. } => {
                assert_eq!(page, 1);
                assert_eq!(per_page, 20);
                assert!(all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_render_requires_notification() {
        assert!(Cli::try_parse_from(["vessel-notify", "render"]).is_err());
    }
}
