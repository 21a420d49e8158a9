//! Command execution logic.
//!
//! This module contains the execution logic for all CLI commands:
//! - Coordinate and relative-time conversions
//! - Rendering a single notification from JSON files
//! - Printing the inbox fetched from the API
//! - Watching the inbox with polling

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use crate::api::{Paginator, PlatformClient};
use crate::cli::{Cli, Commands, StyleArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{self, Axis, DmsStyle};
use crate::message::{FormattedMessage, MessageFormatter};
use crate::model::{Notification, NotificationType};
use crate::notification_type::NotificationTypeSnapshot;
use crate::template::{self, RenderContext, UnknownTokenPolicy};
use crate::timefmt::{self, AbsoluteFormat, Clock, RelativeTiers, SystemClock, TimestampStyle};

/// Executes the CLI command specified in the parsed arguments.
///
/// # Errors
///
/// Returns an error if configuration is invalid, an input file cannot be read
/// or parsed, or an API request fails.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.api_url, cli.token);

    match cli.command {
        Commands::Dms { lat, lng, compact } => {
            let style = if compact { DmsStyle::Compact } else { DmsStyle::Verbose };
            println!("Latitude:  {}", geo::to_dms(Some(lat), Axis::Latitude, style));
            println!("Longitude: {}", geo::to_dms(Some(lng), Axis::Longitude, style));
            println!("Location:  {}", geo::format_location(Some(lat), Some(lng), style));
        }
        Commands::Ago { timestamp, days } => {
            if timefmt::parse_timestamp(&timestamp).is_none() {
                return Err(Error::Input(format!("unrecognized timestamp: {timestamp}")));
            }
            let tiers = if days { RelativeTiers::MinutesHoursDays } else { RelativeTiers::MinutesHours };
            println!("{}", timefmt::format_relative(Some(&timestamp), SystemClock.now(), tiers));
        }
        Commands::Render {
            template,
            notification,
            types,
            style,
        } => {
            let ctx = render_context(&style, &config, &SystemClock);
            let output = render_file(template.as_deref(), &notification, types.as_deref(), &ctx)?;
            println!("{output}");
        }
        Commands::Inbox {
            page,
            per_page,
            all,
            style,
        } => {
            let client = PlatformClient::new(&config.api_url, config.api_token.clone());
            let snapshot = load_snapshot(&client).await?;
            let ctx = render_context(&style, &config, &SystemClock);
            let formatter = MessageFormatter::new(&snapshot, ctx);
            let header = absolute_format(&style, &config);
            let per_page = per_page.max(1);

            if all {
                let mut inbox = Paginator::new(per_page);
                while inbox.has_more() {
                    inbox.load_more(&client).await?;
                }
                print_inbox(&formatter, &header, inbox.items());
            } else {
                let page = client.fetch_notifications(page, per_page).await?;
                print_inbox(&formatter, &header, &page.items);
            }
        }
        Commands::Watch {
            interval,
            per_page,
            style,
        } => {
            let client = PlatformClient::new(&config.api_url, config.api_token.clone());
            let snapshot = load_snapshot(&client).await?;
            println!("Watching {} every {interval}s...", client.base_url());

            let header = absolute_format(&style, &config);
            let mut ticker = time::interval(Duration::from_secs(interval.max(1)));
            let mut seen: HashSet<String> = HashSet::new();

            loop {
                ticker.tick().await;
                match client.fetch_notifications(1, per_page).await {
                    Ok(page) => {
                        let formatter = MessageFormatter::new(&snapshot, render_context(&style, &config, &SystemClock));
                        let (fresh, keys) = unseen(&page.items, &seen);
                        for n in fresh {
                            print_message(n, &formatter.format(n), &header);
                        }
                        seen = keys;
                    }
                    Err(e) => {
                        log::error!("Inbox poll failed: {}", e);
                        eprintln!("[{}] Error: {e}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Absolute timestamp format for the configured offset and `--seconds`.
pub fn absolute_format(style: &StyleArgs, config: &Config) -> AbsoluteFormat {
    AbsoluteFormat {
        utc_offset_secs: config.utc_offset_secs,
        with_seconds: style.seconds,
    }
}

/// Builds render options from command-line style flags.
pub fn render_context(style: &StyleArgs, config: &Config, clock: &impl Clock) -> RenderContext {
    let timestamp = if style.relative {
        TimestampStyle::Relative(if style.days {
            RelativeTiers::MinutesHoursDays
        } else {
            RelativeTiers::MinutesHours
        })
    } else {
        TimestampStyle::Absolute(absolute_format(style, config))
    };

    RenderContext {
        timestamp,
        location: if style.verbose_location { DmsStyle::Verbose } else { DmsStyle::Compact },
        unknown_tokens: if style.blank_unknown {
            UnknownTokenPolicy::Blank
        } else {
            UnknownTokenPolicy::Preserve
        },
        ..RenderContext::from_clock(clock)
    }
}

/// Renders the notification stored at `notification_path`.
///
/// An explicit `template` wins; otherwise the template is resolved from the
/// type list at `types_path`. Without either, the raw content is returned.
pub fn render_file(
    template: Option<&str>,
    notification_path: &Path,
    types_path: Option<&Path>,
    ctx: &RenderContext,
) -> Result<String> {
    let notification: Notification = read_json(notification_path)?;

    if let Some(tpl) = template {
        return Ok(template::render(tpl, &notification, ctx));
    }

    let types: Vec<NotificationType> = match types_path {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let snapshot = NotificationTypeSnapshot::from_types(types);
    Ok(MessageFormatter::new(&snapshot, *ctx).format(&notification).body)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    log::debug!("Reading JSON file={}", path.display());
    let data = fs::read_to_string(path).map_err(|e| {
        log::error!("Failed to read file={}: {}", path.display(), e);
        Error::Io(e)
    })?;
    serde_json::from_str(&data).map_err(|e| {
        log::error!("Failed to parse JSON file={}: {}", path.display(), e);
        Error::Json(e)
    })
}

/// Fetches the notification types once for this session.
///
/// Authorization failures are returned. Any other failure degrades to an
/// empty snapshot, so messages show their raw content.
async fn load_snapshot(client: &PlatformClient) -> Result<NotificationTypeSnapshot> {
    match client.fetch_notification_types().await {
        Ok(types) => Ok(NotificationTypeSnapshot::from_types(types)),
        Err(e @ Error::Status { status: 401 | 403, .. }) => Err(e),
        Err(e) => {
            log::warn!("Notification types unavailable, showing raw content: {}", e);
            Ok(NotificationTypeSnapshot::default())
        }
    }
}

/// Splits a freshly polled page against the keys seen on the previous poll.
///
/// Returns the unseen notifications oldest first, so the terminal reads
/// chronologically, and the key set to remember for the next poll. Only the
/// current page's keys are kept: a record that left the page does not return.
fn unseen<'a>(page: &'a [Notification], seen: &HashSet<String>) -> (Vec<&'a Notification>, HashSet<String>) {
    let keys: HashSet<String> = page.iter().map(Notification::key).collect();
    let fresh = page.iter().rev().filter(|n| !seen.contains(&n.key())).collect();
    (fresh, keys)
}

fn print_inbox(formatter: &MessageFormatter<'_>, header: &AbsoluteFormat, notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }
    for n in notifications {
        print_message(n, &formatter.format(n), header);
    }
}

/// Prints one formatted notification as plain text.
///
/// ```text
/// [07:30 10/02/2025] Mất kết nối trên 6 giờ (BV-99999-TS)
///   Tàu BV-99999-TS mất kết nối từ 07:30 10/02/2025 tại 06°10'12"N105°54'24"E
/// ```
fn print_message(notification: &Notification, message: &FormattedMessage, header: &AbsoluteFormat) {
    println!("{}", message_line(notification, message, header));
}

fn message_line(notification: &Notification, message: &FormattedMessage, when_format: &AbsoluteFormat) -> String {
    let when = timefmt::format_absolute(notification.occurred_at.as_deref(), when_format);
    let mut header = format!("[{when}] {}", message.display.title);
    if let Some(ship) = notification.ship_code.as_deref().filter(|s| !s.is_empty()) {
        header.push_str(&format!(" ({ship})"));
    }

    let mut actions = Vec::new();
    if message.display.forms.allows_position_report() {
        actions.push("khai báo vị trí");
    }
    if message.display.forms.allows_port_arrival() {
        actions.push("khai báo cập cảng");
    }

    let mut line = format!("{header}\n  {}", message.plain_body());
    if !actions.is_empty() {
        line.push_str(&format!("\n  → {}", actions.join(", ")));
    }
    line
}
