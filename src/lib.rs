//! Vessel notification formatting.
//!
//! Formatting core shared by the vessel-monitoring clients:
//!
//! - [`geo`]: decimal degrees to degrees/minutes/seconds, verbose and compact
//! - [`timefmt`]: Vietnamese-locale timestamps and "time ago" labels
//! - [`template`]: `{{token}}` substitution into notification templates
//! - [`notification_type`]: type lookup against a read-only snapshot
//! - [`message`]: puts the above together for one notification
//!
//! plus a thin [`api`] client and the command-line shell.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use vessel_notify::model::Notification;
//! use vessel_notify::template::{render, RenderContext};
//!
//! let notification = Notification {
//!     kind: "MKN_OVER_6H".to_string(),
//!     ship_code: Some("BV-99999-TS".to_string()),
//!     lat: Some(6.17),
//!     lng: Some(105.9067),
//!     ..Notification::default()
//! };
//! let ctx = RenderContext::new(Utc.with_ymd_and_hms(2025, 2, 10, 12, 0, 0).unwrap());
//! let text = render("Tàu {{vesselCode}} tại {{location}}", &notification, &ctx);
//! assert_eq!(text, "Tàu <b>BV-99999-TS</b> tại <b>06°10'12\"N105°54'24\"E</b>");
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geo;
pub mod message;
pub mod model;
pub mod notification_type;
pub mod template;
pub mod timefmt;

pub use error::{Error, Result};
