use async_trait::async_trait;
use chrono::{Local, Timelike};
use clap::{Subcommand, ValueEnum};

use procure_app::{DeviceNotifier, NotificationCenter, NotifierError};
use procure_core::config::AppConfig;
use procure_core::notifications::{NotificationCategory, QuietHours};

use super::Context;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CategoryArg {
    RequestUpdates,
    Approvals,
    Purchasing,
    System,
}

impl From<CategoryArg> for NotificationCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::RequestUpdates => Self::RequestUpdates,
            CategoryArg::Approvals => Self::Approvals,
            CategoryArg::Purchasing => Self::Purchasing,
            CategoryArg::System => Self::System,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NotifyAction {
    #[command(about = "Show the current notification preferences")]
    Show,
    #[command(about = "Enable or disable push for a category")]
    Push {
        #[arg(value_enum)]
        category: CategoryArg,
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    #[command(about = "Enable or disable email for a category")]
    Email {
        #[arg(value_enum)]
        category: CategoryArg,
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    #[command(about = "Set or clear the quiet-hours window (local time)")]
    QuietHours {
        #[arg(long, help = "Window start, HH:MM", requires = "end")]
        start: Option<String>,
        #[arg(long, help = "Window end, HH:MM; may wrap past midnight")]
        end: Option<String>,
        #[arg(long, conflicts_with_all = ["start", "end"])]
        off: bool,
    },
    #[command(about = "Send a test notification through the device channel")]
    Test {
        #[arg(value_enum, default_value = "system")]
        category: CategoryArg,
    },
}

/// Terminal stand-in for the platform notification API.
struct ConsoleNotifier;

#[async_trait]
impl DeviceNotifier for ConsoleNotifier {
    async fn permission_granted(&self) -> Result<bool, NotifierError> {
        Ok(true)
    }

    async fn request_permission(&self) -> Result<bool, NotifierError> {
        Ok(true)
    }

    async fn send_local(&self, title: &str, body: &str) -> Result<(), NotifierError> {
        println!("[notification] {title}: {body}");
        Ok(())
    }

    async fn clear_badge(&self) -> Result<(), NotifierError> {
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), NotifierError> {
        Ok(())
    }
}

fn parse_minute(raw: &str) -> anyhow::Result<u16> {
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("expected HH:MM, got `{raw}`"))?;
    let hours: u16 = hours.parse()?;
    let minutes: u16 = minutes.parse()?;
    if hours > 23 || minutes > 59 {
        anyhow::bail!("expected HH:MM, got `{raw}`");
    }
    Ok(hours * 60 + minutes)
}

fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

pub async fn run(config: AppConfig, action: NotifyAction) -> anyhow::Result<()> {
    let ctx = Context::init(config).await?;
    let mut center = NotificationCenter::load(&ctx.storage).await?;

    match action {
        NotifyAction::Show => {
            for category in NotificationCategory::ALL {
                let toggles = center.preferences().toggles(category);
                println!(
                    "{:<16} push: {:<3} email: {}",
                    category.label(),
                    if toggles.push { "on" } else { "off" },
                    if toggles.email { "on" } else { "off" },
                );
            }
            let quiet = &center.preferences().quiet_hours;
            if quiet.enabled {
                println!(
                    "quiet hours: {} to {}",
                    format_minute(quiet.start_minute),
                    format_minute(quiet.end_minute),
                );
            } else {
                println!("quiet hours: off");
            }
        }
        NotifyAction::Push { category, on, off } => {
            let enabled = on || !off;
            center.set_push(category.into(), enabled);
            center.persist(&ctx.storage).await?;
            println!(
                "push {} for {}",
                if enabled { "enabled" } else { "disabled" },
                NotificationCategory::from(category).label(),
            );
        }
        NotifyAction::Email { category, on, off } => {
            let enabled = on || !off;
            center.set_email(category.into(), enabled);
            center.persist(&ctx.storage).await?;
            println!(
                "email {} for {}",
                if enabled { "enabled" } else { "disabled" },
                NotificationCategory::from(category).label(),
            );
        }
        NotifyAction::QuietHours { start, end, off } => {
            if off {
                center.set_quiet_hours(QuietHours::default());
                center.persist(&ctx.storage).await?;
                println!("quiet hours disabled");
            } else {
                let (Some(start), Some(end)) = (start, end) else {
                    anyhow::bail!("pass --start and --end, or --off");
                };
                let quiet = QuietHours {
                    enabled: true,
                    start_minute: parse_minute(&start)?,
                    end_minute: parse_minute(&end)?,
                };
                center.set_quiet_hours(quiet);
                center.persist(&ctx.storage).await?;
                println!("quiet hours set: {start} to {end}");
            }
        }
        NotifyAction::Test { category } => {
            let now = Local::now();
            let minute_of_day = (now.hour() * 60 + now.minute()) as u16;
            let device = ConsoleNotifier;
            if center.send_test(&device, category.into(), minute_of_day).await? {
                println!("test notification sent");
            } else {
                println!("suppressed by preferences or quiet hours");
            }
        }
    }

    Ok(())
}
