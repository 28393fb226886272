//! Command-line interface definitions using clap
//!
//! Each subcommand has its own argument struct with clap derives and a `From`
//! conversion into the matching core parameter type, keeping clap out of
//! `tzwatch-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Survey
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand};
use jiff::Timestamp;
use tzwatch_core::params::{
    GroupOffsets, ListTransitions, NextTransition, DEFAULT_HORIZON_MONTHS,
};

/// Show current UTC offsets and upcoming offset transitions for IANA time zones
///
/// tzwatch locates the exact instants at which a zone's offset from UTC
/// changes, groups zones that currently share an offset, and tells when each
/// zone changes next.
#[derive(Parser)]
#[command(version, about, name = "tzwatch")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the tzwatch CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Group zones by their current offset and show each zone's next change
    #[command(alias = "g")]
    Groups(GroupsArgs),
    /// Show the next offset change of one zone
    #[command(alias = "n")]
    Next(NextArgs),
    /// List every offset change of one zone in a range
    #[command(alias = "t")]
    Transitions(TransitionsArgs),
    /// List the zones known to the bundled time zone database
    Zones,
}

/// Group zones by their current offset
#[derive(ClapArgs)]
pub struct GroupsArgs {
    /// Reference instant (RFC 3339); defaults to now rounded down to 5 minutes
    #[arg(long, help = "Reference instant, e.g. 2024-03-01T12:00:00Z")]
    pub origin: Option<Timestamp>,
    /// How many months ahead to look for the next transition
    #[arg(long, default_value_t = DEFAULT_HORIZON_MONTHS)]
    pub months: u32,
    /// Restrict the output to these zones (repeatable)
    #[arg(short, long = "zone", value_name = "ZONE")]
    pub zones: Vec<String>,
}

impl Default for GroupsArgs {
    fn default() -> Self {
        Self {
            origin: None,
            months: DEFAULT_HORIZON_MONTHS,
            zones: Vec::new(),
        }
    }
}

impl From<GroupsArgs> for GroupOffsets {
    fn from(val: GroupsArgs) -> Self {
        GroupOffsets {
            origin: val.origin.map(|t| t.as_millisecond()),
            horizon_months: val.months,
            zones: (!val.zones.is_empty()).then_some(val.zones),
        }
    }
}

/// Show the next offset change of a zone
#[derive(ClapArgs)]
pub struct NextArgs {
    /// IANA zone name
    #[arg(help = "IANA zone name, e.g. Europe/Paris")]
    pub zone: String,
    /// Reference instant (RFC 3339); defaults to now rounded down to 5 minutes
    #[arg(long)]
    pub origin: Option<Timestamp>,
    /// How many months ahead to look
    #[arg(long, default_value_t = DEFAULT_HORIZON_MONTHS)]
    pub months: u32,
}

impl From<NextArgs> for NextTransition {
    fn from(val: NextArgs) -> Self {
        NextTransition {
            zone: val.zone,
            origin: val.origin.map(|t| t.as_millisecond()),
            horizon_months: val.months,
        }
    }
}

/// List the offset changes of a zone
#[derive(ClapArgs)]
pub struct TransitionsArgs {
    /// IANA zone name
    #[arg(help = "IANA zone name, e.g. America/New_York")]
    pub zone: String,
    /// Start of the range (RFC 3339); defaults to now
    #[arg(long)]
    pub from: Option<Timestamp>,
    /// End of the range (RFC 3339); defaults to about 14 months after --from
    #[arg(long)]
    pub until: Option<Timestamp>,
}

impl From<TransitionsArgs> for ListTransitions {
    fn from(val: TransitionsArgs) -> Self {
        ListTransitions {
            zone: val.zone,
            from: val.from.map(|t| t.as_millisecond()),
            until: val.until.map(|t| t.as_millisecond()),
        }
    }
}
