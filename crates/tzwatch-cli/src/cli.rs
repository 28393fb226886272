//! Command handlers
//!
//! Each handler converts its clap arguments into core parameters, runs the
//! query through the [`Survey`], and prints either markdown or JSON.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use tzwatch_core::{
    params::{GroupOffsets, ListTransitions, NextTransition},
    CancelToken, EpochMillis, Survey, Transition, ZoneFormatter,
};

use crate::{
    args::{GroupsArgs, NextArgs, TransitionsArgs},
    display, renderer::TerminalRenderer,
};

/// JSON shape of `tzwatch next`.
#[derive(Serialize)]
struct NextOutput<'a> {
    zone: &'a str,
    origin: EpochMillis,
    horizon_months: u32,
    transition: Option<Transition>,
}

/// JSON shape of `tzwatch transitions`.
#[derive(Serialize)]
struct TransitionsOutput<'a> {
    zone: &'a str,
    transitions: &'a [Transition],
}

pub struct Cli {
    survey: Survey,
    renderer: TerminalRenderer,
    json: bool,
}

impl Cli {
    pub fn new(survey: Survey, renderer: TerminalRenderer, json: bool) -> Self {
        Self {
            survey,
            renderer,
            json,
        }
    }

    fn formatter(&self, zone: &str) -> Result<ZoneFormatter> {
        match self.survey.registry().get(zone) {
            Some(formatter) => Ok(formatter.clone()),
            None => ZoneFormatter::new(zone).with_context(|| format!("Cannot scan '{zone}'")),
        }
    }

    /// Groups zones by current offset; Ctrl-C stops between zones.
    pub async fn groups(&self, args: GroupsArgs) -> Result<()> {
        let params: GroupOffsets = args.into();
        let cancel = CancelToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, stopping after the current zone");
                on_interrupt.cancel();
            }
        });

        let report = self
            .survey
            .group(&params, &cancel)
            .await
            .context("Failed to group zones")?;
        debug!(
            "{} groups, {} zones, {} failures",
            report.groups.len(),
            report.views.len(),
            report.failures.len()
        );

        if self.json {
            self.renderer.render_json(&report)
        } else {
            let markdown = display::render_groups(&report, self.survey.registry())
                .context("Failed to format report")?;
            self.renderer.render(&markdown)
        }
    }

    /// Shows the next transition of a single zone.
    pub async fn next(&self, args: NextArgs) -> Result<()> {
        let params: NextTransition = args.into();
        let origin = params.resolved_origin();
        let params = NextTransition {
            origin: Some(origin),
            ..params
        };
        let transition = self
            .survey
            .next(&params)
            .await
            .with_context(|| format!("Failed to scan '{}'", params.zone))?;

        if self.json {
            return self.renderer.render_json(&NextOutput {
                zone: &params.zone,
                origin,
                horizon_months: params.horizon_months,
                transition,
            });
        }
        let formatter = self.formatter(&params.zone)?;
        let markdown = display::render_next(
            &formatter,
            origin,
            params.horizon_months,
            transition.as_ref(),
        )?;
        self.renderer.render(&markdown)
    }

    /// Lists the transitions of a single zone in a range.
    pub async fn transitions(&self, args: TransitionsArgs) -> Result<()> {
        let params: ListTransitions = args.into();
        let transitions = self
            .survey
            .transitions(&params)
            .await
            .with_context(|| format!("Failed to scan '{}'", params.zone))?;

        if self.json {
            return self.renderer.render_json(&TransitionsOutput {
                zone: &params.zone,
                transitions: &transitions,
            });
        }
        let formatter = self.formatter(&params.zone)?;
        let markdown = display::render_transitions(&formatter, &transitions)?;
        self.renderer.render(&markdown)
    }

    /// Lists every registered zone.
    pub fn zones(&self) -> Result<()> {
        if self.json {
            let zones: Vec<_> = self.survey.registry().zones().collect();
            return self.renderer.render_json(&zones);
        }
        let markdown = display::render_zones(self.survey.registry())?;
        self.renderer.render(&markdown)
    }
}
