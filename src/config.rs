use std::env::VarError;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::gate::Gate;

pub const GATE_ENV_VAR: &str = "MIGRATION_GATE";

const SEPARATOR: &str = "..";

/// Textual description of a gate: `<start>..<end>`, where each side is an
/// RFC 3339 instant or nothing at all.
///
/// ```text
/// 2026-10-18T00:00:00+02:00..2026-10-25T00:00:00+02:00
/// 2026-10-18T00:00:00Z..
/// ..2026-10-25T00:00:00Z
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct GateConfig {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}

fn parse_bound(s: &str, name: &str) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(s)
        .map(Some)
        .with_context(|| format!("Invalid gate {name}: {s:?}"))
}

impl GateConfig {
    pub fn try_from_str(s: &str) -> anyhow::Result<Self> {
        let (start, end) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| anyhow!("Missing {SEPARATOR:?} in gate {s:?}"))?;

        let start = parse_bound(start, "start")?;
        let end = parse_bound(end, "end")?;

        Ok(GateConfig { start, end })
    }

    /// Read the gate from the `MIGRATION_GATE` environment variable.
    /// When the variable is not set, the gate is empty.
    pub fn from_env_var() -> anyhow::Result<Self> {
        Self::from_named_env_var(GATE_ENV_VAR)
    }

    pub fn from_named_env_var(name: &str) -> anyhow::Result<Self> {
        match std::env::var(name) {
            Ok(s) => {
                let config =
                    GateConfig::try_from_str(&s).with_context(|| format!("Cannot parse {name}"))?;
                log::info!("Gate from {name}: {:?}", config);
                Ok(config)
            }
            Err(VarError::NotPresent) => {
                log::debug!("{name} not set, gate is empty");
                Ok(GateConfig::default())
            }
            Err(e) => Err(e).with_context(|| format!("Cannot read {name}")),
        }
    }

    pub fn apply_to<Tz: TimeZone>(&self, gate: &mut Gate<Tz>, tz: &Tz) {
        gate.set_gate(
            self.start.map(|x| x.with_timezone(tz)),
            self.end.map(|x| x.with_timezone(tz)),
        );
    }

    pub fn into_gate<Tz: TimeZone>(self, tz: &Tz) -> Gate<Tz> {
        let mut gate = Gate::new();
        self.apply_to(&mut gate, tz);
        gate
    }
}

impl FromStr for GateConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateConfig::try_from_str(s)
    }
}
