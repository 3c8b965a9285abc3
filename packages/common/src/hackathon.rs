#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of a hackathon as chosen by its organizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")
)]
pub enum HackathonKind {
    /// Team Hackathon (offline).
    #[serde(rename = "team-offline")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "team-offline"))]
    TeamOffline,
    /// Virtual Solo Hackathon (online).
    #[serde(rename = "virtual-solo-online")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "virtual-solo-online"))]
    VirtualSoloOnline,
}

impl HackathonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamOffline => "team-offline",
            Self::VirtualSoloOnline => "virtual-solo-online",
        }
    }
}

impl fmt::Display for HackathonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a hackathon still lies ahead. Always derived, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HackathonPhase {
    Upcoming,
    Conducted,
}

impl HackathonPhase {
    /// Phase of an event held on `date`, as seen at `now`.
    ///
    /// The event instant is midnight UTC of its date; an event is upcoming
    /// while that instant is not yet in the past.
    pub fn at(date: NaiveDate, now: DateTime<Utc>) -> Self {
        if event_instant(date) >= now {
            Self::Upcoming
        } else {
            Self::Conducted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Conducted => "conducted",
        }
    }
}

impl fmt::Display for HackathonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Midnight UTC at the start of `date`.
pub fn event_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
