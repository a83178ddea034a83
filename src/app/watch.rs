//! Watch-state resolution: release tier, episode availability, airing
//! countdown, and the single recommended next action.

use super::media::{MediaFormat, MediaRecord};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseTier {
    Finished,
    Releasing,
    Upcoming,
    Discontinued,
    Unknown,
}

pub(crate) fn classify(raw_status: Option<&str>) -> ReleaseTier {
    let Some(raw) = raw_status else {
        return ReleaseTier::Unknown;
    };
    match raw.trim().to_ascii_uppercase().as_str() {
        "FINISHED" => ReleaseTier::Finished,
        "RELEASING" => ReleaseTier::Releasing,
        "NOT_YET_RELEASED" => ReleaseTier::Upcoming,
        "CANCELLED" | "HIATUS" => ReleaseTier::Discontinued,
        _ => ReleaseTier::Unknown,
    }
}

impl ReleaseTier {
    /// `None` for the neutral tier: it renders no badge.
    pub(crate) fn label(self) -> Option<&'static str> {
        match self {
            Self::Finished => Some("Finished"),
            Self::Releasing => Some("Releasing"),
            Self::Upcoming => Some("Upcoming"),
            Self::Discontinued => Some("Discontinued"),
            Self::Unknown => None,
        }
    }

    pub(crate) fn icon(self) -> Option<Icon> {
        match self {
            Self::Finished => Some(Icon::CircleCheck),
            Self::Releasing => Some(Icon::CircleDot),
            Self::Upcoming => Some(Icon::Clock),
            Self::Discontinued => Some(Icon::Ban),
            Self::Unknown => None,
        }
    }

    /// Finished renders in the default foreground, so it carries no tint.
    pub(crate) fn tint(self) -> Option<Tint> {
        match self {
            Self::Releasing => Some(Tint::Success),
            Self::Upcoming => Some(Tint::Alert),
            Self::Discontinued => Some(Tint::Warning),
            Self::Finished | Self::Unknown => None,
        }
    }
}

/// Symbolic icon tags; the rendering layer maps each to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Icon {
    Play,
    Rotate,
    Hourglass,
    CircleCheck,
    CircleDot,
    Clock,
    Ban,
    Film,
    Stopwatch,
    ChevronDown,
    ChevronUp,
}

/// Symbolic color tags; actual colors belong to the rendering theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tint {
    Success,
    Alert,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Availability {
    pub(crate) total: Option<u32>,
    pub(crate) available: u32,
}

pub(crate) fn availability(
    format: MediaFormat,
    declared_total: Option<u32>,
    aired_so_far: u32,
) -> Availability {
    if format == MediaFormat::Movie {
        return Availability {
            total: Some(1),
            available: 1,
        };
    }
    // Stale schedules can report more aired episodes than the declared
    // total; availability never exceeds it.
    let available = match declared_total {
        Some(total) => aired_so_far.min(total),
        None => aired_so_far,
    };
    Availability {
        total: declared_total,
        available,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Countdown {
    pub(crate) days: u64,
    pub(crate) hours: u64,
    pub(crate) minutes: u64,
}

impl Countdown {
    pub(crate) fn label(&self) -> String {
        format!("{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

/// Remaining time until `next_airing`, truncated to whole minutes.
/// `None` once the timestamp has passed.
pub(crate) fn countdown_to(next_airing: i64, now: i64) -> Option<Countdown> {
    let delta = next_airing.saturating_sub(now);
    if delta <= 0 {
        return None;
    }
    Some(Countdown {
        days: (delta / SECS_PER_DAY) as u64,
        hours: ((delta % SECS_PER_DAY) / SECS_PER_HOUR) as u64,
        minutes: ((delta % SECS_PER_HOUR) / SECS_PER_MINUTE) as u64,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatchAction {
    Start { episode: u32 },
    Replay { episode: u32 },
    Resume { episode: u32 },
    AwaitNext(Countdown),
    Disabled,
}

impl WatchAction {
    pub(crate) fn label(&self) -> String {
        match self {
            Self::Start { .. } | Self::Disabled => "Watch now".to_string(),
            Self::Replay { .. } => "Watch again".to_string(),
            Self::Resume { episode } => format!("Resume from Ep. {episode}"),
            Self::AwaitNext(countdown) => countdown.label(),
        }
    }

    pub(crate) fn icon(&self) -> Icon {
        match self {
            Self::Start { .. } | Self::Resume { .. } | Self::Disabled => Icon::Play,
            Self::Replay { .. } => Icon::Rotate,
            Self::AwaitNext(_) => Icon::Hourglass,
        }
    }

    pub(crate) fn target_episode(&self) -> Option<u32> {
        match self {
            Self::Start { episode } | Self::Replay { episode } | Self::Resume { episode } => {
                Some(*episode)
            }
            Self::AwaitNext(_) | Self::Disabled => None,
        }
    }
}

/// Picks the one recommended action. First match wins:
/// no capability, nothing watched, fully watched, caught up with a
/// scheduled release, and resume as the fallback.
pub(crate) fn resolve(
    progress: u32,
    availability: Availability,
    tier: ReleaseTier,
    countdown: Option<Countdown>,
    can_watch: bool,
) -> WatchAction {
    if !can_watch {
        return WatchAction::Disabled;
    }
    if progress == 0 {
        return WatchAction::Start { episode: 1 };
    }
    if let Some(total) = availability.total
        && progress >= total
    {
        return WatchAction::Replay { episode: 1 };
    }
    // A countdown only means something while the release is ongoing.
    let countdown = countdown.filter(|_| tier == ReleaseTier::Releasing);
    if progress >= availability.available
        && let Some(countdown) = countdown
    {
        return WatchAction::AwaitNext(countdown);
    }
    WatchAction::Resume {
        episode: progress.saturating_add(1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WatchState {
    pub(crate) tier: ReleaseTier,
    pub(crate) availability: Availability,
    pub(crate) countdown: Option<Countdown>,
    pub(crate) action: WatchAction,
}

pub(crate) fn resolve_record(record: &MediaRecord, now: i64, can_watch: bool) -> WatchState {
    let tier = record.tier();
    let availability = availability(record.format, record.episodes, record.aired_count(now));
    let countdown = match tier {
        ReleaseTier::Releasing => record
            .next_airing(now)
            .and_then(|entry| countdown_to(entry.airs_at, now)),
        _ => None,
    };
    let action = resolve(record.progress, availability, tier, countdown, can_watch);
    WatchState {
        tier,
        availability,
        countdown,
        action,
    }
}

pub(crate) fn episode_summary(
    format: MediaFormat,
    duration_minutes: Option<u32>,
    tier: ReleaseTier,
    availability: Availability,
) -> String {
    if format == MediaFormat::Movie {
        return match duration_minutes {
            Some(minutes) => format!("{minutes} Minutes"),
            None => "Movie".to_string(),
        };
    }
    if tier == ReleaseTier::Releasing {
        let total_text = availability
            .total
            .map(|total| total.to_string())
            .unwrap_or_else(|| "?".to_string());
        format!("{} / {total_text} Episodes", availability.available)
    } else {
        format!("{} Episodes", availability.available)
    }
}

pub(crate) fn progress_summary(progress: u32, availability: Availability) -> String {
    match availability.total {
        Some(total) => format!("{}/{total}", progress.min(total)),
        None => format!("{progress}/?"),
    }
}

pub(crate) fn build_progress_gauge(progress: u32, availability: Availability) -> Option<(f64, String)> {
    let total = availability.total.filter(|total| *total > 0)?;
    let shown = progress.min(total);
    let ratio = (f64::from(shown) / f64::from(total)).clamp(0.0, 1.0);
    Some((ratio, format!("{shown}/{total}")))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
