use serde_json::Value;

use super::watch::{ReleaseTier, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaFormat {
    Movie,
    Series,
    Unknown,
}

impl MediaFormat {
    pub(crate) fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        match raw.trim().to_ascii_uppercase().as_str() {
            "MOVIE" => Self::Movie,
            "TV" | "TV_SHORT" | "OVA" | "ONA" | "SPECIAL" | "MUSIC" | "SERIES" => Self::Series,
            _ => Self::Unknown,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
            Self::Unknown => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AiringEntry {
    pub(crate) episode: u32,
    /// Epoch seconds.
    pub(crate) airs_at: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct MediaRecord {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) format: MediaFormat,
    pub(crate) episodes: Option<u32>,
    pub(crate) duration_minutes: Option<u32>,
    pub(crate) raw_status: Option<String>,
    pub(crate) schedule: Vec<AiringEntry>,
    pub(crate) progress: u32,
    pub(crate) description: Option<String>,
}

impl MediaRecord {
    pub(crate) fn tier(&self) -> ReleaseTier {
        classify(self.raw_status.as_deref())
    }

    pub(crate) fn next_airing(&self, now: i64) -> Option<&AiringEntry> {
        self.schedule
            .iter()
            .filter(|entry| entry.airs_at > now)
            .min_by_key(|entry| entry.airs_at)
    }

    /// Episodes that have already aired, derived from the schedule. With a
    /// pending airing, everything before it is out. With the schedule
    /// exhausted, the last aired index counts. Without any schedule,
    /// upcoming releases have aired nothing and everything else falls back
    /// to the declared total.
    pub(crate) fn aired_count(&self, now: i64) -> u32 {
        if let Some(next) = self.next_airing(now) {
            return next.episode.saturating_sub(1);
        }
        let last_aired = self
            .schedule
            .iter()
            .filter(|entry| entry.airs_at <= now)
            .map(|entry| entry.episode)
            .max();
        if let Some(episode) = last_aired {
            return episode;
        }
        match self.tier() {
            ReleaseTier::Upcoming => 0,
            _ => self.episodes.unwrap_or(0),
        }
    }
}

pub(crate) fn parse_media_record(value: &Value) -> Option<MediaRecord> {
    let id = match value.get("id")? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }

    let title = parse_title(value)?;

    let format = MediaFormat::from_raw(value.get("format").and_then(Value::as_str));
    let episodes = value
        .get("episodes")
        .and_then(Value::as_u64)
        .map(|count| count.min(u64::from(u32::MAX)) as u32);
    let duration_minutes = value
        .get("duration")
        .and_then(Value::as_u64)
        .map(|minutes| minutes.min(u64::from(u32::MAX)) as u32);
    let raw_status = value
        .get("status")
        .and_then(Value::as_str)
        .map(|status| status.trim().to_string());

    // Viewer data may be absent or negative; both degrade to zero.
    let progress = value
        .get("progress")
        .or_else(|| value.pointer("/mediaListEntry/progress"))
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .clamp(0, i64::from(u32::MAX)) as u32;

    let description = value
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Some(MediaRecord {
        id,
        title,
        format,
        episodes,
        duration_minutes,
        raw_status,
        schedule: parse_schedule(value),
        progress,
        description,
    })
}

fn parse_title(value: &Value) -> Option<String> {
    let title = match value.get("title")? {
        Value::String(text) => text.trim().to_string(),
        Value::Object(_) => value
            .pointer("/title/english")
            .or_else(|| value.pointer("/title/romaji"))
            .and_then(Value::as_str)?
            .trim()
            .to_string(),
        _ => return None,
    };
    if title.is_empty() { None } else { Some(title) }
}

fn parse_schedule(value: &Value) -> Vec<AiringEntry> {
    let items = value
        .get("schedule")
        .or_else(|| value.pointer("/airingSchedule/nodes"))
        .and_then(Value::as_array);

    let mut schedule = Vec::new();
    if let Some(items) = items {
        for item in items {
            let Some(entry) = parse_airing_entry(item) else {
                continue;
            };
            schedule.push(entry);
        }
    }

    // Some exports only carry the single pending airing.
    if schedule.is_empty()
        && let Some(next) = value.get("nextAiringEpisode")
        && let Some(entry) = parse_airing_entry(next)
    {
        schedule.push(entry);
    }

    schedule
}

fn parse_airing_entry(value: &Value) -> Option<AiringEntry> {
    let episode = value.get("episode").and_then(Value::as_u64)?;
    let airs_at = value.get("airingAt").and_then(Value::as_i64)?;
    Some(AiringEntry {
        episode: episode.min(u64::from(u32::MAX)) as u32,
        airs_at,
    })
}

/// Strips markup from an upstream description: `<br>` variants become
/// newlines, any other tag is dropped, common entities are decoded.
pub(crate) fn clean_description(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('>') {
            Some(close) => {
                let tag = tail[1..close]
                    .trim()
                    .trim_start_matches('/')
                    .trim_end_matches('/')
                    .trim();
                if tag.eq_ignore_ascii_case("br") {
                    out.push('\n');
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
