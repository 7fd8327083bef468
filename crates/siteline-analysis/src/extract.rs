//! Heuristic text mining for completions that are not valid analysis JSON.
//!
//! Models occasionally answer in prose or markdown despite the JSON
//! instruction. This tier scrapes what it can (keyword-bucketed bullet
//! lists for the qualitative sections, regexes for scores, levels, and
//! financial figures) and fills the rest with field-specific defaults so
//! the result is indistinguishable in shape from a strict parse.

use regex::Regex;

use siteline_core::{Level, Recommendation};

use crate::types::{Narrative, NarrativeContext};

const DEFAULT_VIABILITY: u8 = 75;
const MAX_BULLETS_PER_SECTION: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
    Insights,
    Actions,
}

/// Mines a narrative out of free-form completion text.
///
/// Never fails: anything the text does not yield falls back to the
/// documented defaults (viability 75, levels Medium, financial figures 0).
pub(crate) fn mine_narrative(text: &str, ctx: &NarrativeContext<'_>) -> Narrative {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut opportunities = Vec::new();
    let mut threats = Vec::new();
    let mut key_insights = Vec::new();
    let mut action_items = Vec::new();

    let mut section = Section::None;
    let mut summary: Option<String> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(heading) = section_for_heading(line) {
            section = heading;
            continue;
        }

        if let Some(bullet) = bullet_text(line) {
            let bucket = match section {
                Section::Strengths => &mut strengths,
                Section::Weaknesses => &mut weaknesses,
                Section::Opportunities => &mut opportunities,
                Section::Threats => &mut threats,
                Section::Insights => &mut key_insights,
                Section::Actions => &mut action_items,
                Section::None => continue,
            };
            if bucket.len() < MAX_BULLETS_PER_SECTION {
                bucket.push(bullet);
            }
            continue;
        }

        // The first plain prose line outside any section doubles as the
        // summary.
        if summary.is_none() && section == Section::None && line.len() > 20 {
            summary = Some(line.to_string());
        }
    }

    let viability = capture_u8(text, r"(?i)viability[^\d]{0,40}(\d{1,3})")
        .map_or(DEFAULT_VIABILITY, |v| v.min(100));
    let competition = capture_level(text, "competition").unwrap_or(Level::Medium);
    let saturation = capture_level(text, "saturation").unwrap_or(Level::Medium);

    let expected_revenue =
        capture_i64(text, r"(?i)expected[_\s]+revenue[^\d]{0,40}([\d,]+)").unwrap_or(0);
    let average_revenue =
        capture_i64(text, r"(?i)average[_\s]+revenue[^\d]{0,40}([\d,]+)").unwrap_or(0);
    let total_addressable_market = capture_i64(
        text,
        r"(?i)(?:total[_\s]+addressable[_\s]+market|\btam\b)[^\d]{0,40}([\d,]+)",
    )
    .unwrap_or(0);

    let recommendation =
        find_recommendation(text).unwrap_or_else(|| Recommendation::from_viability(viability));

    let summary = summary.unwrap_or_else(|| {
        format!(
            "Viability assessment for a {} at {}.",
            ctx.category, ctx.location
        )
    });

    Narrative {
        summary,
        strengths,
        weaknesses,
        opportunities,
        threats,
        viability_score: viability,
        competition_level: competition,
        market_saturation: saturation,
        expected_revenue,
        average_revenue,
        total_addressable_market,
        recommendation,
        key_insights,
        action_items,
    }
}

/// Classifies short heading-like lines into a SWOT/insight/action section.
fn section_for_heading(line: &str) -> Option<Section> {
    // Headings are short; a keyword inside a long sentence is prose, not a
    // section marker.
    if line.len() > 60 {
        return None;
    }
    let lower = line.to_lowercase();
    if lower.contains("strength") {
        Some(Section::Strengths)
    } else if lower.contains("weakness") {
        Some(Section::Weaknesses)
    } else if lower.contains("opportunit") {
        Some(Section::Opportunities)
    } else if lower.contains("threat") {
        Some(Section::Threats)
    } else if lower.contains("insight") {
        Some(Section::Insights)
    } else if lower.contains("action") || lower.contains("next step") {
        Some(Section::Actions)
    } else {
        None
    }
}

/// Strips bullet markers (`-`, `*`, `•`, `1.`, `2)`) and returns the text,
/// or `None` for non-bullet lines.
fn bullet_text(line: &str) -> Option<String> {
    let stripped = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "));
    if let Some(text) = stripped {
        let text = text.trim();
        return (!text.is_empty()).then(|| text.to_string());
    }

    let re = Regex::new(r"^\d{1,2}[.)]\s+(.+)$").ok()?;
    let caps = re.captures(line)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}

fn capture_u8(text: &str, pattern: &str) -> Option<u8> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().parse::<u8>().ok()
}

fn capture_i64(text: &str, pattern: &str) -> Option<i64> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().replace(',', "").parse::<i64>().ok()
}

/// Finds `Low`/`Medium`/`Moderate`/`High` within a short window after the
/// keyword, e.g. "competition level: High" or "market saturation is low".
fn capture_level(text: &str, keyword: &str) -> Option<Level> {
    let pattern = format!(r"(?i){keyword}[^a-zA-Z]{{0,3}}(?:level|is|:)?[^a-zA-Z]{{0,3}}(high|medium|moderate|low)");
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().parse::<Level>().ok()
}

/// Scans for any of the closed recommendation labels.
fn find_recommendation(text: &str) -> Option<Recommendation> {
    let lower = text.to_lowercase();
    // Order matters: "highly recommended" and "not recommended" both contain
    // "recommended".
    for (needle, value) in [
        ("highly recommended", Recommendation::HighlyRecommended),
        ("not recommended", Recommendation::NotRecommended),
        ("proceed with caution", Recommendation::ProceedWithCaution),
        ("recommended", Recommendation::Recommended),
    ] {
        if lower.contains(needle) {
            return Some(value);
        }
    }
    None
}
