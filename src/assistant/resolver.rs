//! Offline reply resolver.
//!
//! Case-insensitive substring matching over an ordered rule table; the first
//! rule whose matcher accepts the prompt decides the reply. Prompts no rule
//! accepts get [`DEFAULT_REPLY`].
//!
//! Order matters: "where can I recycle data drives?" hits `Recycling` before
//! `DataSecurity` or `Locations`. Keywords are plain substrings, so "hi" also
//! matches inside "this" or "which".

use std::borrow::Cow;

use serde::Serialize;

use super::quiz;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Quiz,
    Greeting,
    Recycling,
    Pickup,
    DataSecurity,
    Locations,
    Default,
}

/// Keyword predicate over a lowercased prompt.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Every keyword must occur.
    All(&'static [&'static str]),
    /// At least one keyword must occur.
    Any(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::All(words) => words.iter().all(|w| lowered.contains(w)),
            Matcher::Any(words) => words.iter().any(|w| lowered.contains(w)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub matcher: Matcher,
}

/// Rules in priority order.
pub const RULES: &[Rule] = &[
    Rule { category: Category::Quiz, matcher: Matcher::All(&["quiz questions", "e-waste recycling"]) },
    Rule { category: Category::Greeting, matcher: Matcher::Any(&["hello", "hi"]) },
    Rule { category: Category::Recycling, matcher: Matcher::Any(&["recycle", "e-waste"]) },
    Rule { category: Category::Pickup, matcher: Matcher::Any(&["pickup", "collection"]) },
    Rule { category: Category::DataSecurity, matcher: Matcher::Any(&["data", "security"]) },
    Rule { category: Category::Locations, matcher: Matcher::Any(&["location", "where"]) },
];

pub const GREETING_REPLY: &str =
    "Hello! I'm EcoBot. How can I help you with e-waste recycling today?";

pub const RECYCLING_REPLY: &str = "E-waste recycling is important for our environment. At EcoNirvana, we offer several recycling options including drop-off locations, doorstep pickup, and community events. We ensure all electronics are properly recycled with zero landfill commitment.";

pub const PICKUP_REPLY: &str = "Our doorstep collection service makes recycling convenient! We'll come to your location to pick up your e-waste. You can schedule a pickup through our website or mobile app.";

pub const DATA_SECURITY_REPLY: &str = "Data security is our priority. All devices undergo secure data wiping that meets DoD 5220.22-M standards, or physical destruction for storage devices that cannot be wiped. We provide certificates of destruction for your peace of mind.";

pub const LOCATIONS_REPLY: &str = "We have multiple drop-off locations across the city including our Main Facility, Downtown Drop-off Center, Westside Collection Point, Northside Recycling Hub, Eastside Collection Center, and Southside Drop-off Point. You can find the nearest location using our website's map feature.";

pub const DEFAULT_REPLY: &str = "I'm here to help with all your e-waste recycling questions. You can ask about our services, locations, data security measures, or environmental impact.";

/// The category of the first rule that accepts `prompt`.
pub fn classify(prompt: &str) -> Category {
    let lowered = prompt.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(Category::Default)
}

/// Canned reply for `category`. Only the quiz reply is built per call.
pub fn reply_for(category: Category) -> Cow<'static, str> {
    match category {
        Category::Quiz => Cow::Owned(quiz::fixed_quiz_json()),
        Category::Greeting => Cow::Borrowed(GREETING_REPLY),
        Category::Recycling => Cow::Borrowed(RECYCLING_REPLY),
        Category::Pickup => Cow::Borrowed(PICKUP_REPLY),
        Category::DataSecurity => Cow::Borrowed(DATA_SECURITY_REPLY),
        Category::Locations => Cow::Borrowed(LOCATIONS_REPLY),
        Category::Default => Cow::Borrowed(DEFAULT_REPLY),
    }
}
