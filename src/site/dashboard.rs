//! Account dashboard — mocked recycling figures for the signed-in user.

use serde::Serialize;

use crate::auth::{AuthError, AuthStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecyclingStats {
    pub items_recycled: u32,
    pub co2_saved_kg: f64,
    pub points_earned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: u32,
    pub kind: &'static str,
    pub item: &'static str,
    pub when: &'static str,
    pub points: u32,
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: u32,
    pub title: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub trees_planted: u32,
    pub water_saved_liters: u32,
    pub energy_saved_kwh: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub greeting: String,
    pub stats: RecyclingStats,
    pub recent_activity: Vec<Activity>,
    pub upcoming_events: Vec<Event>,
    pub impact: EnvironmentalImpact,
}

impl Dashboard {
    /// Lines for plain-text channels.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{}\n  items recycled: {}  CO2 saved: {} kg  points: {}\n",
            self.greeting, self.stats.items_recycled, self.stats.co2_saved_kg, self.stats.points_earned
        );
        out.push_str("  recent activity:\n");
        for a in &self.recent_activity {
            out.push_str(&format!("    {} {} ({}) +{} pts\n", a.kind, a.item, a.when, a.points));
        }
        out.push_str("  upcoming events:\n");
        for e in &self.upcoming_events {
            out.push_str(&format!("    {} — {} {} @ {}\n", e.title, e.date, e.time, e.location));
        }
        out.push_str(&format!(
            "  impact: {} trees, {} L water, {} kWh energy",
            self.impact.trees_planted, self.impact.water_saved_liters, self.impact.energy_saved_kwh
        ));
        out
    }
}

/// The dashboard of the signed-in user. Anonymous callers get
/// [`AuthError::NotAuthenticated`] and should be sent to login.
pub fn load(auth: &AuthStore) -> Result<Dashboard, AuthError> {
    let user = auth.require_user()?;
    Ok(Dashboard {
        greeting: format!("Welcome back, {}!", user.name),
        stats: RecyclingStats { items_recycled: 12, co2_saved_kg: 45.8, points_earned: 230 },
        recent_activity: vec![
            Activity { id: 1, kind: "Recycled", item: "Laptop", when: "2 days ago", points: 50, category: "Electronics" },
            Activity { id: 2, kind: "Recycled", item: "Smartphone", when: "1 week ago", points: 30, category: "Electronics" },
            Activity { id: 3, kind: "Recycled", item: "Printer", when: "2 weeks ago", points: 40, category: "Electronics" },
        ],
        upcoming_events: vec![
            Event {
                id: 1,
                title: "Community Recycling Day",
                date: "June 5, 2023",
                time: "10:00 AM - 2:00 PM",
                location: "Downtown Green City",
                description: "Bring your electronic waste for free recycling. All community members welcome!",
            },
            Event {
                id: 2,
                title: "Electronics Collection Drive",
                date: "July 15, 2023",
                time: "9:00 AM - 3:00 PM",
                location: "Westside Community Center",
                description: "Special collection event for computers, TVs, and other electronic devices.",
            },
        ],
        impact: EnvironmentalImpact { trees_planted: 5, water_saved_liters: 120, energy_saved_kwh: 85 },
    })
}
