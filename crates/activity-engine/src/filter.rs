//! Browse-screen filters over an activity catalog.

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, RepeatFrequency, Role};

/// Which activities to show based on payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter {
    #[default]
    All,
    Free,
    Paid,
}

/// Which activities to show based on their repeat schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Repeatability {
    #[default]
    All,
    /// Activities whose frequency is absent or `none`.
    OneTime,
    Only(RepeatFrequency),
}

/// A conjunction of optional criteria. The default filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityFilter {
    /// Case-insensitive substring of the English or Chinese title.
    pub search: Option<String>,
    pub wheelchair_accessible: bool,
    pub sign_language_support: bool,
    pub payment: PaymentFilter,
    /// Only activities with participant places left.
    pub available_only: bool,
    pub repeatability: Repeatability,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(query) = self.search.as_deref().map(str::trim) {
            if !query.is_empty() && !title_contains(activity, query) {
                return false;
            }
        }
        if self.wheelchair_accessible && !activity.wheelchair_accessible {
            return false;
        }
        if self.sign_language_support && !activity.sign_language_support {
            return false;
        }
        match self.payment {
            PaymentFilter::Free if activity.payment_required => return false,
            PaymentFilter::Paid if !activity.payment_required => return false,
            _ => {}
        }
        if self.available_only && activity.is_full(Role::Participant) {
            return false;
        }
        match self.repeatability {
            Repeatability::All => true,
            Repeatability::OneTime => !activity.frequency().is_recurring(),
            Repeatability::Only(frequency) => activity.frequency() == frequency,
        }
    }

    /// Matching activities in catalog order.
    pub fn apply<'a>(&self, activities: &'a [Activity]) -> Vec<&'a Activity> {
        activities.iter().filter(|a| self.matches(a)).collect()
    }
}

fn title_contains(activity: &Activity, query: &str) -> bool {
    let query = query.to_lowercase();
    activity.title.to_lowercase().contains(&query) || activity.title_chinese.contains(&query)
}
