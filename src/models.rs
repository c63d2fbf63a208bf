use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basic,
    Pro,
    Elite,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Basic, Plan::Pro, Plan::Elite];

    pub fn price(self) -> Decimal {
        match self {
            Plan::Basic => Decimal::from(20),
            Plan::Pro => Decimal::from(50),
            Plan::Elite => Decimal::from(100),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Plan::Basic => "Basic ($20)",
            Plan::Pro => "Pro ($50)",
            Plan::Elite => "Elite ($100)",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Elite => "elite",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown plan '{0}', expected basic, pro or elite")]
pub struct PlanParseError(pub String);

impl FromStr for Plan {
    type Err = PlanParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Plan::ALL
            .into_iter()
            .find(|plan| plan.slug().eq_ignore_ascii_case(trimmed) || plan.label() == trimmed)
            .ok_or_else(|| PlanParseError(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberStatus {
    Active,
    Overdue,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub phone: String,
    pub plan: Plan,
    pub next_payment: NaiveDate,
}

impl Member {
    /// A member is overdue once the calendar has moved past the due date;
    /// the due date itself still counts as paid up.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.next_payment
    }

    pub fn status(&self, today: NaiveDate) -> MemberStatus {
        if self.is_overdue(today) {
            MemberStatus::Overdue
        } else {
            MemberStatus::Active
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    Water,
    Protein,
    EnergyDrink,
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("action must be 'water', 'protein', 'energy-drink' or 'reset'")]
pub struct ShopActionError;

impl ShopAction {
    /// Amount added to the daily sales total, `None` for the reset action.
    pub fn price(self) -> Option<Decimal> {
        match self {
            ShopAction::Water => Some(Decimal::from(1)),
            ShopAction::Protein => Some(Decimal::from(5)),
            ShopAction::EnergyDrink => Some(Decimal::from(3)),
            ShopAction::Reset => None,
        }
    }

    pub fn confirmation(self) -> &'static str {
        match self {
            ShopAction::Water => "Water Sold!",
            ShopAction::Protein => "Protein Shake Sold!",
            ShopAction::EnergyDrink => "Energy Drink Sold!",
            ShopAction::Reset => "Daily sales reset.",
        }
    }
}

impl FromStr for ShopAction {
    type Err = ShopActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "water" => Ok(ShopAction::Water),
            "protein" => Ok(ShopAction::Protein),
            "energy-drink" => Ok(ShopAction::EnergyDrink),
            "reset" => Ok(ShopAction::Reset),
            _ => Err(ShopActionError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct ShopRequest {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalUpdate {
    pub goal: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub members: usize,
    pub membership_revenue: Decimal,
    pub shop_sales: Decimal,
    pub total_income: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: Decimal,
    pub fraction: f64,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenuePoint {
    pub source: &'static str,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanCount {
    pub plan: Plan,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryRow {
    pub name: String,
    pub phone: String,
    pub plan: &'static str,
    pub next_payment: NaiveDate,
    pub status: MemberStatus,
    pub overdue: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub search: String,
    pub metrics: Metrics,
    pub progress: GoalProgress,
    pub revenue_sources: Vec<RevenuePoint>,
    pub plan_distribution: Vec<PlanCount>,
    pub directory: Vec<DirectoryRow>,
    pub notice: Option<Notice>,
}
