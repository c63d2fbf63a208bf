use crate::models::{Member, Notice, Plan, ShopAction};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Days between registration and the first payment due date.
pub const BILLING_CYCLE_DAYS: i64 = 30;

const JOHN_DOE_DUE: NaiveDate = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid seed date");
const JANE_SMITH_DUE: NaiveDate = NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid seed date");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("name is required")]
    MissingName,
    #[error("phone is required")]
    MissingPhone,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("goal must be a number")]
    NotANumber,
    #[error("goal must be greater than zero")]
    NotPositive,
}

/// Everything one browser session knows about the gym.
#[derive(Debug, Clone)]
pub struct GymStore {
    members: Vec<Member>,
    sales_total: Decimal,
    goal: Decimal,
    notice: Option<Notice>,
}

impl GymStore {
    /// A fresh session with the two sample members.
    pub fn seeded(goal: Decimal) -> Self {
        let members = vec![
            Member {
                name: "John Doe".to_string(),
                phone: "+233244123456".to_string(),
                plan: Plan::Pro,
                next_payment: JOHN_DOE_DUE,
            },
            Member {
                name: "Jane Smith".to_string(),
                phone: "+233201987654".to_string(),
                plan: Plan::Elite,
                next_payment: JANE_SMITH_DUE,
            },
        ];
        Self::with_members(members, goal)
    }

    pub fn with_members(members: Vec<Member>, goal: Decimal) -> Self {
        Self {
            members,
            sales_total: Decimal::ZERO,
            goal,
            notice: None,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn sales_total(&self) -> Decimal {
        self.sales_total
    }

    pub fn goal(&self) -> Decimal {
        self.goal
    }

    pub fn register(
        &mut self,
        name: &str,
        phone: &str,
        plan: Plan,
        today: NaiveDate,
    ) -> Result<&Member, RegistrationError> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }
        if phone.is_empty() {
            return Err(RegistrationError::MissingPhone);
        }

        let member = Member {
            name: name.to_string(),
            phone: phone.to_string(),
            plan,
            next_payment: today + Duration::days(BILLING_CYCLE_DAYS),
        };
        info!(name = %member.name, plan = %member.plan, due = %member.next_payment, "member registered");
        self.notice = Some(Notice::success(format!("Added {}!", member.name)));
        self.members.push(member);

        Ok(&self.members[self.members.len() - 1])
    }

    pub fn apply_shop(&mut self, action: ShopAction) -> Decimal {
        match action.price() {
            Some(price) => self.sales_total += price,
            None => self.sales_total = Decimal::ZERO,
        }
        info!(?action, total = %self.sales_total, "shop sales updated");
        self.notice = Some(Notice::success(action.confirmation()));
        self.sales_total
    }

    pub fn set_goal(&mut self, goal: Decimal) -> Result<(), GoalError> {
        if goal <= Decimal::ZERO {
            return Err(GoalError::NotPositive);
        }
        info!(previous = %self.goal, goal = %goal, "revenue goal changed");
        self.goal = goal;
        Ok(())
    }

    /// Parses form text before applying it, so a bad entry keeps the old goal.
    pub fn set_goal_from_str(&mut self, raw: &str) -> Result<(), GoalError> {
        let goal = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|_| GoalError::NotANumber)?;
        self.set_goal(goal)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Notices are shown on exactly one render.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
