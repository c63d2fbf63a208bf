use crate::models::{
    DashboardResponse, DirectoryRow, GoalProgress, Member, Metrics, Plan, PlanCount, RevenuePoint,
};
use crate::store::GymStore;
use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, prelude::ToPrimitive};

pub fn build_dashboard(store: &mut GymStore, search: &str) -> DashboardResponse {
    build_dashboard_at(Local::now().date_naive(), store, search)
}

/// Snapshot of everything the page shows. Consumes the pending notice.
pub fn build_dashboard_at(today: NaiveDate, store: &mut GymStore, search: &str) -> DashboardResponse {
    let metrics = metrics(store);
    let progress = goal_progress(metrics.total_income, store.goal());

    DashboardResponse {
        date: today,
        search: search.to_string(),
        revenue_sources: revenue_sources(&metrics),
        plan_distribution: plan_distribution(store.members()),
        directory: directory(store.members(), search, today),
        notice: store.take_notice(),
        progress,
        metrics,
    }
}

pub fn membership_revenue(members: &[Member]) -> Decimal {
    members.iter().map(|member| member.plan.price()).sum()
}

pub fn metrics(store: &GymStore) -> Metrics {
    let membership_revenue = membership_revenue(store.members());
    let shop_sales = store.sales_total();

    Metrics {
        members: store.members().len(),
        membership_revenue,
        shop_sales,
        total_income: membership_revenue + shop_sales,
    }
}

pub fn goal_progress(total_income: Decimal, goal: Decimal) -> GoalProgress {
    let ratio = if goal <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        // Overflow only happens for a vanishingly small goal, i.e. far past it.
        total_income
            .checked_div(goal)
            .unwrap_or(Decimal::ONE)
            .clamp(Decimal::ZERO, Decimal::ONE)
    };

    GoalProgress {
        goal,
        fraction: ratio.to_f64().unwrap_or_default(),
        percent: (ratio * Decimal::ONE_HUNDRED).trunc().to_u32().unwrap_or_default(),
    }
}

pub fn revenue_sources(metrics: &Metrics) -> Vec<RevenuePoint> {
    vec![
        RevenuePoint {
            source: "Memberships",
            amount: metrics.membership_revenue,
        },
        RevenuePoint {
            source: "Shop Sales",
            amount: metrics.shop_sales,
        },
    ]
}

pub fn plan_distribution(members: &[Member]) -> Vec<PlanCount> {
    Plan::ALL
        .into_iter()
        .map(|plan| PlanCount {
            plan,
            label: plan.label(),
            count: members.iter().filter(|member| member.plan == plan).count(),
        })
        .collect()
}

pub fn directory(members: &[Member], search: &str, today: NaiveDate) -> Vec<DirectoryRow> {
    let needle = search.to_lowercase();

    members
        .iter()
        .filter(|member| needle.is_empty() || member.name.to_lowercase().contains(&needle))
        .map(|member| DirectoryRow {
            name: member.name.clone(),
            phone: member.phone.clone(),
            plan: member.plan.label(),
            next_payment: member.next_payment,
            status: member.status(today),
            overdue: member.is_overdue(today),
        })
        .collect()
}
