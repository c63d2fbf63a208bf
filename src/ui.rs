use crate::models::{DashboardResponse, DirectoryRow, Notice, NoticeKind, Plan, PlanCount, RevenuePoint};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::fmt::Write;

const PLAN_COLORS: [&str; 3] = ["#c7e9b4", "#41b6c4", "#225ea8"];

pub fn render_index(dashboard: &DashboardResponse) -> String {
    let metrics = &dashboard.metrics;
    let progress = &dashboard.progress;

    let values = [
        ("NOTICE", render_notice(dashboard.notice.as_ref())),
        ("PLAN_OPTIONS", render_plan_options()),
        ("GOAL", progress.goal.to_string()),
        ("MEMBERS", metrics.members.to_string()),
        ("MEMBERSHIP_REVENUE", money(metrics.membership_revenue)),
        ("SHOP_SALES", money(metrics.shop_sales)),
        ("TOTAL_INCOME", money(metrics.total_income)),
        ("GOAL_MONEY", money(progress.goal)),
        ("PROGRESS_WIDTH", format!("{:.2}", progress.fraction * 100.0)),
        ("PERCENT", progress.percent.to_string()),
        ("REVENUE_CHART", render_revenue_chart(&dashboard.revenue_sources)),
        ("PLAN_CHART", render_plan_chart(&dashboard.plan_distribution)),
        ("SEARCH", escape_html(&dashboard.search)),
        ("DIRECTORY", render_directory(&dashboard.directory)),
        ("REPORT_DATE", dashboard.date.format("%Y-%m-%d").to_string()),
    ];

    fill_template(INDEX_HTML, &values)
}

/// Substitutes `{{KEY}}` markers in one pass over the template.
///
/// Inserted values are never scanned again, so member names and search
/// terms that look like markers come out verbatim.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after[..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Escapes text for both element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn money(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}

fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => {
            let kind = match notice.kind {
                NoticeKind::Success => "ok",
                NoticeKind::Error => "error",
            };
            format!(
                r#"<div class="notice" data-type="{kind}" role="status">{}</div>"#,
                escape_html(&notice.message)
            )
        }
        None => String::new(),
    }
}

fn render_plan_options() -> String {
    Plan::ALL
        .into_iter()
        .map(|plan| format!(r#"<option value="{}">{}</option>"#, plan.slug(), plan.label()))
        .collect()
}

fn render_revenue_chart(points: &[RevenuePoint]) -> String {
    const WIDTH: f64 = 420.0;
    const HEIGHT: f64 = 260.0;
    const BASELINE: f64 = 220.0;
    const TOP: f64 = 30.0;
    const BAR_WIDTH: f64 = 110.0;

    let max = points
        .iter()
        .filter_map(|point| point.amount.to_f64())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let slot = WIDTH / points.len().max(1) as f64;

    let mut svg = format!(
        r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Revenue source comparison">"#
    );
    let _ = write!(
        svg,
        r#"<line class="chart-axis" x1="0" y1="{BASELINE}" x2="{WIDTH}" y2="{BASELINE}" />"#
    );

    for (index, point) in points.iter().enumerate() {
        let value = point.amount.to_f64().unwrap_or_default().max(0.0);
        let height = (BASELINE - TOP) * value / max;
        let x = slot * index as f64 + (slot - BAR_WIDTH) / 2.0;
        let y = BASELINE - height;
        let center = x + BAR_WIDTH / 2.0;
        let _ = write!(
            svg,
            r#"<rect class="chart-bar" x="{x:.1}" y="{y:.1}" width="{BAR_WIDTH}" height="{height:.1}" rx="4" />"#
        );
        let _ = write!(
            svg,
            r#"<text class="chart-value" x="{center:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            y - 8.0,
            money(point.amount)
        );
        let _ = write!(
            svg,
            r#"<text class="chart-label" x="{center:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            BASELINE + 22.0,
            point.source
        );
    }

    svg.push_str("</svg>");
    svg
}

fn render_plan_chart(counts: &[PlanCount]) -> String {
    const RADIUS: f64 = 70.0;
    const STROKE: f64 = 38.0;

    let total: usize = counts.iter().map(|entry| entry.count).sum();
    let circumference = 2.0 * std::f64::consts::PI * RADIUS;

    let mut svg = String::from(
        r#"<svg class="chart" viewBox="0 0 420 260" role="img" aria-label="Plan distribution">"#,
    );

    if total == 0 {
        svg.push_str(
            r#"<text class="chart-label" x="210" y="130" text-anchor="middle">No members yet</text></svg>"#,
        );
        return svg;
    }

    // Slices start at twelve o'clock and run clockwise.
    svg.push_str(r#"<g transform="rotate(-90 130 130)">"#);
    let mut offset = 0.0;
    for (entry, color) in counts.iter().zip(PLAN_COLORS) {
        if entry.count == 0 {
            continue;
        }
        let length = circumference * entry.count as f64 / total as f64;
        let _ = write!(
            svg,
            r#"<circle cx="130" cy="130" r="{RADIUS}" fill="none" stroke="{color}" stroke-width="{STROKE}" stroke-dasharray="{length:.2} {circumference:.2}" stroke-dashoffset="{:.2}" />"#,
            -offset
        );
        offset += length;
    }
    svg.push_str("</g>");

    for (index, (entry, color)) in counts.iter().zip(PLAN_COLORS).enumerate() {
        let y = 90 + index * 34;
        let share = entry.count as f64 * 100.0 / total as f64;
        let _ = write!(
            svg,
            r#"<rect x="250" y="{}" width="14" height="14" rx="3" fill="{color}" /><text class="chart-label" x="272" y="{}">{} · {} ({share:.0}%)</text>"#,
            y - 11,
            y,
            entry.label,
            entry.count
        );
    }

    svg.push_str("</svg>");
    svg
}

fn render_directory(rows: &[DirectoryRow]) -> String {
    if rows.is_empty() {
        return r#"<p class="empty">No members found.</p>"#.to_string();
    }

    let mut html = String::from(
        "<table class=\"directory\"><thead><tr><th>Name</th><th>Phone</th><th>Plan</th><th>Next Payment</th><th>Status</th></tr></thead><tbody>",
    );
    for row in rows {
        let class = if row.overdue { "overdue" } else { "current" };
        let _ = write!(
            html,
            r#"<tr class="{class}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            escape_html(&row.name),
            escape_html(&row.phone),
            row.plan,
            row.next_payment.format("%Y-%m-%d"),
            row.status.as_str()
        );
    }
    html.push_str("</tbody></table>");
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Adams Inn Fitness &amp; Gym Centre</title>
  <style>
    :root {
      --bg: #1a1a1a;
      --panel: #2d2d2d;
      --ink: #f2f2f2;
      --muted: #9a9a9a;
      --accent: #d4ff00;
      --accent-hover: #e6ff66;
      --danger: #ff4d4d;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: grid;
      grid-template-columns: 280px 1fr;
    }

    h1, h2, h3 {
      color: var(--accent);
      font-family: "Arial Black", sans-serif;
      margin: 0;
    }

    aside {
      background: #111;
      padding: 28px 22px;
      display: grid;
      align-content: start;
      gap: 24px;
    }

    .logo {
      width: 150px;
      height: 150px;
      border-radius: 12px;
      background: var(--accent);
      color: #000;
      display: grid;
      place-items: center;
      font-family: "Arial Black", sans-serif;
      font-size: 1.3rem;
      text-align: center;
    }

    form.stack {
      display: grid;
      gap: 10px;
    }

    label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    input, select {
      width: 100%;
      padding: 10px 12px;
      border-radius: 6px;
      border: 1px solid #444;
      background: var(--panel);
      color: var(--ink);
      font-size: 0.95rem;
    }

    button, .download {
      width: 100%;
      height: 3em;
      border: none;
      border-radius: 5px;
      background: var(--accent);
      color: #000;
      font-weight: bold;
      font-size: 0.95rem;
      cursor: pointer;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      text-decoration: none;
    }

    button:hover, .download:hover {
      background: var(--accent-hover);
    }

    main {
      padding: 32px 36px 48px;
      display: grid;
      gap: 28px;
      align-content: start;
    }

    hr {
      border: none;
      border-top: 1px solid #333;
      margin: 0;
      width: 100%;
    }

    .notice {
      padding: 12px 16px;
      border-radius: 8px;
      font-weight: 600;
    }

    .notice[data-type="ok"] {
      background: rgba(45, 122, 75, 0.3);
      color: #8ef0b0;
    }

    .notice[data-type="error"] {
      background: rgba(198, 59, 43, 0.3);
      color: var(--danger);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(4, minmax(140px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--panel);
      border-radius: 10px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.8rem;
      font-weight: 700;
      color: var(--accent);
    }

    .progress {
      height: 14px;
      border-radius: 999px;
      background: var(--panel);
      overflow: hidden;
    }

    .progress .bar {
      height: 100%;
      background: var(--accent);
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(2, minmax(0, 1fr));
      gap: 20px;
    }

    .chart-card {
      background: var(--panel);
      border-radius: 10px;
      padding: 16px;
      display: grid;
      gap: 10px;
    }

    .chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-axis {
      stroke: #555;
    }

    .chart-label, .chart-value {
      fill: var(--ink);
      font-size: 12px;
    }

    .search {
      display: flex;
      gap: 10px;
    }

    .search button {
      width: 140px;
    }

    table.directory {
      width: 100%;
      border-collapse: collapse;
      background: var(--panel);
      border-radius: 10px;
      overflow: hidden;
    }

    .directory th, .directory td {
      text-align: left;
      padding: 10px 14px;
      border-bottom: 1px solid #3a3a3a;
    }

    .directory th {
      color: var(--muted);
      font-size: 0.8rem;
      text-transform: uppercase;
    }

    .directory tr.current td {
      color: white;
    }

    .directory tr.overdue td {
      color: var(--danger);
    }

    .empty {
      background: rgba(65, 182, 196, 0.15);
      color: #8fd3dd;
      padding: 12px 16px;
      border-radius: 8px;
      margin: 0;
    }

    .shop {
      display: grid;
      grid-template-columns: repeat(4, minmax(0, 1fr));
      gap: 16px;
    }

    footer {
      text-align: center;
      padding: 20px;
      color: #666;
    }

    @media (max-width: 900px) {
      body {
        grid-template-columns: 1fr;
      }
      .panel, .charts, .shop {
        grid-template-columns: 1fr 1fr;
      }
    }
  </style>
</head>
<body>
  <aside>
    <div class="logo">ADAMS<br />INN</div>
    <h2>Management Menu</h2>

    <form class="stack" method="post" action="/members">
      <h3>Register New Member</h3>
      <label for="name">Full Name</label>
      <input id="name" name="name" type="text" autocomplete="off" />
      <label for="phone">Phone (WhatsApp format)</label>
      <input id="phone" name="phone" type="tel" autocomplete="off" />
      <label for="plan">Select Plan</label>
      <select id="plan" name="plan">{{PLAN_OPTIONS}}</select>
      <button type="submit">Add Member</button>
    </form>

    <hr />

    <form class="stack" method="post" action="/goal">
      <label for="goal">Set Monthly Revenue Goal ($)</label>
      <input id="goal" name="goal" type="number" min="0" step="500" value="{{GOAL}}" />
      <button type="submit">Update Goal</button>
    </form>
  </aside>

  <main>
    <h1>Adams Inn Fitness and Gym Centre</h1>
    {{NOTICE}}

    <section class="panel">
      <div class="stat">
        <span class="label">Active Members</span>
        <span class="value" id="members">{{MEMBERS}}</span>
      </div>
      <div class="stat">
        <span class="label">Membership Rev.</span>
        <span class="value" id="membership-revenue">{{MEMBERSHIP_REVENUE}}</span>
      </div>
      <div class="stat">
        <span class="label">Shop Sales</span>
        <span class="value" id="shop-sales">{{SHOP_SALES}}</span>
      </div>
      <div class="stat">
        <span class="label">Total Income</span>
        <span class="value" id="total-income">{{TOTAL_INCOME}}</span>
      </div>
    </section>

    <section>
      <h3>Revenue Goal: {{GOAL_MONEY}}</h3>
      <div class="progress"><div class="bar" style="width: {{PROGRESS_WIDTH}}%"></div></div>
      <p id="progress-text">{{PERCENT}}% of monthly target reached.</p>
    </section>

    <hr />

    <section class="charts">
      <div class="chart-card">
        <h3>Revenue Source Comparison</h3>
        {{REVENUE_CHART}}
      </div>
      <div class="chart-card">
        <h3>Plan Distribution</h3>
        {{PLAN_CHART}}
      </div>
    </section>

    <hr />

    <section>
      <h2>Member Directory</h2>
      <form class="search" method="get" action="/">
        <input name="q" type="search" placeholder="Search members by name..." value="{{SEARCH}}" />
        <button type="submit">Search</button>
      </form>
      {{DIRECTORY}}
    </section>

    <hr />

    <section>
      <h2>Supplement &amp; Gear Shop</h2>
      <div class="shop">
        <form method="post" action="/shop/water"><button type="submit">Sell Water ($1)</button></form>
        <form method="post" action="/shop/protein"><button type="submit">Sell Protein ($5)</button></form>
        <form method="post" action="/shop/energy-drink"><button type="submit">Sell Energy Drink ($3)</button></form>
        <form method="post" action="/shop/reset"><button type="submit">Reset Daily Sales</button></form>
      </div>
    </section>

    <hr />

    <a class="download" href="/export.csv" download="Adams_Inn_Report_{{REPORT_DATE}}.csv">Download Adams Inn Full Report (CSV)</a>

    <footer>
      <p>&copy; 2026 Adams Inn Fitness and Gym Centre</p>
    </footer>
  </main>
</body>
</html>
"#;
