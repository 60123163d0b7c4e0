use std::io::IsTerminal;

use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use terminal_size::{terminal_size, Width};

use crate::dashboard::{
    CalendarEntry, CalendarMonth, ClientDetail, ClientRow, DashboardKpis, MonthTrend,
    ProductRetention, SearchHit, TimelineEvent, ValueRisk,
};
use crate::outreach::OutreachState;
use crate::scoring::{Direction, KpiComparison, PriorityLevel, PriorityScore, RenewalStatus};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Money with two decimals and thousands separators: "12,100.00"
pub fn format_money(value: Decimal) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, frac) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

/// Signed renewal distance: "40d overdue", "10d left", "today", or "-"
pub fn format_days_until(days: Option<i64>) -> String {
    match days {
        None => "-".to_string(),
        Some(0) => "today".to_string(),
        Some(d) if d < 0 => format!("{}d overdue", -d),
        Some(d) => format!("{}d left", d),
    }
}

fn paint_status(status: RenewalStatus, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        RenewalStatus::Overdue => text.red().bold().to_string(),
        RenewalStatus::DueSoon => text.yellow().to_string(),
        RenewalStatus::Active => text.green().to_string(),
        RenewalStatus::Unknown => text.dimmed().to_string(),
    }
}

fn paint_level(level: PriorityLevel, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match level {
        PriorityLevel::Critical => text.red().bold().to_string(),
        PriorityLevel::High => text.red().to_string(),
        PriorityLevel::Medium => text.yellow().to_string(),
        PriorityLevel::Low => text.dimmed().to_string(),
    }
}

/// Ranked client list: Index, Score, Level, Status, Renewal, Name, Id
/// `offset` keeps the index 1-based across pages. When `outreach` is given the
/// remaining snooze time is appended.
pub fn format_client_table(
    rows: &[ClientRow],
    offset: usize,
    use_colors: bool,
    verbose: bool,
    outreach: Option<&OutreachState>,
) -> String {
    if rows.is_empty() {
        return "No clients found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";
    // index 4 + score 3 + level 8 + status 8 + renewal 12 + separators
    let fixed_width = 4 + 3 + 8 + 8 + 12 + separator.len() * 5;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>3}.", offset + idx + 1);
            let score_str = format!("{:>3}", row.priority.total);
            let level_str = format!("{:<8}", row.priority.level.as_str());
            let status_str = format!("{:<8}", row.renewal_status.as_str());
            let renewal_str = format!("{:<12}", format_days_until(row.days_until_renewal));
            let id = row.snapshot.customer_id.as_str();

            let name = match term_width {
                Some(width) if width > fixed_width + id.len() + 10 => {
                    truncate_name(row.snapshot.display_name(), width - fixed_width - id.len())
                }
                Some(_) => truncate_name(row.snapshot.display_name(), 20),
                None => row.snapshot.display_name().to_string(),
            };

            let mut line = if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    paint_level(row.priority.level, &level_str, true),
                    separator,
                    paint_status(row.renewal_status, &status_str, true),
                    separator,
                    renewal_str,
                    separator,
                    name.bold(),
                    separator,
                    id.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    level_str,
                    separator,
                    status_str,
                    separator,
                    renewal_str,
                    separator,
                    name,
                    separator,
                    id
                )
            };

            if let Some(entry) = outreach.and_then(|state| state.entry(id)) {
                line.push_str(&format!("{}({})", separator, entry.format_remaining()));
            }
            if verbose {
                line.push('\n');
                line.push_str(&indent(&format_breakdown(&row.priority, use_colors), 6));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Client list as tab-separated values for scripting
/// Columns: score, level, status, days_until_renewal, customer_id, name, lifetime_value,
/// upsell_potential (no headers, no colors)
pub fn format_client_tsv(rows: &[ClientRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
                row.priority.total,
                row.priority.level,
                row.renewal_status,
                row.days_until_renewal
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                row.snapshot.customer_id,
                row.snapshot.display_name(),
                row.snapshot.lifetime_value,
                row.upsell_potential
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-component score breakdown, one component per line followed by its buckets
pub fn format_breakdown(priority: &PriorityScore, use_colors: bool) -> String {
    let mut lines = Vec::new();
    for component in &priority.components {
        let head = format!(
            "{:<11} {:>2}/{:<2}  {} ({})",
            component.component.name(),
            component.points,
            component.max_points,
            component.explanation,
            component.tier_label
        );
        lines.push(if use_colors { head.bold().to_string() } else { head });
        lines.push(format!("    {}", component.buckets.join(", ")));
    }
    lines.push(format!("Total: {} ({})", priority.total, priority.level));
    lines.join("\n")
}

/// Client detail view
pub fn format_client_detail(
    detail: &ClientDetail,
    outreach: Option<&OutreachState>,
    use_colors: bool,
) -> String {
    let profile = &detail.profile;
    let metrics = &detail.metrics;
    let mut out = Vec::new();

    let title = format!("{} ({})", profile.name, profile.id);
    out.push(if use_colors { title.bold().to_string() } else { title });
    out.push(format!("  Group: {}", profile.customer_group.as_deref().unwrap_or("-")));
    out.push(format!("  Territory: {}", profile.territory.as_deref().unwrap_or("-")));
    out.push(format!("  Email: {}", profile.email.as_deref().unwrap_or("-")));
    out.push(format!("  Phone: {}", profile.phone.as_deref().unwrap_or("-")));
    out.push(format!("  Customer since: {}", profile.created));
    if profile.disabled {
        out.push("  Disabled".to_string());
    }
    if let Some(entry) = outreach.and_then(|state| state.entry(&profile.id)) {
        let mut line = format!("  Snoozed: {}", entry.format_remaining());
        if let Some(note) = &entry.note {
            line.push_str(&format!(" ({})", note));
        }
        out.push(line);
    }

    out.push(String::new());
    out.push("Metrics".to_string());
    out.push(format!(
        "  Status: {} ({})",
        paint_status(metrics.renewal_status, metrics.renewal_status.as_str(), use_colors),
        format_days_until(metrics.days_until_renewal)
    ));
    out.push(format!("  Lifetime value: {}", format_money(metrics.lifetime_value)));
    out.push(format!(
        "  Orders: {} ({} renewals), average {}",
        metrics.total_orders,
        metrics.renewal_orders,
        format_money(metrics.average_order_value)
    ));
    out.push(format!(
        "  Last order: {}",
        metrics
            .last_order_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push(format!(
        "  Next renewal: {}",
        metrics
            .next_renewal_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push(format!("  Upsell potential: {}", format_money(metrics.upsell_potential)));

    out.push(String::new());
    out.push(format!(
        "Priority {} ({})",
        detail.priority.total,
        paint_level(detail.priority.level, detail.priority.level.as_str(), use_colors)
    ));
    out.push(indent(&format_breakdown(&detail.priority, false), 2));

    if !detail.product_breakdown.is_empty() {
        out.push(String::new());
        out.push("Products".to_string());
        for (name, usage) in &detail.product_breakdown {
            out.push(format!(
                "  {:<16} {:>3} orders  {:>12}  {} seats",
                name,
                usage.count,
                format_money(usage.revenue),
                usage.seats
            ));
        }
    }

    if !detail.recommendations.is_empty() {
        out.push(String::new());
        out.push("Recommendations".to_string());
        for rec in &detail.recommendations {
            out.push(format!("  {} (+{})", rec.title, format_money(rec.potential_value)));
            out.push(format!("    {}", rec.description));
        }
    }

    if !detail.subscriptions.is_empty() {
        out.push(String::new());
        out.push("Subscriptions".to_string());
        for sub in &detail.subscriptions {
            out.push(format!("  {}  ends {}  {}", sub.id, sub.end_date, sub.status.label()));
        }
    }

    if !detail.recent_orders.is_empty() {
        out.push(String::new());
        out.push("Recent orders".to_string());
        for order in &detail.recent_orders {
            out.push(format!(
                "  {}  {}  {:>12}  {}",
                order.transaction_date,
                order.id,
                format_money(order.grand_total),
                order.product_name().unwrap_or("-")
            ));
        }
    }

    out.join("\n")
}

fn format_comparison(comparison: &KpiComparison, use_colors: bool) -> String {
    if !use_colors {
        return comparison.label.clone();
    }
    match comparison.direction {
        Direction::Up => comparison.label.green().to_string(),
        Direction::Down => comparison.label.red().to_string(),
        Direction::Neutral => comparison.label.dimmed().to_string(),
    }
}

/// Dashboard KPI block
pub fn format_kpis(kpis: &DashboardKpis, use_colors: bool) -> String {
    let c = &kpis.comparisons;
    let rows = [
        (
            "Total customers",
            kpis.total_customers.to_string(),
            Some(&c.customers),
        ),
        (
            "Revenue up for renewal",
            format_money(kpis.revenue_up_for_renewal),
            Some(&c.renewal_revenue),
        ),
        (
            "Clients at risk",
            kpis.clients_at_risk.to_string(),
            Some(&c.at_risk),
        ),
        ("Upsell potential", format_money(kpis.upsell_potential), None),
        (
            "Renewal rate",
            format!("{:.1}%", kpis.renewal_rate),
            Some(&c.renewal_rate),
        ),
        (
            "Avg customer value",
            format_money(kpis.avg_customer_value),
            None,
        ),
        (
            "Renewals this month",
            kpis.renewals_this_month.to_string(),
            Some(&c.renewals_count),
        ),
    ];

    rows.iter()
        .map(|(label, value, comparison)| {
            let mut line = format!("{:<24}{:>14}", label, value);
            if let Some(comparison) = comparison {
                line.push_str("  ");
                line.push_str(&format_comparison(comparison, use_colors));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint_risk(risk: ValueRisk, use_colors: bool) -> String {
    let text = format!("{:<6}", risk.as_str());
    if !use_colors {
        return text;
    }
    match risk {
        ValueRisk::High => text.red().bold().to_string(),
        ValueRisk::Medium => text.yellow().to_string(),
        ValueRisk::Low => text.dimmed().to_string(),
    }
}

fn format_calendar_entry(entry: &CalendarEntry, use_colors: bool) -> String {
    format!(
        "{}  {}  {:>12}  {}  {}",
        entry.end_date,
        paint_risk(entry.value_risk, use_colors),
        format_money(entry.annual_value),
        entry.customer_name,
        entry.subscription_id
    )
}

/// Upcoming renewals, one per line
pub fn format_calendar(entries: &[CalendarEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No renewals in range.".to_string();
    }
    entries
        .iter()
        .map(|e| format_calendar_entry(e, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Month view: header, summary, then renewals grouped by day
pub fn format_calendar_month(month: &CalendarMonth, use_colors: bool) -> String {
    let mut out = Vec::new();
    out.push(if use_colors {
        month.month_name.bold().to_string()
    } else {
        month.month_name.clone()
    });
    out.push(format!(
        "{} renewals, {} total, {} high value",
        month.summary.renewal_count,
        format_money(month.summary.total_value),
        month.summary.high_value_count
    ));
    for day in &month.days {
        out.push(String::new());
        out.push(day.date.format("%a %d").to_string());
        for entry in &day.entries {
            out.push(format!(
                "  {}  {:>12}  {}",
                paint_risk(entry.value_risk, use_colors),
                format_money(entry.annual_value),
                entry.customer_name
            ));
        }
    }
    out.join("\n")
}

/// Monthly trend table with a header row
pub fn format_trends(trends: &[MonthTrend]) -> String {
    let mut out = vec![format!(
        "{:<9}{:>9}{:>6}{:>7}{:>8}{:>14}{:>14}",
        "Month", "Renewals", "New", "Total", "Rate", "Revenue", "Renewal rev"
    )];
    for t in trends {
        out.push(format!(
            "{:<9}{:>9}{:>6}{:>7}{:>7.1}%{:>14}{:>14}",
            t.month,
            t.renewals,
            t.new_orders,
            t.total_orders,
            t.renewal_rate,
            format_money(t.total_revenue),
            format_money(t.renewal_revenue)
        ));
    }
    out.join("\n")
}

/// Product retention table, highest revenue first
pub fn format_products(products: &[ProductRetention]) -> String {
    if products.is_empty() {
        return "No product data in this export.".to_string();
    }
    let mut out = vec![format!(
        "{:<16}{:>10}{:>8}{:>14}{:>10}{:>11}",
        "Product", "Customers", "Orders", "Revenue", "Avg seats", "Retention"
    )];
    for p in products {
        out.push(format!(
            "{:<16}{:>10}{:>8}{:>14}{:>10.1}{:>10.1}%",
            truncate_name(&p.product, 15),
            p.unique_customers,
            p.total_orders,
            format_money(p.total_revenue),
            p.avg_seats,
            p.retention_rate
        ));
    }
    out.join("\n")
}

/// Search results, one customer per line
pub fn format_search(hits: &[SearchHit], offset: usize) -> String {
    if hits.is_empty() {
        return "No matching customers.".to_string();
    }
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{:>3}. {:<12} {:<14} {}",
                offset + i + 1,
                hit.id,
                truncate_name(hit.customer_group.as_deref().unwrap_or("-"), 14),
                hit.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Customer timeline, most recent first
pub fn format_timeline(events: &[TimelineEvent], use_colors: bool) -> String {
    if events.is_empty() {
        return "No activity recorded.".to_string();
    }
    let mut out = Vec::new();
    for event in events {
        let amount = event
            .amount
            .map(format_money)
            .unwrap_or_default();
        let title = if use_colors {
            event.title.bold().to_string()
        } else {
            event.title.clone()
        };
        out.push(format!("{}  {:>12}  {}", event.date, amount, title));
        if !event.details.is_empty() {
            out.push(format!("{}  {:>12}  {}", " ".repeat(10), "", event.details));
        }
    }
    out.join("\n")
}
