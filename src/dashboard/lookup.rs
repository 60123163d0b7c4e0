use crate::dataset::{Customer, Dataset};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Shorter non-empty queries match nothing.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_group: Option<String>,
    /// "Name (email, phone or id)"
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    /// Matches before paging
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

impl SearchHit {
    pub fn from_customer(customer: &Customer) -> Self {
        let contact = customer
            .email
            .as_deref()
            .or(customer.phone.as_deref())
            .unwrap_or(&customer.id);
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            customer_group: customer.customer_group.clone(),
            label: format!("{} ({})", customer.name, contact),
        }
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// How well `customer` matches a lowercased query: 0 exact, 1 prefix, 2 substring.
fn match_rank(customer: &Customer, query: &str) -> Option<u8> {
    let mut fields = vec![customer.id.to_lowercase(), customer.name.to_lowercase()];
    if let Some(email) = &customer.email {
        fields.push(email.to_lowercase());
    }

    let mut best = fields
        .iter()
        .filter_map(|field| {
            if field == query {
                Some(0)
            } else if field.starts_with(query) {
                Some(1)
            } else if field.contains(query) {
                Some(2)
            } else {
                None
            }
        })
        .min();

    // Phone numbers match on digits so "+1 555-0100" finds "15550100"
    let wanted = digits(query);
    if wanted.len() >= MIN_QUERY_LEN {
        if let Some(phone) = customer.phone.as_deref().map(digits) {
            let rank = if phone == wanted {
                Some(0)
            } else if phone.contains(&wanted) {
                Some(2)
            } else {
                None
            };
            best = best.into_iter().chain(rank).min();
        }
    }
    best
}

/// Search enabled customers by id, name, email or phone, best matches first.
///
/// An empty query lists every enabled customer, newest first.
pub fn search_customers(dataset: &Dataset, query: &str, limit: usize, offset: usize) -> SearchPage {
    let query = query.trim().to_lowercase();
    if !query.is_empty() && query.chars().count() < MIN_QUERY_LEN {
        return SearchPage {
            total: 0,
            hits: Vec::new(),
        };
    }

    let mut matches: Vec<(u8, &Customer)> = if query.is_empty() {
        let mut all: Vec<&Customer> = dataset.enabled_customers().collect();
        all.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name)));
        all.into_iter().map(|c| (0, c)).collect()
    } else {
        dataset
            .enabled_customers()
            .filter_map(|c| match_rank(c, &query).map(|rank| (rank, c)))
            .collect()
    };
    if !query.is_empty() {
        matches.sort_by(|(ra, a), (rb, b)| ra.cmp(rb).then_with(|| a.name.cmp(&b.name)));
    }

    tracing::debug!(query = %query, matches = matches.len(), "searched customers");

    SearchPage {
        total: matches.len(),
        hits: matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, c)| SearchHit::from_customer(c))
            .collect(),
    }
}

/// Enabled customer with this email address, ignoring case.
pub fn find_by_email<'a>(dataset: &'a Dataset, email: &str) -> Option<&'a Customer> {
    let email = email.trim();
    if email.is_empty() {
        return None;
    }
    dataset.enabled_customers().find(|c| {
        c.email
            .as_deref()
            .is_some_and(|e| e.trim().eq_ignore_ascii_case(email))
    })
}

/// Enabled customer with this phone number, comparing digits only.
pub fn find_by_phone<'a>(dataset: &'a Dataset, phone: &str) -> Option<&'a Customer> {
    let wanted = digits(phone);
    if wanted.is_empty() {
        return None;
    }
    dataset
        .enabled_customers()
        .find(|c| c.phone.as_deref().is_some_and(|p| digits(p) == wanted))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Order,
    SubscriptionEnd,
    SubscriptionStart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: TimelineKind,
    pub title: String,
    pub details: String,
    /// Order or subscription id
    pub reference: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelinePage {
    pub total: usize,
    pub events: Vec<TimelineEvent>,
}

/// Orders and subscription events of one customer, most recent first.
///
/// Draft orders are listed too, marked as drafts.
///
/// # Errors
///
/// Returns an error if no customer has the given id.
pub fn customer_timeline(
    dataset: &Dataset,
    customer_id: &str,
    today: NaiveDate,
    limit: usize,
    offset: usize,
) -> Result<TimelinePage> {
    let customer = dataset
        .find_customer(customer_id)
        .ok_or_else(|| anyhow::anyhow!("Customer {} not found", customer_id))?;

    let mut events = Vec::new();

    for order in dataset.orders.iter().filter(|o| o.customer_id == customer.id) {
        let seats = order.seats.map(|s| format!("{} seats", s));
        let mut details: Vec<&str> = Vec::new();
        if let Some(order_type) = order.order_type {
            details.push(order_type.label());
        }
        if let Some(product) = order.product_name() {
            details.push(product);
        }
        if let Some(seats) = &seats {
            details.push(seats);
        }
        if !order.submitted {
            details.push("Draft");
        }
        events.push(TimelineEvent {
            date: order.transaction_date,
            kind: TimelineKind::Order,
            title: format!("Order {}", order.id),
            details: details.join(", "),
            reference: order.id.clone(),
            amount: Some(order.grand_total),
        });
    }

    for sub in dataset.subscriptions.iter().filter(|s| s.customer_id == customer.id) {
        if let Some(start) = sub.start_date {
            events.push(TimelineEvent {
                date: start,
                kind: TimelineKind::SubscriptionStart,
                title: format!("Subscription {} started", sub.id),
                details: sub.status.label().to_string(),
                reference: sub.id.clone(),
                amount: None,
            });
        }
        let verb = if sub.end_date > today { "ends" } else { "ended" };
        events.push(TimelineEvent {
            date: sub.end_date,
            kind: TimelineKind::SubscriptionEnd,
            title: format!("Subscription {} {}", sub.id, verb),
            details: sub.status.label().to_string(),
            reference: sub.id.clone(),
            amount: None,
        });
    }

    events.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.reference.cmp(&b.reference))
    });

    Ok(TimelinePage {
        total: events.len(),
        events: events.into_iter().skip(offset).take(limit).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{date, sample_dataset, today};

    fn ids(page: &SearchPage) -> Vec<&str> {
        page.hits.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let page = search_customers(&sample_dataset(), "beta", 10, 0);
        assert_eq!(ids(&page), vec!["C-BETA"]);
        assert_eq!(page.hits[0].label, "Beta Retail (c-beta@example.com)");
    }

    #[test]
    fn test_search_ranks_exact_before_substring() {
        let mut dataset = sample_dataset();
        dataset.customers[2].name = "Acme Gamma Labs".to_string();
        let page = search_customers(&dataset, "c-acme", 10, 0);
        assert_eq!(ids(&page), vec!["C-ACME"]);

        let page = search_customers(&dataset, "acme", 10, 0);
        // Both are prefix matches, so name order decides
        assert_eq!(ids(&page), vec!["C-ACME", "C-GAMMA"]);
    }

    #[test]
    fn test_search_skips_disabled_customers() {
        let page = search_customers(&sample_dataset(), "old", 10, 0);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_search_short_query_matches_nothing() {
        let page = search_customers(&sample_dataset(), "a", 10, 0);
        assert_eq!(page.total, 0);
        assert!(page.hits.is_empty());
    }

    #[test]
    fn test_empty_query_lists_newest_first_with_paging() {
        let dataset = sample_dataset();
        let page = search_customers(&dataset, "", 2, 1);
        assert_eq!(page.total, 5);
        assert_eq!(ids(&page), vec!["C-GAMMA", "C-BETA"]);
    }

    #[test]
    fn test_search_phone_by_digits() {
        let mut dataset = sample_dataset();
        dataset.customers[3].phone = Some("+1 (555) 010-0200".to_string());
        let page = search_customers(&dataset, "555-0199", 10, 0);
        assert!(page.hits.is_empty());
        let page = search_customers(&dataset, "5550100200", 10, 0);
        assert_eq!(ids(&page), vec!["C-DELTA"]);
    }

    #[test]
    fn test_find_by_email_and_phone() {
        let mut dataset = sample_dataset();
        dataset.customers[1].phone = Some("555 0101".to_string());

        let beta = find_by_email(&dataset, "C-BETA@Example.com").unwrap();
        assert_eq!(beta.id, "C-BETA");
        assert_eq!(find_by_phone(&dataset, "555-0101").unwrap().id, "C-BETA");

        assert!(find_by_email(&dataset, "c-old@example.com").is_none());
        assert!(find_by_email(&dataset, "  ").is_none());
        assert!(find_by_phone(&dataset, "n/a").is_none());
    }

    #[test]
    fn test_timeline_merges_orders_and_subscriptions() {
        let page = customer_timeline(&sample_dataset(), "C-BETA", today(), 10, 0).unwrap();
        assert_eq!(page.total, 4);

        let first = &page.events[0];
        assert_eq!(first.kind, TimelineKind::SubscriptionEnd);
        assert_eq!(first.date, date(2026, 10, 29));
        assert_eq!(first.title, "Subscription SUB-B ends");

        let second = &page.events[1];
        assert_eq!(second.reference, "SO-B3");
        assert_eq!(second.details, "Renewal, Norton, 5 seats");
        assert_eq!(second.amount, Some(Decimal::from(800)));
    }

    #[test]
    fn test_timeline_marks_drafts_and_past_ends() {
        let page = customer_timeline(&sample_dataset(), "C-DELTA", today(), 10, 0).unwrap();
        assert_eq!(page.events[0].reference, "SO-D3");
        assert!(page.events[0].details.ends_with("Draft"));

        let acme = customer_timeline(&sample_dataset(), "C-ACME", today(), 1, 0).unwrap();
        assert_eq!(acme.total, 13);
        assert_eq!(acme.events[0].title, "Subscription SUB-A ended");
    }

    #[test]
    fn test_timeline_paging() {
        let page = customer_timeline(&sample_dataset(), "C-ACME", today(), 2, 12).unwrap();
        assert_eq!(page.events.len(), 1);
        assert_eq!(page.events[0].reference, "SUB-A0");
    }

    #[test]
    fn test_timeline_unknown_customer() {
        let err = customer_timeline(&sample_dataset(), "C-NOPE", today(), 10, 0).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
