//! Read-only views over the record export: client list, client detail, KPIs,
//! renewal calendar, trends, product retention, customer search and timelines.

pub mod calendar;
pub mod clients;
pub mod detail;
pub mod kpis;
pub mod lookup;
pub mod period;
pub mod products;
pub mod trends;

pub use calendar::{calendar_month, renewal_calendar, CalendarDay, CalendarEntry, CalendarMonth, ValueRisk};
pub use clients::{list_clients, ClientFilter, ClientPage, ClientRow};
pub use detail::{client_detail, ClientDetail, ClientMetrics};
pub use kpis::{dashboard_kpis, DashboardKpis, KpiComparisons};
pub use lookup::{
    customer_timeline, find_by_email, find_by_phone, search_customers, SearchHit, SearchPage,
    TimelineEvent, TimelineKind, TimelinePage,
};
pub use period::Period;
pub use products::{product_retention, ProductRetention};
pub use trends::{trend_data, MonthTrend};
