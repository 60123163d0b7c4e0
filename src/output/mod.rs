pub mod formatter;

pub use formatter::{
    format_breakdown, format_calendar, format_calendar_month, format_client_detail,
    format_client_table, format_client_tsv, format_days_until, format_kpis, format_money,
    format_products, format_search, format_timeline, format_trends, should_use_colors,
};
