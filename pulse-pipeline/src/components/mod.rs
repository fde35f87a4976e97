pub mod dead_stock_rule;
pub mod email_summary_notifier;
pub mod low_stock_rule;
pub mod noop_notifier;
pub mod revenue_drop_rule;
pub mod stockout_rule;
pub mod underperforming_boutique_rule;
pub mod zero_transaction_rule;

#[cfg(test)]
pub(crate) mod fixtures;
