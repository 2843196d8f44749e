//! Groups pending orders into one geocoding unit per address.

use crate::model::{Order, PendingAddress};
use std::collections::HashMap;

/// Groups orders by exact address string.
///
/// Addresses come out in order of first appearance and each keeps its
/// orders in input order.
pub fn group_by_address(orders: &[Order]) -> Vec<PendingAddress> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<PendingAddress> = Vec::new();

    for order in orders {
        let slot = *index
            .entry(order.customer_address.as_str())
            .or_insert_with(|| {
                grouped.push(PendingAddress {
                    address: order.customer_address.clone(),
                    order_ids: Vec::new(),
                });
                grouped.len() - 1
            });
        grouped[slot].order_ids.push(order.id.clone());
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderId;
    use chrono::Utc;

    #[test]
    fn test_merges_identical_addresses() {
        let now = Utc::now();
        let orders = vec![
            Order::new("o1", "12 Elm St", now),
            Order::new("o2", "7 Oak Ave", now),
            Order::new("o3", "12 Elm St", now),
        ];

        let grouped = group_by_address(&orders);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].address, "12 Elm St");
        assert_eq!(grouped[0].order_ids, vec![OrderId::from("o1"), OrderId::from("o3")]);
        assert_eq!(grouped[1].order_ids, vec![OrderId::from("o2")]);
    }

    #[test]
    fn test_match_is_exact() {
        let now = Utc::now();
        let orders = vec![Order::new("o1", "12 Elm St", now), Order::new("o2", "12 elm st", now)];
        assert_eq!(group_by_address(&orders).len(), 2);
    }

    #[test]
    fn test_no_orders() {
        assert!(group_by_address(&[]).is_empty());
    }
}
