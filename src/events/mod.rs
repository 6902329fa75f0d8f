use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Event delivery is best-effort; the triggering transaction has already
    /// committed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(?event, "dropping event: {}", e);
        }
    }
}

/// Events emitted after a committed warehouse reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Company events
    CompanyCreated(i32),

    // Warehouse lifecycle events
    WarehouseCreated(i32),
    WarehouseUpdated(i32),
    WarehouseArchived(i32),
    WarehouseUnarchived(i32),

    // Routing events
    RoutesSynchronized {
        warehouse_id: i32,
    },
    ResupplyRouteCreated {
        supplied_wh_id: i32,
        supplier_wh_id: i32,
        route_id: i32,
    },
    ResupplyRouteReactivated {
        supplied_wh_id: i32,
        supplier_wh_id: i32,
        route_id: i32,
    },
    ResupplyRouteArchived {
        supplied_wh_id: i32,
        supplier_wh_id: i32,
        route_id: i32,
    },

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

/// Consume events from the channel. Downstream consumers (procurement,
/// notifications) would hang off this loop; for now every event is logged.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::WarehouseCreated(id) => info!(warehouse_id = id, "warehouse created"),
            Event::WarehouseUpdated(id) => info!(warehouse_id = id, "warehouse updated"),
            Event::WarehouseArchived(id) => info!(warehouse_id = id, "warehouse archived"),
            Event::WarehouseUnarchived(id) => info!(warehouse_id = id, "warehouse unarchived"),
            Event::RoutesSynchronized { warehouse_id } => {
                info!(warehouse_id, "routes synchronized")
            }
            other => info!(event = ?other, "event received"),
        }
    }

    info!("Event channel closed; stopping event processing loop");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_does_not_fail_on_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Should log and return, not error.
        sender.send_or_log(Event::WarehouseCreated(1)).await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::RoutesSynchronized { warehouse_id: 7 })
            .await
            .expect("send");
        match rx.recv().await {
            Some(Event::RoutesSynchronized { warehouse_id }) => assert_eq!(warehouse_id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
