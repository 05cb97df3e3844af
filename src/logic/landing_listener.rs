//! Keeps each plane's flight log in step with its landings.
//!
//! The store publishes the id of every plane that lands. For each one the
//! listener appends a landing event (city, time, city position) to the flight
//! log and refreshes the computed totals. A failed or closed subscription is
//! retried after a pause; the listener never exits on its own.
//!
//! Landings have no backlog: one published before the first subscription or
//! during the pause before resubscribing is never recorded.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::logic::flight_log::flight_log_update;
use crate::model::{FlightLogUpdate, Id, LandingEvent};
use crate::store::traits::Store;

const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

pub fn spawn_landing_listener<S: Store + 'static>(store: Arc<S>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Landing listener started");
        loop {
            listen_for_landings(&*store).await;
            tokio::time::sleep(RESUBSCRIBE_DELAY).await;
        }
    })
}

async fn listen_for_landings<S: Store>(store: &S) {
    let mut landings = match store.subscribe_landings().await {
        Ok(landings) => landings,
        Err(e) => {
            error!("Failed to subscribe to landings: {:#}", e);
            return;
        }
    };

    while let Some(plane_id) = landings.recv().await {
        if let Err(e) = record_landing(store, &plane_id, Utc::now()).await {
            error!("Failed to record landing of {}: {:#}", plane_id, e);
        }
    }
    warn!("Landing subscription closed");
}

/// Append a landing at the plane's current `landed` city to its flight log
pub async fn record_landing<S: Store>(
    store: &S,
    plane_id: &Id,
    at: DateTime<Utc>,
) -> anyhow::Result<Option<FlightLogUpdate>> {
    let Some(plane) = store.get_plane(plane_id).await? else {
        warn!("Landed plane {} no longer exists", plane_id);
        return Ok(None);
    };
    let Some(city_id) = plane.landed.clone() else {
        warn!("Plane {} has no landing city", plane_id);
        return Ok(None);
    };
    let Some(city) = store.get_city(&city_id).await? else {
        warn!("Plane {} landed in unknown city {}", plane_id, city_id);
        return Ok(None);
    };

    let event = LandingEvent {
        location: city.id,
        date: at,
        position: city.position,
    };
    let update = flight_log_update(&plane, event);
    if update.requires_maintenance {
        warn!("Plane {} requires maintenance", plane_id);
    }

    if !store.record_landing(plane_id, update.clone()).await? {
        return Ok(None);
    }
    Ok(Some(update))
}
