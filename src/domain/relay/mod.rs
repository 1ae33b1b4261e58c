//! The relay pipeline.
//!
//! ```text
//! spy -> Watcher -> observations -> Inspector -> to_deliver -> Deliverer -> destination chain
//! ```
//!
//! Both queues are bounded: a slow deliverer stalls the inspector, which in turn
//! stalls the watcher, and no approved batch is ever dropped for lack of room.

use std::sync::Arc;

use alloy::primitives::U256;
use tokio::sync::{mpsc, Mutex};

use crate::{
    constants::{
        DEFAULT_OBSERVATION_QUEUE_CAPACITY, DELIVERY_QUEUE_CAPACITY, SPY_READINESS_COMPONENT,
        TARGET_GAS_LIMIT,
    },
    services::{AttestationSource, ReadinessTracker, RelayerKey},
    supervisor::Supervisor,
};

mod router;
pub use router::*;

mod watcher;
pub use watcher::*;

mod inspector;
pub use inspector::*;

mod deliverer;
pub use deliverer::*;


pub const WATCHER_STAGE: &str = "watcher";
pub const INSPECTOR_STAGE: &str = "inspector";
pub const DELIVERER_STAGE: &str = "deliverer";

/// Queue receiver kept across restarts of the stage consuming it.
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<Vec<u8>>>>;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub observation_queue_capacity: usize,
    pub target_gas_limit: u32,
    /// Value attached to every delivery transaction.
    pub native_payment: U256,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            observation_queue_capacity: DEFAULT_OBSERVATION_QUEUE_CAPACITY,
            target_gas_limit: TARGET_GAS_LIMIT,
            native_payment: U256::ZERO,
        }
    }
}

pub struct RelayPipeline {
    pub watcher: Arc<Watcher>,
    pub inspector: Arc<Inspector>,
    pub deliverer: Arc<Deliverer>,
}

impl RelayPipeline {
    pub fn new(
        settings: &PipelineSettings,
        router: Arc<DeliveryRouter>,
        source: Arc<dyn AttestationSource>,
        key: RelayerKey,
        readiness: Arc<ReadinessTracker>,
    ) -> Self {
        let (observations_tx, observations_rx) =
            mpsc::channel(settings.observation_queue_capacity.max(1));
        let (to_deliver_tx, to_deliver_rx) = mpsc::channel(DELIVERY_QUEUE_CAPACITY);

        readiness.register(SPY_READINESS_COMPONENT);

        Self {
            watcher: Arc::new(Watcher::new(source, observations_tx, readiness)),
            inspector: Arc::new(Inspector::new(
                router.clone(),
                Arc::new(Mutex::new(observations_rx)),
                to_deliver_tx,
            )),
            deliverer: Arc::new(Deliverer::new(
                router,
                Arc::new(Mutex::new(to_deliver_rx)),
                key,
                settings.target_gas_limit,
                settings.native_payment,
            )),
        }
    }

    pub fn spawn(self, supervisor: &mut Supervisor) {
        supervisor.spawn(WATCHER_STAGE, self.watcher);
        supervisor.spawn(INSPECTOR_STAGE, self.inspector);
        supervisor.spawn(DELIVERER_STAGE, self.deliverer);
    }
}
