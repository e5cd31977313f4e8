//! Container keys the host binds for every provider.

pub const CONFIG: &str = "config";
pub const EVENTS: &str = "events";
pub const QUEUE: &str = "queue";
pub const QUEUE_WORKER: &str = "queue.worker";
/// The broker (redis) connection manager.
pub const BROKER: &str = "redis";
/// Contract name modules may alias the broker under.
pub const BROKER_CONTRACT: &str = "contracts.redis.factory";
