use crate::dispatch::Dispatcher;
use crate::registry::RolloutRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: RolloutRegistry,
    pub dispatcher: Dispatcher,
}
