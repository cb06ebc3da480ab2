pub mod coordinator;
pub mod gateway;

pub use coordinator::{Epoch, RefreshCoordinator, RefreshOutcome, Settled};
pub use gateway::{
    Gateway, GatewayConfig, GatewayError, LogOnlyObserver, RequestOptions, SessionHint,
    SessionObserver,
};
