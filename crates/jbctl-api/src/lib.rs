// jbctl-api: management model, operation requests, and transports for
// JBoss/WildFly management controllers.

pub mod error;
pub mod http;
pub mod memory;
pub mod model;
pub mod operation;
pub mod transport;

pub use error::Error;
pub use http::HttpTransport;
pub use memory::InMemoryController;
pub use model::{ModelNode, ModelType};
pub use operation::{OperationRequest, ResourcePath};
pub use transport::{ConnectParams, Session, TlsMode, TransportConfig, TransportFactory};
