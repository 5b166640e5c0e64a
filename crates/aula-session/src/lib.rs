pub mod capture;
pub mod location;
pub mod request;
pub mod scripted;
pub mod store;
pub mod transport;

pub use capture::capture_session;
pub use location::{origin_of, ExecutionContext, Location, MemoryLocation};
pub use request::{
    with_session, Body, CacheMode, Credentials, FilePart, HttpResponse, RequestConfig,
    SessionClient, Transport, TransportError,
};
pub use scripted::{RecordedRequest, ScriptedTransport};
pub use store::SessionStore;
pub use transport::ReqwestTransport;
