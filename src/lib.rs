pub mod cli;
pub mod credentials;
pub mod env;
pub mod view;

pub use credentials::{
    CredentialStore, CredentialStoreError, FileCredentialStore, InMemoryCredentialStore,
};
pub use env::{Env, LogLevel, OutputFormat, setup_tracing};
pub use view::{
    MalformedPayloadDisplay, MountedView, Node, OrderHistoryView, RenderOptions, ViewState,
};
