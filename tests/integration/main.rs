//! Integration tests against a scripted transport and a mock HTTP server

mod envelopes;
mod facades;
mod http_transport;
mod mock_server;
