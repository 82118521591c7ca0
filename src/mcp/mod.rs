//! MCP (Model Context Protocol) server
//!
//! JSON-RPC 2.0 over stdio. No external SDK - blocking I/O, minimal dependencies.
//! Dialogue state lives in the transport's `SessionRegistry`; the engine
//! itself never holds sessions.

mod protocol;
mod server;
mod session;

pub use protocol::{Request, Response};
pub use server::{run_mcp_server, McpServer};
pub use session::{SessionFilter, SessionInfo, SessionRegistry, SessionTurn};
