// MCP (Model Context Protocol) server for the Eka clinical tool suite.
// Serves tool discovery and invocation to agent clients over stdio.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
