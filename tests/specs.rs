//! Black-box specs: drive the actual `hooksctl` and `hook-forward` binaries
//! the way an assistant or operator would, rather than calling library code
//! directly. Each project gets its own temp directory so specs never share
//! a socket, pid file, or config.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;

#[path = "specs/config/validate.rs"]
mod config_validate;

#[path = "specs/forwarder/fallback.rs"]
mod forwarder_fallback;
