//! Services layer - the HTML work behind each user action.
//!
//! - `normalizer` - html5ever-backed correction
//! - `validator` - conformance checking over the html5ever token stream
//! - `preview` - opening HTML in the system browser
//! - `compiler` - the stateless orchestrator tying the three together

pub mod compiler;
pub mod normalizer;
pub mod preview;
pub mod validator;
