//! Minimal HTTP surface: request parsing, JSON responses and a front
//! controller that routes `/<controller>/<action>` to registered handlers.

pub mod front_controller;
pub mod http;

pub use front_controller::{FrontController, Handler};
pub use http::{Method, Request, Response, Status};
