pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;
pub mod extract;
pub mod html;
pub mod openapi;

pub use startup::run;
